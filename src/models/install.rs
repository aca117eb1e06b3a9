// Copyright 2025 strigo contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::models::{CertificateConfig, SdkAsset};
use serde::Serialize;
use std::path::PathBuf;

/// Everything needed to turn one matched asset into an installed SDK.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub sdk_type: String,
    pub distribution: String,
    pub version: String,
    pub asset: SdkAsset,
    pub cache_dir: PathBuf,
    /// The version directory the archive is extracted into.
    pub install_path: PathBuf,
    pub keep_cache: bool,
    /// `None` when the SDK type does not take certificates.
    pub certificates: Option<CertificateConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CertificateStatus {
    NotRequired,
    Configured,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledSdk {
    pub sdk_type: String,
    pub distribution: String,
    pub version: String,
    pub version_path: PathBuf,
    pub sdk_root: PathBuf,
    pub certificates: CertificateStatus,
}

#[derive(Debug, Clone)]
pub enum InstallOutcome {
    Installed(InstalledSdk),
    AlreadyInstalled { path: PathBuf },
}
