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

use crate::error::{Result, StrigoError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateMode {
    /// Keep a `.original` backup and copy the system trust store in place.
    #[default]
    Replace,
    /// Point the JDK trust store at the system file.
    Symlink,
}

impl std::fmt::Display for CertificateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            CertificateMode::Replace => "replace",
            CertificateMode::Symlink => "symlink",
        };
        write!(f, "{mode}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: CertificateMode,
    /// Trust store location relative to the extracted SDK root.
    #[serde(default)]
    pub jdk_security_path: String,
    #[serde(default)]
    pub system_cacerts_path: PathBuf,
}

fn default_enabled() -> bool {
    true
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: CertificateMode::Replace,
            jdk_security_path: String::new(),
            system_cacerts_path: PathBuf::new(),
        }
    }
}

impl CertificateConfig {
    /// Checks the preconditions an install relies on. Disabled configs always pass.
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.jdk_security_path.trim().is_empty() {
            return Err(StrigoError::CertConfigIncomplete(
                "jdk_security_path is empty".to_string(),
            ));
        }

        if self.system_cacerts_path.as_os_str().is_empty() {
            return Err(StrigoError::CertConfigIncomplete(
                "system_cacerts_path is empty".to_string(),
            ));
        }

        if !self.system_cacerts_path.exists() {
            return Err(StrigoError::CertSourceMissing(
                self.system_cacerts_path.clone(),
            ));
        }

        Ok(())
    }
}
