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

mod context;
mod exit_codes;
mod format;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::{format_error_chain, format_error_with_color};

use crate::install::InstallStage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrigoError {
    #[error("Failed to reach registry at {url}: {reason}")]
    RegistryUnreachable { url: String, reason: String },

    #[error("Registry returned HTTP {status} for path '{path}'")]
    RegistryBadStatus {
        status: u16,
        path: String,
        url: String,
    },

    #[error("Registry response from {url} could not be parsed: {reason}")]
    RegistryMalformedResponse { url: String, reason: String },

    #[error("Registry type '{0}' is not supported")]
    UnsupportedRegistryType(String),

    #[error("No versions found under '{path}'")]
    NoVersionsFound { path: String },

    #[error("No version matching '{filter}' found under '{path}'")]
    NoMatchingVersion {
        filter: String,
        path: String,
        available: Vec<String>,
    },

    #[error("Insufficient disk space at {path:?}: {required} bytes required, {available} bytes available")]
    InsufficientSpace {
        path: PathBuf,
        required: u64,
        available: u64,
    },

    #[error("Extraction destination must be an absolute path: {0:?}")]
    InvalidDestination(PathBuf),

    #[error("Archive entry escapes the destination directory: {0}")]
    PathTraversal(String),

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),

    #[error("Failed to extract archive: {0}")]
    ExtractionFailed(String),

    #[error("Archive did not produce exactly one top-level directory in {path:?}")]
    AmbiguousArchiveLayout { path: PathBuf, found: Vec<String> },

    #[error("Certificate configuration is incomplete: {0}")]
    CertConfigIncomplete(String),

    #[error("System trust store not found: {0:?}")]
    CertSourceMissing(PathBuf),

    #[error("SDK trust store not found: {0:?}")]
    CertTargetMissing(PathBuf),

    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Installation failed while entering stage {stage}: {source}")]
    InstallFailed {
        stage: InstallStage,
        #[source]
        source: Box<StrigoError>,
    },

    #[error("{sdk_type} {distribution} {version} is not installed")]
    NotInstalled {
        sdk_type: String,
        distribution: String,
        version: String,
    },

    #[error("Unknown SDK type '{name}'")]
    UnknownSdkType { name: String, available: Vec<String> },

    #[error("Unknown distribution '{name}' for SDK type '{sdk_type}'")]
    UnknownDistribution {
        name: String,
        sdk_type: String,
        available: Vec<String>,
    },

    #[error("Invalid major version filter '{0}': expected a number such as 11, or 'unknown'")]
    InvalidVersionFilter(String),

    #[error("Configuration file error: {0}")]
    ConfigFile(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("System error: {0}")]
    SystemError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] attohttpc::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for StrigoError {
    fn from(error: config::ConfigError) -> Self {
        StrigoError::ConfigFile(error.to_string())
    }
}

impl StrigoError {
    /// The innermost error, looking through `InstallFailed` wrappers.
    pub fn root_cause(&self) -> &StrigoError {
        match self {
            StrigoError::InstallFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StrigoError>;
