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

use crate::error::StrigoError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a StrigoError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a StrigoError) -> Self {
        let (suggestion, details) = match error {
            StrigoError::RegistryUnreachable { url, .. } => {
                let suggestion = Some(
                    "Check your network connection and proxy settings, and verify the registry \
                     api_url in strigo.toml."
                        .to_string(),
                );
                let details = Some(format!("Request URL: {url}"));
                (suggestion, details)
            }
            StrigoError::RegistryBadStatus { status, path, url } => {
                let suggestion = if *status == 404 {
                    Some(format!(
                        "Check that the path '{path}' exists in the registry repository."
                    ))
                } else if *status == 401 || *status == 403 {
                    Some("The registry refused access. Check the repository permissions.".to_string())
                } else {
                    Some("The registry reported an error. Try again later.".to_string())
                };
                let details = Some(format!("Request URL: {url}"));
                (suggestion, details)
            }
            StrigoError::RegistryMalformedResponse { reason, .. } => {
                let suggestion = Some(
                    "Verify that the configured registry type matches the server (only 'nexus' \
                     listings are understood)."
                        .to_string(),
                );
                let details = Some(format!("Parse error: {reason}"));
                (suggestion, details)
            }
            StrigoError::UnsupportedRegistryType(_) => {
                let suggestion =
                    Some("Supported registry types: nexus.".to_string());
                (suggestion, None)
            }
            StrigoError::NoVersionsFound { .. } => {
                let suggestion = Some(
                    "Check the repository path in strigo.toml. Run with -vv to see which listing \
                     entries were ignored."
                        .to_string(),
                );
                (suggestion, None)
            }
            StrigoError::NoMatchingVersion { available, .. } => {
                let suggestion = Some(
                    "Run 'strigo available <type> <distribution>' to see all versions."
                        .to_string(),
                );
                let details = if available.is_empty() {
                    None
                } else {
                    Some(format!("Available: {}", available.join(", ")))
                };
                (suggestion, details)
            }
            StrigoError::InsufficientSpace { required, .. } => {
                let suggestion = Some(format!(
                    "Free up disk space and try again. At least {} MB must be available to hold \
                     the archive and its extracted copy.",
                    required / (1024 * 1024)
                ));
                (suggestion, None)
            }
            StrigoError::PathTraversal(_) => {
                let suggestion = Some(
                    "The archive is unsafe to extract. Verify the artifact published in the \
                     registry."
                        .to_string(),
                );
                (suggestion, None)
            }
            StrigoError::ExtractionFailed(msg) => {
                let suggestion = Some(
                    "The archive may be corrupted. Run the install again to download a fresh copy."
                        .to_string(),
                );
                let details = Some(format!("Extraction failed: {msg}"));
                (suggestion, details)
            }
            StrigoError::AmbiguousArchiveLayout { found, .. } => {
                let suggestion = Some(
                    "The archive must contain exactly one top-level directory. Verify the \
                     artifact published in the registry."
                        .to_string(),
                );
                let details = if found.is_empty() {
                    Some("The archive produced no top-level directory.".to_string())
                } else {
                    Some(format!("Top-level entries: {}", found.join(", ")))
                };
                (suggestion, details)
            }
            StrigoError::CertConfigIncomplete(_) => {
                let suggestion = Some(
                    "Set jdk_security_path and system_cacerts_path in the [certificates] section \
                     of strigo.toml, or set enabled = false."
                        .to_string(),
                );
                (suggestion, None)
            }
            StrigoError::CertSourceMissing(path) => {
                let suggestion = Some(format!(
                    "Install the system CA bundle or point system_cacerts_path to an existing \
                     file (currently {}).",
                    path.display()
                ));
                (suggestion, None)
            }
            StrigoError::CertTargetMissing(_) => {
                let suggestion = Some(
                    "Check jdk_security_path; it is resolved relative to the extracted JDK root."
                        .to_string(),
                );
                (suggestion, None)
            }
            StrigoError::Download { .. } => {
                let suggestion = Some(
                    "Check your internet connection and try again. Increase network.timeout_secs \
                     or network.download_attempts if the connection is slow."
                        .to_string(),
                );
                (suggestion, None)
            }
            StrigoError::InstallFailed { stage, source } => {
                let inner = ErrorContext::new(source);
                let details = Some(match inner.details {
                    Some(inner_details) => format!("Failed stage: {stage}\n{inner_details}"),
                    None => format!("Failed stage: {stage}"),
                });
                (inner.suggestion, details)
            }
            StrigoError::NotInstalled {
                sdk_type,
                distribution,
                version,
            } => {
                let suggestion = Some(format!(
                    "Run 'strigo install {sdk_type} {distribution} {version}' first, or 'strigo \
                     list {sdk_type} {distribution}' to see installed versions."
                ));
                (suggestion, None)
            }
            StrigoError::UnknownSdkType { available, .. } => {
                let suggestion = Some(format!(
                    "Available SDK types: {}",
                    if available.is_empty() {
                        "none configured".to_string()
                    } else {
                        available.join(", ")
                    }
                ));
                (suggestion, None)
            }
            StrigoError::UnknownDistribution { available, .. } => {
                let suggestion = Some(format!(
                    "Available distributions: {}",
                    if available.is_empty() {
                        "none configured".to_string()
                    } else {
                        available.join(", ")
                    }
                ));
                (suggestion, None)
            }
            StrigoError::InvalidVersionFilter(_) => {
                let suggestion = Some(
                    "Pass the major version only, e.g. 'strigo available jdk temurin 21'."
                        .to_string(),
                );
                (suggestion, None)
            }
            StrigoError::ConfigFile(_) | StrigoError::InvalidConfig(_) => {
                let suggestion = Some(
                    "Check strigo.toml, or point STRIGO_CONFIG_PATH to the configuration file."
                        .to_string(),
                );
                (suggestion, None)
            }
            StrigoError::Http(http_err) => {
                let error_string = http_err.to_string();
                let suggestion = if error_string.contains("timeout")
                    || error_string.contains("Timeout")
                {
                    Some("Increase network.timeout_secs in strigo.toml.".to_string())
                } else {
                    Some("Check your internet connection and try again.".to_string())
                };
                let details = Some(format!("HTTP error: {http_err}"));
                (suggestion, details)
            }
            StrigoError::Io(io_err) => {
                let suggestion = match io_err.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        Some("Check the permissions of the install and cache directories.".to_string())
                    }
                    std::io::ErrorKind::NotFound => Some(
                        "Ensure the file or directory exists and the path is correct.".to_string(),
                    ),
                    _ => None,
                };
                let details = Some(format!("I/O error: {io_err}"));
                (suggestion, details)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
