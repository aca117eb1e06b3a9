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

//! Turns one registry asset into an installed SDK.
//!
//! The orchestrator walks a fixed sequence of stages:
//! size probe, space check, staging, download, extraction, cache reconcile
//! and (for JDKs) certificate setup. Any failure is reported as
//! `InstallFailed` carrying the stage that was being entered. A failure at
//! or after extraction removes the version directory again.

use crate::archive::extract_archive;
use crate::cancellation::CancellationToken;
use crate::certificates::CertificateInstaller;
use crate::config::StrigoConfig;
use crate::download::{HttpClient, HttpFileDownloader, IndicatifProgressReporter, probe_size};
use crate::error::{Result, StrigoError};
use crate::models::{CertificateStatus, DownloadRequest, InstallOutcome, InstalledSdk};
use crate::registry::{FilterMode, RegistryClient, fetch_catalog};
use crate::storage::{CacheStore, InstallLayout, SpaceGuard, SpaceProbe, resolve_sdk_root};
use log::{debug, info, warn};
use retry::{OperationResult, retry_with_index};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Idle,
    SizeProbed,
    SpaceVerified,
    Staged,
    Downloaded,
    Extracted,
    CacheReconciled,
    CertsConfigured,
    Done,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallStage::Idle => "idle",
            InstallStage::SizeProbed => "size probe",
            InstallStage::SpaceVerified => "space check",
            InstallStage::Staged => "staging",
            InstallStage::Downloaded => "download",
            InstallStage::Extracted => "extraction",
            InstallStage::CacheReconciled => "cache reconcile",
            InstallStage::CertsConfigured => "certificate setup",
            InstallStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What the user asked to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub sdk_type: String,
    pub distribution: String,
    pub version: String,
}

impl InstallTarget {
    pub fn new(
        sdk_type: impl Into<String>,
        distribution: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            sdk_type: sdk_type.into(),
            distribution: distribution.into(),
            version: version.into(),
        }
    }
}

pub struct InstallOrchestrator<'a> {
    config: &'a StrigoConfig,
    registry: &'a dyn RegistryClient,
    http_client: Arc<dyn HttpClient>,
    space_probe: &'a dyn SpaceProbe,
    cancel: CancellationToken,
    show_progress: bool,
}

impl<'a> InstallOrchestrator<'a> {
    pub fn new(
        config: &'a StrigoConfig,
        registry: &'a dyn RegistryClient,
        http_client: Arc<dyn HttpClient>,
        space_probe: &'a dyn SpaceProbe,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            registry,
            http_client,
            space_probe,
            cancel,
            show_progress: true,
        }
    }

    /// Disables the terminal progress bar, e.g. for `--json` output.
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Resolves `target` against the registry and installs it.
    ///
    /// An existing version directory short-circuits to `AlreadyInstalled`
    /// without contacting the registry.
    pub fn install(&self, target: &InstallTarget) -> Result<InstallOutcome> {
        let repository = self
            .config
            .repository(&target.sdk_type, &target.distribution)?;
        let sdk_type = self.config.sdk_type(&target.sdk_type)?;

        let layout = InstallLayout::new(&self.config.general.sdk_install_dir);
        let install_path =
            layout.version_path(&sdk_type.install_dir, &target.distribution, &target.version);

        if install_path.exists() {
            info!(
                "{} {} {} is already installed at {}",
                target.sdk_type,
                target.distribution,
                target.version,
                install_path.display()
            );
            return Ok(InstallOutcome::AlreadyInstalled { path: install_path });
        }

        let filter = FilterMode::ExactVersion(target.version.clone());
        let catalog = fetch_catalog(self.registry, repository, &filter)?;
        let asset = catalog.find(&target.version).cloned().ok_or_else(|| {
            StrigoError::NoMatchingVersion {
                filter: filter.to_string(),
                path: repository.path.clone(),
                available: Vec::new(),
            }
        })?;

        let request = DownloadRequest {
            sdk_type: target.sdk_type.clone(),
            distribution: target.distribution.clone(),
            version: target.version.clone(),
            asset,
            cache_dir: self.config.general.cache_dir.clone(),
            install_path,
            keep_cache: self.config.general.keep_cache,
            certificates: self.config.certificates_for(&target.sdk_type),
        };

        self.execute(&request).map(InstallOutcome::Installed)
    }

    /// Downloads, extracts and configures one asset.
    pub fn execute(&self, request: &DownloadRequest) -> Result<InstalledSdk> {
        if let Some(certificates) = &request.certificates {
            certificates.validate()?;
        }

        let mut stage = InstallStage::Idle;
        let result = self.run_stages(request, &mut stage);

        result.map_err(|source| {
            warn!("Installation of {} failed during {stage}", request.version);
            StrigoError::InstallFailed {
                stage,
                source: Box::new(source),
            }
        })
    }

    fn run_stages(&self, request: &DownloadRequest, stage: &mut InstallStage) -> Result<InstalledSdk> {
        let url = request.asset.download_url.as_str();

        *stage = InstallStage::SizeProbed;
        self.cancel.check("install")?;
        let size = request
            .asset
            .size
            .or_else(|| probe_size(self.http_client.as_ref(), url));

        *stage = InstallStage::SpaceVerified;
        match size {
            Some(bytes) => {
                let guard = SpaceGuard::new(self.space_probe);
                guard.check_space(bytes, &request.cache_dir)?;
                guard.check_space(bytes, &request.install_path)?;
            }
            None => warn!("Size of {url} is unknown; skipping disk space check"),
        }

        *stage = InstallStage::Staged;
        let cache = CacheStore::new(&request.cache_dir);
        let archive = cache.prepare(
            &request.sdk_type,
            &request.distribution,
            &request.version,
            &request.asset.filename,
        )?;

        *stage = InstallStage::Downloaded;
        if cache.is_staged(&archive) {
            info!("Reusing cached archive {}", archive.display());
        } else {
            info!("Downloading {} {}", request.distribution, request.version);
            self.download(url, &archive, &request.asset.filename)?;
        }

        *stage = InstallStage::Extracted;
        let sdk_root = match self.extract(&archive, &request.install_path) {
            Ok(sdk_root) => sdk_root,
            Err(e) => {
                remove_version_dir(&request.install_path);
                if !matches!(e, StrigoError::Cancelled(_)) {
                    cache.discard(&archive);
                }
                return Err(e);
            }
        };

        *stage = InstallStage::CacheReconciled;
        cache.cleanup(&archive, request.keep_cache);

        let certificates = match &request.certificates {
            None => CertificateStatus::NotRequired,
            Some(config) => {
                *stage = InstallStage::CertsConfigured;
                match CertificateInstaller::install(&sdk_root, config) {
                    Ok(_) => CertificateStatus::Configured,
                    Err(e) => {
                        warn!("Certificate setup failed for {}: {e}", sdk_root.display());
                        CertificateStatus::Failed(e.to_string())
                    }
                }
            }
        };

        *stage = InstallStage::Done;
        info!(
            "Installed {} {} {} at {}",
            request.sdk_type,
            request.distribution,
            request.version,
            sdk_root.display()
        );

        Ok(InstalledSdk {
            sdk_type: request.sdk_type.clone(),
            distribution: request.distribution.clone(),
            version: request.version.clone(),
            version_path: request.install_path.clone(),
            sdk_root,
            certificates,
        })
    }

    /// Downloads with `network.download_attempts` tries and exponential
    /// backoff starting at `network.retry_backoff_ms`. Cancellation is never retried.
    fn download(&self, url: &str, archive: &Path, filename: &str) -> Result<()> {
        let attempts = self.config.network.download_attempts.max(1);
        let delays = backoff_delays(self.config.network.retry_backoff_ms, attempts);

        retry_with_index(delays, |current_try| {
            let mut downloader = HttpFileDownloader::new(self.http_client.clone());
            if self.show_progress {
                downloader = downloader
                    .with_progress_reporter(Box::new(IndicatifProgressReporter::new(filename)));
            }

            match downloader.download(url, archive, &self.cancel) {
                Ok(_) => OperationResult::Ok(()),
                Err(e @ StrigoError::Cancelled(_)) => OperationResult::Err(e),
                Err(e) => {
                    if current_try < u64::from(attempts) {
                        warn!("Download attempt {current_try}/{attempts} failed: {e}. Retrying...");
                    }
                    OperationResult::Retry(e)
                }
            }
        })
        .map_err(|e| e.error)
    }

    fn extract(&self, archive: &Path, install_path: &Path) -> Result<PathBuf> {
        let stats = extract_archive(archive, install_path, &self.cancel)?;
        debug!("Extracted {} files into {}", stats.files, install_path.display());
        resolve_sdk_root(install_path)
    }
}

/// Delays between download attempts: `base`, `2 * base`, `4 * base`, ...
fn backoff_delays(base_ms: u64, attempts: u32) -> Vec<Duration> {
    (0..attempts.saturating_sub(1))
        .map(|retry| Duration::from_millis(base_ms.saturating_mul(1u64 << retry.min(16))))
        .collect()
}

fn remove_version_dir(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_dir_all(path) {
        Ok(()) => debug!("Rolled back {}", path.display()),
        Err(e) => warn!("Failed to remove {} after a failed install: {e}", path.display()),
    }
}
