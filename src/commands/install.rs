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

use crate::cancellation::signal_token;
use crate::commands::print_json;
use crate::config::StrigoConfig;
use crate::download::AttohttpcClient;
use crate::error::Result;
use crate::install::{InstallOrchestrator, InstallTarget};
use crate::models::{CertificateStatus, InstallOutcome, InstalledSdk};
use crate::registry::client_for;
use crate::storage::SysinfoProbe;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum InstallReport {
    Installed {
        #[serde(flatten)]
        sdk: InstalledSdk,
    },
    AlreadyInstalled {
        path: PathBuf,
    },
}

pub struct InstallCommand<'a> {
    config: &'a StrigoConfig,
    no_progress: bool,
}

impl<'a> InstallCommand<'a> {
    pub fn new(config: &'a StrigoConfig, no_progress: bool) -> Result<Self> {
        Ok(Self {
            config,
            no_progress,
        })
    }

    pub fn execute(&self, sdk_type: &str, distribution: &str, version: &str, json: bool) -> Result<()> {
        let repository = self.config.repository(sdk_type, distribution)?;
        let registry = self.config.registry(&repository.registry)?;
        let timeout = Duration::from_secs(self.config.network.timeout_secs);

        let registry_client = client_for(registry, timeout)?;
        let http_client = Arc::new(AttohttpcClient::with_timeout(timeout));
        let probe = SysinfoProbe;

        let mut orchestrator = InstallOrchestrator::new(
            self.config,
            registry_client.as_ref(),
            http_client,
            &probe,
            signal_token(),
        );
        if self.no_progress || json {
            orchestrator = orchestrator.without_progress();
        }

        let target = InstallTarget::new(sdk_type, distribution, version);
        let outcome = orchestrator.install(&target)?;

        if json {
            let report = match outcome {
                InstallOutcome::Installed(sdk) => InstallReport::Installed { sdk },
                InstallOutcome::AlreadyInstalled { path } => InstallReport::AlreadyInstalled { path },
            };
            return print_json(&report);
        }

        match outcome {
            InstallOutcome::AlreadyInstalled { path } => {
                println!(
                    "{sdk_type} {distribution} {version} is already installed at {}",
                    path.display()
                );
            }
            InstallOutcome::Installed(sdk) => {
                println!(
                    "{} Installed {sdk_type} {distribution} {version}",
                    "✓".green()
                );
                println!("  Location: {}", sdk.sdk_root.display());
                if let CertificateStatus::Failed(reason) = &sdk.certificates {
                    println!(
                        "  {} certificate setup failed: {reason}",
                        "Warning:".yellow()
                    );
                } else if sdk.certificates == CertificateStatus::Configured {
                    println!("  Certificates: configured");
                }
                println!(
                    "\nActivate it with {}",
                    format!("strigo use {sdk_type} {distribution} {version}").cyan()
                );
            }
        }

        Ok(())
    }
}
