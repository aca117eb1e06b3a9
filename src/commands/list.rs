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

use crate::commands::print_json;
use crate::config::StrigoConfig;
use crate::error::Result;
use crate::storage::InstallLayout;
use colored::Colorize;
use log::debug;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize)]
pub struct ListOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub distributions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<InstalledVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledVersion {
    pub version: String,
    pub path: PathBuf,
    pub active: bool,
}

pub struct ListCommand<'a> {
    config: &'a StrigoConfig,
    layout: InstallLayout,
}

impl<'a> ListCommand<'a> {
    pub fn new(config: &'a StrigoConfig) -> Result<Self> {
        Ok(Self {
            config,
            layout: InstallLayout::new(&config.general.sdk_install_dir),
        })
    }

    pub fn execute(&self, sdk_type: Option<&str>, distribution: Option<&str>, json: bool) -> Result<()> {
        match (sdk_type, distribution) {
            (None, _) => {
                let types = self.installed_types()?;
                if json {
                    return print_json(&ListOutput {
                        types,
                        ..Default::default()
                    });
                }
                print_names("Installed SDK types:", &types, "No SDKs installed");
            }
            (Some(sdk_type), None) => {
                let type_dir = &self.config.sdk_type(sdk_type)?.install_dir;
                let distributions = self.layout.list_distributions(type_dir)?;
                if json {
                    return print_json(&ListOutput {
                        distributions,
                        ..Default::default()
                    });
                }
                print_names(
                    &format!("Installed {sdk_type} distributions:"),
                    &distributions,
                    &format!("No {sdk_type} installed"),
                );
            }
            (Some(sdk_type), Some(distribution)) => {
                let versions = self.installed_versions(sdk_type, distribution)?;
                if json {
                    return print_json(&ListOutput {
                        versions,
                        ..Default::default()
                    });
                }
                print_versions(sdk_type, distribution, &versions);
            }
        }
        Ok(())
    }

    /// Configured SDK types with at least one installed distribution.
    pub fn installed_types(&self) -> Result<Vec<String>> {
        let mut types = Vec::new();
        for (name, sdk_type) in &self.config.sdk_types {
            if !self.layout.list_distributions(&sdk_type.install_dir)?.is_empty() {
                types.push(name.clone());
            }
        }
        Ok(types)
    }

    /// Installed versions of a distribution, newest first, with the active one marked.
    pub fn installed_versions(&self, sdk_type: &str, distribution: &str) -> Result<Vec<InstalledVersion>> {
        let type_dir = &self.config.sdk_type(sdk_type)?.install_dir;
        let active = self.layout.active_target(sdk_type);
        debug!("Active {sdk_type} link points to {active:?}");

        let versions = self
            .layout
            .list_versions(type_dir, distribution)?
            .into_iter()
            .map(|version| {
                let path = self.layout.version_path(type_dir, distribution, &version);
                let active = active.as_ref().is_some_and(|target| target.starts_with(&path));
                InstalledVersion {
                    version,
                    path,
                    active,
                }
            })
            .collect();
        Ok(versions)
    }
}

fn print_names(title: &str, names: &[String], empty: &str) {
    if names.is_empty() {
        println!("{empty}");
        return;
    }
    println!("{}", title.bold());
    for name in names {
        println!("  {name}");
    }
}

fn print_versions(sdk_type: &str, distribution: &str, versions: &[InstalledVersion]) {
    if versions.is_empty() {
        println!("No {sdk_type} {distribution} versions installed");
        println!(
            "Use {} to see what can be installed",
            format!("strigo available {sdk_type} {distribution}").cyan()
        );
        return;
    }

    println!(
        "{}",
        format!("Installed {sdk_type} {distribution} versions:").bold()
    );
    for installed in versions {
        if installed.active {
            println!("  {} {}", "*".green(), installed.version.green().bold());
        } else {
            println!("    {}", installed.version);
        }
    }
}
