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
use crate::models::SdkAsset;
use crate::registry::{Catalog, FilterMode, RegistryClient, client_for, fetch_catalog};
use crate::version::MajorVersion;
use colored::Colorize;
use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use log::debug;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Default, Serialize)]
pub struct AvailableOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub distributions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<SdkAsset>,
}

pub struct AvailableCommand<'a> {
    config: &'a StrigoConfig,
}

impl<'a> AvailableCommand<'a> {
    pub fn new(config: &'a StrigoConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(
        &self,
        sdk_type: Option<&str>,
        distribution: Option<&str>,
        major: Option<&str>,
        json: bool,
    ) -> Result<()> {
        match (sdk_type, distribution) {
            (None, _) => self.show_types(json),
            (Some(sdk_type), None) => self.show_distributions(sdk_type, json),
            (Some(sdk_type), Some(distribution)) => {
                let repository = self.config.repository(sdk_type, distribution)?;
                let registry = self.config.registry(&repository.registry)?;
                let client = client_for(
                    registry,
                    Duration::from_secs(self.config.network.timeout_secs),
                )?;
                self.show_versions(client.as_ref(), sdk_type, distribution, major, json)
            }
        }
    }

    fn show_types(&self, json: bool) -> Result<()> {
        let types: Vec<String> = self.config.sdk_types.keys().cloned().collect();

        if json {
            return print_json(&AvailableOutput {
                types,
                ..Default::default()
            });
        }

        if types.is_empty() {
            println!("No SDK types configured");
            return Ok(());
        }

        println!("{}", "Available SDK types:".bold());
        for name in &types {
            println!("  {name}");
        }
        Ok(())
    }

    fn show_distributions(&self, sdk_type: &str, json: bool) -> Result<()> {
        self.config.sdk_type(sdk_type)?;
        let distributions = self.config.distributions_for(sdk_type);

        if json {
            return print_json(&AvailableOutput {
                distributions,
                ..Default::default()
            });
        }

        if distributions.is_empty() {
            println!("No distributions configured for {sdk_type}");
            return Ok(());
        }

        println!("{}", format!("Available {sdk_type} distributions:").bold());
        for name in &distributions {
            println!("  {name}");
        }
        Ok(())
    }

    /// Lists the catalog of one distribution, narrowed to `major` when given.
    pub fn show_versions(
        &self,
        client: &dyn RegistryClient,
        sdk_type: &str,
        distribution: &str,
        major: Option<&str>,
        json: bool,
    ) -> Result<()> {
        let repository = self.config.repository(sdk_type, distribution)?;
        let filter = match major {
            Some(major) => FilterMode::MajorVersion(MajorVersion::from_filter(major)?),
            None => FilterMode::All,
        };
        debug!("Listing {sdk_type}/{distribution} with filter {filter}");

        let catalog = fetch_catalog(client, repository, &filter)?;

        if json {
            return print_json(&AvailableOutput {
                versions: catalog.assets,
                ..Default::default()
            });
        }

        println!(
            "{}",
            format!("Available versions of {sdk_type} {distribution}:").bold()
        );
        println!("{}", render_catalog(&catalog));
        println!(
            "\nInstall with {}",
            format!("strigo install {sdk_type} {distribution} <version>").cyan()
        );
        Ok(())
    }
}

fn render_catalog(catalog: &Catalog) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Major", "Version", "Archive"]);

    for (major, assets) in catalog.grouped_by_major() {
        for (index, asset) in assets.iter().enumerate() {
            let label = if index == 0 {
                major.to_string()
            } else {
                String::new()
            };
            table.add_row(vec![label, asset.version.clone(), asset.filename.clone()]);
        }
    }

    table
}
