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
use crate::error::{Result, StrigoError};
use crate::platform::remove_link;
use crate::storage::{CacheStore, InstallLayout};
use colored::Colorize;
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalReport {
    pub removed: PathBuf,
    pub active_link_removed: bool,
    pub cache_cleaned: bool,
}

pub struct RemoveCommand<'a> {
    config: &'a StrigoConfig,
}

impl<'a> RemoveCommand<'a> {
    pub fn new(config: &'a StrigoConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(
        &self,
        sdk_type: &str,
        distribution: &str,
        version: &str,
        clean_cache: bool,
        json: bool,
    ) -> Result<()> {
        let report = self.remove(sdk_type, distribution, version, clean_cache)?;

        if json {
            return print_json(&report);
        }

        println!(
            "{} Removed {sdk_type} {distribution} {version}",
            "✓".green()
        );
        if report.active_link_removed {
            println!(
                "  It was the active {sdk_type}; run {} to pick another version",
                format!("strigo use {sdk_type} <distribution> <version>").cyan()
            );
        }
        if report.cache_cleaned {
            println!("  Cached archive removed");
        }
        Ok(())
    }

    pub fn remove(
        &self,
        sdk_type: &str,
        distribution: &str,
        version: &str,
        clean_cache: bool,
    ) -> Result<RemovalReport> {
        let type_dir = &self.config.sdk_type(sdk_type)?.install_dir;
        let layout = InstallLayout::new(&self.config.general.sdk_install_dir);
        let version_path = layout.version_path(type_dir, distribution, version);

        if !version_path.is_dir() {
            return Err(StrigoError::NotInstalled {
                sdk_type: sdk_type.to_string(),
                distribution: distribution.to_string(),
                version: version.to_string(),
            });
        }

        // The link goes first so it never dangles.
        let points_here = layout
            .active_target(sdk_type)
            .is_some_and(|target| target.starts_with(&version_path));
        let active_link_removed = points_here && remove_link(&layout.active_link(sdk_type))?;
        if active_link_removed {
            debug!("Removed active link for {sdk_type}");
        }

        let removed = layout.remove_version(type_dir, distribution, version)?;
        info!("Removed {}", removed.display());

        if clean_cache {
            CacheStore::new(&self.config.general.cache_dir).remove_entry(
                sdk_type,
                distribution,
                version,
            );
        }

        Ok(RemovalReport {
            removed,
            active_link_removed,
            cache_cleaned: clean_cache,
        })
    }
}
