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
use crate::config::{StrigoConfig, home_env_var};
use crate::error::{Result, StrigoError};
use crate::platform::switch_link;
use crate::storage::{InstallLayout, resolve_sdk_root};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatedSdk {
    pub sdk_type: String,
    pub distribution: String,
    pub version: String,
    pub sdk_root: PathBuf,
    pub link: PathBuf,
    pub home_var: String,
}

impl ActivatedSdk {
    /// Shell lines to evaluate, e.g. `eval "$(strigo use jdk temurin 21.0.6_7)"`.
    pub fn exports(&self) -> Vec<String> {
        vec![
            format!("export {}={}", self.home_var, self.link.display()),
            format!("export PATH=${}/bin:$PATH", self.home_var),
        ]
    }
}

pub struct UseCommand<'a> {
    config: &'a StrigoConfig,
}

impl<'a> UseCommand<'a> {
    pub fn new(config: &'a StrigoConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, sdk_type: &str, distribution: &str, version: &str, json: bool) -> Result<()> {
        let activated = self.activate(sdk_type, distribution, version)?;

        if json {
            return print_json(&activated);
        }

        eprintln!(
            "Now using {sdk_type} {distribution} {version} ({})",
            activated.sdk_root.display()
        );
        for line in activated.exports() {
            println!("{line}");
        }
        Ok(())
    }

    /// Points `current-<type>` at the SDK root of an installed version.
    pub fn activate(&self, sdk_type: &str, distribution: &str, version: &str) -> Result<ActivatedSdk> {
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

        let sdk_root = resolve_sdk_root(&version_path)?;
        let link = layout.active_link(sdk_type);
        switch_link(&sdk_root, &link)?;
        log::info!("Activated {} -> {}", link.display(), sdk_root.display());

        Ok(ActivatedSdk {
            sdk_type: sdk_type.to_string(),
            distribution: distribution.to_string(),
            version: version.to_string(),
            sdk_root,
            link,
            home_var: home_env_var(sdk_type),
        })
    }
}
