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
use crate::platform::read_link_target;
use crate::version::compare_versions;
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// The install tree: `<sdk_install_dir>/<type dir>/<distribution>/<version>/<sdk root>`,
/// plus one `current-<type>` link per SDK type.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    sdk_install_dir: PathBuf,
}

impl InstallLayout {
    pub fn new(sdk_install_dir: impl Into<PathBuf>) -> Self {
        Self {
            sdk_install_dir: sdk_install_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.sdk_install_dir
    }

    pub fn type_dir(&self, type_install_dir: &str) -> PathBuf {
        self.sdk_install_dir.join(type_install_dir)
    }

    pub fn distribution_dir(&self, type_install_dir: &str, distribution: &str) -> PathBuf {
        self.type_dir(type_install_dir).join(distribution)
    }

    pub fn version_path(&self, type_install_dir: &str, distribution: &str, version: &str) -> PathBuf {
        self.distribution_dir(type_install_dir, distribution)
            .join(version)
    }

    pub fn active_link(&self, sdk_type: &str) -> PathBuf {
        self.sdk_install_dir.join(format!("current-{sdk_type}"))
    }

    /// Where `current-<type>` points, if the link exists.
    pub fn active_target(&self, sdk_type: &str) -> Option<PathBuf> {
        read_link_target(&self.active_link(sdk_type))
    }

    pub fn list_distributions(&self, type_install_dir: &str) -> Result<Vec<String>> {
        let mut names = list_dirs(&self.type_dir(type_install_dir))?;
        names.sort();
        Ok(names)
    }

    /// Installed versions, newest first.
    pub fn list_versions(&self, type_install_dir: &str, distribution: &str) -> Result<Vec<String>> {
        let mut versions = list_dirs(&self.distribution_dir(type_install_dir, distribution))?;
        versions.sort_by(|a, b| compare_versions(b, a));
        Ok(versions)
    }

    /// Deletes a version directory and prunes the distribution and type
    /// directories when they become empty. Returns the removed path.
    pub fn remove_version(
        &self,
        type_install_dir: &str,
        distribution: &str,
        version: &str,
    ) -> Result<PathBuf> {
        let path = self.version_path(type_install_dir, distribution, version);
        let type_dir = self.type_dir(type_install_dir);

        if ![type_install_dir, distribution, version]
            .iter()
            .all(|segment| is_plain_segment(segment))
        {
            return Err(StrigoError::SystemError(format!(
                "Refusing to remove directory outside of the install tree: {path:?}"
            )));
        }

        fs::remove_dir_all(&path)?;
        debug!("Removed {path:?}");

        for dir in [self.distribution_dir(type_install_dir, distribution), type_dir] {
            let is_empty = fs::read_dir(&dir)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty {
                break;
            }
            if let Err(e) = fs::remove_dir(&dir) {
                warn!("Failed to remove empty directory {dir:?}: {e}");
                break;
            }
            debug!("Removed empty directory {dir:?}");
        }

        Ok(path)
    }
}

/// The single top-level directory an archive extracted into `version_dir`.
///
/// Anything other than exactly one entry, which must be a directory, fails
/// with `AmbiguousArchiveLayout`.
pub fn resolve_sdk_root(version_dir: &Path) -> Result<PathBuf> {
    let mut found = Vec::new();
    let mut directories = Vec::new();

    for entry in fs::read_dir(version_dir)? {
        let entry = entry?;
        found.push(entry.file_name().to_string_lossy().to_string());
        if entry.file_type()?.is_dir() {
            directories.push(entry.path());
        }
    }

    if found.len() == 1 && directories.len() == 1 {
        return Ok(directories.remove(0));
    }

    found.sort();
    Err(StrigoError::AmbiguousArchiveLayout {
        path: version_dir.to_path_buf(),
        found,
    })
}

/// A single normal path component: no separators, `.` or `..`.
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn list_dirs(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || !entry.file_type()?.is_dir() {
            continue;
        }
        names.push(name);
    }
    Ok(names)
}
