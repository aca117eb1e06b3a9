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
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Staging area for downloaded archives: `<cache>/<type>/<distribution>/<version>/<file>`.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_dir(&self, sdk_type: &str, distribution: &str, version: &str) -> PathBuf {
        self.root.join(sdk_type).join(distribution).join(version)
    }

    /// Creates the entry directory and returns where the archive is staged.
    pub fn prepare(
        &self,
        sdk_type: &str,
        distribution: &str,
        version: &str,
        archive_filename: &str,
    ) -> Result<PathBuf> {
        let file_name = Path::new(archive_filename)
            .file_name()
            .filter(|name| *name != "." && *name != "..")
            .ok_or_else(|| {
                StrigoError::SystemError(format!("Invalid archive file name: {archive_filename}"))
            })?;

        let dir = self.entry_dir(sdk_type, distribution, version);
        fs::create_dir_all(&dir)?;
        Ok(dir.join(file_name))
    }

    /// A non-empty archive left by an earlier run.
    pub fn is_staged(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Drops a staged archive regardless of `keep_cache`, e.g. one that failed to extract.
    pub fn discard(&self, path: &Path) {
        self.cleanup(path, false);
    }

    /// Removes the staged archive unless `keep_cache` is set, then prunes
    /// directories left empty, stopping at the first non-empty one or at the
    /// cache root. Failures are logged, never returned.
    pub fn cleanup(&self, path: &Path, keep_cache: bool) {
        if keep_cache {
            debug!("Keeping cached archive {path:?}");
            return;
        }

        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!("Failed to remove cached archive {path:?}: {e}");
                return;
            }
            debug!("Removed cached archive {path:?}");
        }

        if let Some(parent) = path.parent() {
            self.prune_empty_dirs(parent);
        }
    }

    /// Deletes a whole cache entry, used when an installed version is removed.
    pub fn remove_entry(&self, sdk_type: &str, distribution: &str, version: &str) {
        let dir = self.entry_dir(sdk_type, distribution, version);
        if !dir.exists() {
            return;
        }

        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!("Removed cache entry {dir:?}");
                if let Some(parent) = dir.parent() {
                    self.prune_empty_dirs(parent);
                }
            }
            Err(e) => warn!("Failed to remove cache entry {dir:?}: {e}"),
        }
    }

    fn prune_empty_dirs(&self, start: &Path) {
        let mut current = start.to_path_buf();

        while current != self.root && current.starts_with(&self.root) {
            let is_empty = match fs::read_dir(&current) {
                Ok(mut entries) => entries.next().is_none(),
                Err(e) => {
                    warn!("Failed to inspect cache directory {current:?}: {e}");
                    return;
                }
            };
            if !is_empty {
                return;
            }

            if let Err(e) = fs::remove_dir(&current) {
                warn!("Failed to remove empty cache directory {current:?}: {e}");
                return;
            }
            debug!("Removed empty cache directory {current:?}");

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return,
            }
        }
    }
}
