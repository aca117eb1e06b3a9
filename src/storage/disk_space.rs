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
use crate::storage::disk_probe::SpaceProbe;
use log::debug;
use std::path::{Path, PathBuf};

/// Free space must be at least this multiple of the archive size: the
/// archive and its extracted copy both have to fit.
pub const SAFETY_FACTOR: u64 = 2;

pub struct SpaceGuard<'a> {
    probe: &'a dyn SpaceProbe,
}

impl<'a> SpaceGuard<'a> {
    pub fn new(probe: &'a dyn SpaceProbe) -> Self {
        Self { probe }
    }

    /// Fails with `InsufficientSpace` when fewer than `required_bytes * 2`
    /// bytes are free on the filesystem that will hold `path`. Exactly twice
    /// the size passes.
    pub fn check_space(&self, required_bytes: u64, path: &Path) -> Result<()> {
        let target = nearest_existing_ancestor(path);
        let available = self.probe.available_bytes(&target)?;
        let needed = required_bytes.saturating_mul(SAFETY_FACTOR);

        debug!(
            "Disk space check at {target:?} for {path:?}: available={available}, required={needed}"
        );

        if available < needed {
            return Err(StrigoError::InsufficientSpace {
                path: path.to_path_buf(),
                required: needed,
                available,
            });
        }

        Ok(())
    }
}

fn nearest_existing_ancestor(path: &Path) -> PathBuf {
    path.ancestors()
        .find(|candidate| !candidate.as_os_str().is_empty() && candidate.exists())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
