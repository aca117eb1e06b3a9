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
use log::debug;
use std::path::{Path, PathBuf};
use sysinfo::{Disk, Disks};

/// Source of free-space figures for a filesystem.
pub trait SpaceProbe {
    /// Available bytes on the filesystem holding `path`, which must exist.
    fn available_bytes(&self, path: &Path) -> Result<u64>;
}

/// Reads mount points through `sysinfo` and picks the deepest one containing the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProbe;

impl SpaceProbe for SysinfoProbe {
    fn available_bytes(&self, path: &Path) -> Result<u64> {
        let resolved = canonicalize_or_clone(path);
        let disks = Disks::new_with_refreshed_list();

        let Some(disk) = find_best_disk(&resolved, disks.list()) else {
            return Err(StrigoError::SystemError(format!(
                "Unable to determine mount point for {}",
                resolved.display()
            )));
        };

        let available = DiskRecord::available_space(disk);
        debug!(
            "Filesystem at {} has {available} bytes available",
            DiskRecord::mount_point(disk).display()
        );
        Ok(available)
    }
}

fn canonicalize_or_clone(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|err| {
        debug!(
            "Falling back to non-canonical path {} due to error: {err}",
            path.display()
        );
        path.to_path_buf()
    })
}

fn find_best_disk<'a, D: DiskRecord>(target: &Path, disks: &'a [D]) -> Option<&'a D> {
    disks
        .iter()
        .filter(|disk| target.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().components().count())
}

trait DiskRecord {
    fn mount_point(&self) -> &Path;
    fn available_space(&self) -> u64;
}

impl DiskRecord for Disk {
    fn mount_point(&self) -> &Path {
        Disk::mount_point(self)
    }

    fn available_space(&self) -> u64 {
        Disk::available_space(self)
    }
}
