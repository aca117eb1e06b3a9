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

//! Platform-specific symlink operations.

use crate::error::{Result, StrigoError};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Create a symlink (Unix)
#[cfg(unix)]
pub fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Create a symlink (Windows)
#[cfg(windows)]
pub fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Check if a path is a symlink. Missing paths are not symlinks.
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false)
}

/// Returns the target of `link`, or `None` when it is not a symlink.
pub fn read_link_target(link: &Path) -> Option<PathBuf> {
    if !is_symlink(link) {
        return None;
    }
    fs::read_link(link).ok()
}

/// Points `link` at `target`, replacing any previous link in one rename.
///
/// The new link is created next to the old one under a unique name, so a
/// reader sees either the previous target or the new one.
pub fn switch_link(target: &Path, link: &Path) -> Result<()> {
    let parent = link.parent().ok_or_else(|| {
        StrigoError::SystemError(format!("Link path has no parent: {}", link.display()))
    })?;
    let name = link
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            StrigoError::SystemError(format!("Invalid link name: {}", link.display()))
        })?;

    if link.exists() && !is_symlink(link) {
        return Err(StrigoError::SystemError(format!(
            "Refusing to replace {} because it is not a symlink",
            link.display()
        )));
    }

    fs::create_dir_all(parent)?;
    let staging = parent.join(format!(".{name}-{}", Uuid::new_v4()));
    create_symlink(target, &staging)?;

    if let Err(err) = fs::rename(&staging, link) {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }

    debug!("Linked {} -> {}", link.display(), target.display());
    Ok(())
}

/// Removes `link` if it is a symlink. Returns whether anything was removed.
pub fn remove_link(link: &Path) -> Result<bool> {
    if !is_symlink(link) {
        return Ok(false);
    }
    fs::remove_file(link)?;
    Ok(true)
}
