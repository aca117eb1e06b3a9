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

use crate::cancellation::CancellationToken;
use crate::error::{Result, StrigoError};
use flate2::read::GzDecoder;
use log::debug;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Component, Path};
use tar::{Archive, EntryType};
use xz2::read::XzDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    TarXz,
}

impl ArchiveFormat {
    /// Detects the compression format from the archive file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_lowercase();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(ArchiveFormat::TarGz)
        } else if name.ends_with(".tar.xz") {
            Ok(ArchiveFormat::TarXz)
        } else {
            Err(StrigoError::UnsupportedArchive(path.display().to_string()))
        }
    }
}

/// Summary of a finished extraction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStats {
    pub files: usize,
    pub directories: usize,
    pub skipped: usize,
    pub bytes: u64,
}

/// Extracts a compressed tar archive into `destination`.
///
/// The destination must be absolute. Every entry is validated before it is
/// written and extraction stops at the first entry that would land outside
/// the destination. Nothing is cleaned up on failure; the caller owns the
/// destination directory.
pub fn extract_archive(
    archive: &Path,
    destination: &Path,
    cancel: &CancellationToken,
) -> Result<ExtractionStats> {
    if !destination.is_absolute() {
        return Err(StrigoError::InvalidDestination(destination.to_path_buf()));
    }

    let format = ArchiveFormat::from_path(archive)?;
    debug!(
        "Extracting {} ({format:?}) to {}",
        archive.display(),
        destination.display()
    );

    fs::create_dir_all(destination)?;

    let file = BufReader::new(File::open(archive)?);
    let reader: Box<dyn Read> = match format {
        ArchiveFormat::TarGz => Box::new(GzDecoder::new(file)),
        ArchiveFormat::TarXz => Box::new(XzDecoder::new(file)),
    };

    let stats = unpack_tar(reader, destination, cancel)?;
    debug!(
        "Extraction completed: {} files, {} directories, {} skipped, {} bytes",
        stats.files, stats.directories, stats.skipped, stats.bytes
    );
    Ok(stats)
}

fn unpack_tar<R: Read>(
    reader: R,
    destination: &Path,
    cancel: &CancellationToken,
) -> Result<ExtractionStats> {
    let mut archive = Archive::new(reader);
    let mut stats = ExtractionStats::default();

    for entry in archive.entries().map_err(stream_error)? {
        cancel.check("extraction")?;

        let mut entry = entry.map_err(stream_error)?;
        let entry_path = entry.path().map_err(stream_error)?.into_owned();

        validate_entry_path(&entry_path)?;
        let target = destination.join(&entry_path);
        if !target.starts_with(destination) {
            return Err(StrigoError::PathTraversal(entry_path.display().to_string()));
        }

        let entry_type = entry.header().entry_type();
        match entry_type {
            EntryType::Directory => {
                fs::create_dir_all(&target)?;
                set_mode(&target, 0o755)?;
                stats.directories += 1;
            }
            EntryType::Regular | EntryType::Continuous => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mode = entry.header().mode().unwrap_or(0o644);
                let mut output = File::create(&target)?;
                let written = io::copy(&mut entry, &mut output).map_err(stream_error)?;
                drop(output);
                set_mode(&target, mode & 0o777)?;

                stats.files += 1;
                stats.bytes += written;
            }
            other => {
                debug!(
                    "Skipping unsupported entry type {other:?}: {}",
                    entry_path.display()
                );
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// Rejects entry paths that are absolute or climb out with `..`.
fn validate_entry_path(path: &Path) -> Result<()> {
    for component in path.components() {
        match component {
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(StrigoError::PathTraversal(path.display().to_string()));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    Ok(())
}

fn stream_error(err: io::Error) -> StrigoError {
    StrigoError::ExtractionFailed(err.to_string())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
