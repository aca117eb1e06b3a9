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
use crate::models::SdkAsset;
use crate::registry::models::ListingEntry;
use crate::version::{MajorVersion, compare_versions, extract_version};
use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// How a catalog is narrowed after deduplication. Every caller picks one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    All,
    ExactVersion(String),
    MajorVersion(MajorVersion),
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::All => write!(f, "*"),
            FilterMode::ExactVersion(version) => write!(f, "{version}"),
            FilterMode::MajorVersion(major) => write!(f, "{major}"),
        }
    }
}

/// Deduplicated assets of one distribution, newest first.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub assets: Vec<SdkAsset>,
    /// Listing paths that were outside the repository path, had no version
    /// or no download URL.
    pub ignored: Vec<String>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn find(&self, version: &str) -> Option<&SdkAsset> {
        self.assets.iter().find(|asset| asset.version == version)
    }

    /// Groups ascending by major version, versions ascending within a group.
    pub fn grouped_by_major(&self) -> Vec<(MajorVersion, Vec<&SdkAsset>)> {
        let mut groups: BTreeMap<MajorVersion, Vec<&SdkAsset>> = BTreeMap::new();
        for asset in &self.assets {
            groups
                .entry(MajorVersion::classify(&asset.version))
                .or_default()
                .push(asset);
        }

        groups
            .into_iter()
            .map(|(major, mut assets)| {
                assets.sort_by(|a, b| compare_versions(&a.version, &b.version));
                (major, assets)
            })
            .collect()
    }
}

pub struct CatalogBuilder {
    repository_path: String,
    needle: String,
}

impl CatalogBuilder {
    pub fn new(repository_path: &str) -> Self {
        let trimmed = repository_path.trim_matches('/');
        // An empty path is the repository root.
        let needle = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        Self {
            repository_path: trimmed.to_string(),
            needle,
        }
    }

    /// Entries must sit under `/<repository path>/`; a sibling such as
    /// `temurin-extra` does not match `temurin`.
    fn is_under_repository(&self, path: &str) -> bool {
        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        normalized.contains(&self.needle)
    }

    pub fn build(&self, entries: Vec<ListingEntry>, filter: &FilterMode) -> Result<Catalog> {
        let mut catalog = Catalog::default();
        let mut seen = HashSet::new();

        for entry in entries {
            if !self.is_under_repository(&entry.path) {
                catalog.ignored.push(entry.path);
                continue;
            }

            if entry.download_url.trim().is_empty() {
                debug!("No download URL for {}", entry.path);
                catalog.ignored.push(entry.path);
                continue;
            }

            let Some(version) = extract_version(&entry.path) else {
                debug!("No version found in {}", entry.path);
                catalog.ignored.push(entry.path);
                continue;
            };

            if !seen.insert(version.clone()) {
                debug!("Skipping duplicate {version} at {}", entry.path);
                continue;
            }

            catalog
                .assets
                .push(SdkAsset::new(version, entry.download_url, &entry.path));
        }

        if !catalog.ignored.is_empty() {
            debug!(
                "Ignored {} listing entries not matching /{}/:",
                catalog.ignored.len(),
                self.repository_path
            );
            for path in &catalog.ignored {
                debug!("   - {path}");
            }
        }

        if catalog.assets.is_empty() {
            return Err(StrigoError::NoVersionsFound {
                path: self.repository_path.clone(),
            });
        }

        let all_versions: Vec<String> = catalog.assets.iter().map(|a| a.version.clone()).collect();
        catalog.assets.retain(|asset| matches_filter(&asset.version, filter));

        if catalog.assets.is_empty() {
            return Err(StrigoError::NoMatchingVersion {
                filter: filter.to_string(),
                path: self.repository_path.clone(),
                available: available_for(filter, all_versions),
            });
        }

        catalog
            .assets
            .sort_by(|a, b| compare_versions(&b.version, &a.version));
        Ok(catalog)
    }
}

fn matches_filter(version: &str, filter: &FilterMode) -> bool {
    match filter {
        FilterMode::All => true,
        FilterMode::ExactVersion(wanted) => version == wanted,
        FilterMode::MajorVersion(major) => MajorVersion::classify(version) == *major,
    }
}

fn available_for(filter: &FilterMode, mut versions: Vec<String>) -> Vec<String> {
    match filter {
        FilterMode::MajorVersion(_) => {
            let mut majors: Vec<MajorVersion> = versions
                .iter()
                .map(|v| MajorVersion::classify(v))
                .collect();
            majors.sort();
            majors.dedup();
            majors.iter().map(ToString::to_string).collect()
        }
        _ => {
            versions.sort_by(|a, b| compare_versions(b, a));
            versions
        }
    }
}
