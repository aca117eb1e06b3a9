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

use log::debug;
use serde::Deserialize;

/// One page of `GET /service/rest/v1/assets`.
///
/// Items stay untyped until [`NexusAssetPage::into_entries`] so one bad item
/// does not reject the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NexusAssetPage {
    pub items: Vec<serde_json::Value>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NexusAsset {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    /// Opaque; not verified.
    #[serde(default)]
    pub checksum: Option<serde_json::Value>,
}

impl NexusAssetPage {
    /// Listing entries of this page, in registry order.
    ///
    /// Items that are not objects or have no path are dropped. An item with a
    /// path but no download URL is kept with an empty URL, and the catalog
    /// reports it as ignored.
    pub fn into_entries(self) -> Vec<ListingEntry> {
        self.items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<NexusAsset>(item) {
                Ok(asset) => ListingEntry::from_asset(asset),
                Err(e) => {
                    debug!("Skipping malformed listing item: {e}");
                    None
                }
            })
            .collect()
    }
}

/// A raw registry listing entry, before any version extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub path: String,
    /// Empty when the registry did not report one.
    pub download_url: String,
}

impl ListingEntry {
    fn from_asset(asset: NexusAsset) -> Option<Self> {
        let Some(path) = asset.path.filter(|path| !path.trim().is_empty()) else {
            debug!(
                "Skipping listing item without a path (downloadUrl: {:?})",
                asset.download_url
            );
            return None;
        };

        Some(Self {
            path,
            download_url: asset.download_url.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let json = r#"{
            "items": [
                {
                    "downloadUrl": "http://nexus/repository/raw/jdk/temurin/a.tar.gz",
                    "path": "jdk/temurin/a.tar.gz",
                    "id": "cmF3",
                    "repository": "raw",
                    "format": "raw",
                    "checksum": { "sha1": "abc", "sha256": "def" }
                }
            ],
            "continuationToken": "next-page"
        }"#;

        let page: NexusAssetPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.continuation_token.as_deref(), Some("next-page"));

        let entries = page.into_entries();
        assert_eq!(
            entries,
            vec![ListingEntry {
                path: "jdk/temurin/a.tar.gz".to_string(),
                download_url: "http://nexus/repository/raw/jdk/temurin/a.tar.gz".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_last_page() {
        let json = r#"{ "items": [], "continuationToken": null }"#;
        let page: NexusAssetPage = serde_json::from_str(json).unwrap();
        assert!(page.items.is_empty());
        assert!(page.continuation_token.is_none());
    }

    #[test]
    fn test_missing_items_is_an_error() {
        assert!(serde_json::from_str::<NexusAssetPage>(r#"{ "assets": [] }"#).is_err());
    }

    #[test]
    fn test_incomplete_items_do_not_reject_page() {
        let json = r#"{
            "items": [
                { "path": "jdk/temurin/jdk-11.0.26_4/a.tar.gz", "downloadUrl": "http://nexus/a" },
                { "path": "jdk/temurin/jdk-11.0.24_8/b.tar.gz" },
                { "downloadUrl": "http://nexus/c" },
                { "path": 42, "downloadUrl": "http://nexus/d" },
                "not an object"
            ]
        }"#;

        let page: NexusAssetPage = serde_json::from_str(json).unwrap();
        let entries = page.into_entries();

        let summary: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.path.as_str(), e.download_url.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("jdk/temurin/jdk-11.0.26_4/a.tar.gz", "http://nexus/a"),
                ("jdk/temurin/jdk-11.0.24_8/b.tar.gz", ""),
            ]
        );
    }
}
