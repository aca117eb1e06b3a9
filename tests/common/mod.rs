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

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary tree with `sdks/`, `cache/` and a `strigo.toml` pointing at them.
pub struct TestTree {
    pub temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestTree {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn sdk_dir(&self) -> PathBuf {
        self.temp_dir.path().join("sdks")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.temp_dir.path().join("cache")
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("strigo.toml")
    }

    /// Writes a config with one nexus registry, `jdk`/`node` types and a
    /// `temurin` distribution stored under `jdk/adoptium/temurin`.
    pub fn write_config(&self, api_url: &str) -> PathBuf {
        let contents = format!(
            r#"
[general]
log_level = "warn"
sdk_install_dir = "{sdks}"
cache_dir = "{cache}"

[network]
timeout_secs = 10
download_attempts = 1
retry_backoff_ms = 0

[registries.nexus]
type = "nexus"
api_url = "{api_url}"

[sdk_types.jdk]
type = "jdk"
install_dir = "jdks"

[sdk_types.node]
type = "node"
install_dir = "nodes"

[sdk_repositories.temurin]
registry = "nexus"
repository = "raw"
type = "jdk"
path = "jdk/adoptium/temurin"
"#,
            sdks = self.sdk_dir().display(),
            cache = self.cache_dir().display(),
        );

        let path = self.config_path();
        fs::write(&path, contents).expect("Failed to write config");
        path
    }
}

/// Builds an in-memory tar.gz with one top-level directory holding `bin/java`
/// and `lib/security/cacerts`.
#[allow(dead_code)]
pub fn jdk_archive(root: &str) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, contents) in [
        (format!("{root}/bin/java"), &b"#!/bin/sh\necho java\n"[..]),
        (format!("{root}/lib/security/cacerts"), &b"jdk trust store"[..]),
        (format!("{root}/release"), &b"JAVA_VERSION=\"21.0.6\"\n"[..]),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents)
            .expect("Failed to append archive entry");
    }

    builder
        .into_inner()
        .expect("Failed to finish tar")
        .finish()
        .expect("Failed to finish gzip")
}

/// Nexus listing page JSON for `(path, download_url)` pairs.
#[allow(dead_code)]
pub fn listing_page(items: &[(&str, &str)], continuation_token: Option<&str>) -> String {
    let items: Vec<serde_json::Value> = items
        .iter()
        .map(|(path, url)| {
            serde_json::json!({
                "path": path,
                "downloadUrl": url,
                "repository": "raw",
                "format": "raw",
            })
        })
        .collect();

    serde_json::json!({
        "items": items,
        "continuationToken": continuation_token,
    })
    .to_string()
}

#[allow(dead_code)]
pub fn assert_dir_missing(path: &Path) {
    assert!(!path.exists(), "{} should not exist", path.display());
}
