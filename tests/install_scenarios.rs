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

mod common;

use common::{TestTree, assert_dir_missing, jdk_archive, listing_page};
use mockito::{Matcher, Mock, Server};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use strigo::cancellation::CancellationToken;
use strigo::config::StrigoConfig;
use strigo::download::AttohttpcClient;
use strigo::error::{Result, StrigoError};
use strigo::install::{InstallOrchestrator, InstallStage, InstallTarget};
use strigo::models::{CertificateStatus, InstallOutcome};
use strigo::registry::client_for;
use strigo::storage::{CacheStore, InstallLayout, SpaceProbe};

const ARCHIVE_PATH: &str = "/repository/raw/jdk/adoptium/temurin/jdk-21.0.6_7/OpenJDK21U-jdk_x64_linux_hotspot_21.0.6_7.tar.gz";

struct PlentyOfSpace;

impl SpaceProbe for PlentyOfSpace {
    fn available_bytes(&self, _path: &Path) -> Result<u64> {
        Ok(u64::MAX / 4)
    }
}

fn mock_listing(server: &mut Server, hits: usize) -> Mock {
    let download_url = format!("{}{ARCHIVE_PATH}", server.url());
    server
        .mock("GET", "/service/rest/v1/assets")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing_page(
            &[(
                "jdk/adoptium/temurin/jdk-21.0.6_7/OpenJDK21U-jdk_x64_linux_hotspot_21.0.6_7.tar.gz",
                download_url.as_str(),
            )],
            None,
        ))
        .expect(hits)
        .create()
}

fn load_config(tree: &TestTree, server: &Server) -> StrigoConfig {
    let api_url = format!(
        "{}/service/rest/v1/assets?repository={{repository}}",
        server.url()
    );
    StrigoConfig::load_from(&tree.write_config(&api_url)).unwrap()
}

fn install(config: &StrigoConfig) -> Result<InstallOutcome> {
    let registry = config.registry("nexus")?;
    let client = client_for(registry, Duration::from_secs(10))?;
    let orchestrator = InstallOrchestrator::new(
        config,
        client.as_ref(),
        Arc::new(AttohttpcClient::with_timeout(Duration::from_secs(10))),
        &PlentyOfSpace,
        CancellationToken::new(),
    )
    .without_progress();

    orchestrator.install(&InstallTarget::new("jdk", "temurin", "21.0.6_7"))
}

#[test]
fn test_install_from_registry_then_reinstall() {
    let mut server = Server::new();
    let tree = TestTree::new();
    let config = load_config(&tree, &server);

    let listing = mock_listing(&mut server, 1);
    let archive = server
        .mock("GET", ARCHIVE_PATH)
        .with_status(200)
        .with_header("content-type", "application/gzip")
        .with_body(jdk_archive("jdk-21.0.6+7"))
        .expect(1)
        .create();

    let sdk = match install(&config).unwrap() {
        InstallOutcome::Installed(sdk) => sdk,
        other => panic!("expected a fresh install, got {other:?}"),
    };

    let version_path = InstallLayout::new(tree.sdk_dir()).version_path("jdks", "temurin", "21.0.6_7");
    assert_eq!(sdk.version_path, version_path);
    assert_eq!(sdk.sdk_root, version_path.join("jdk-21.0.6+7"));
    assert!(sdk.sdk_root.join("bin/java").is_file());
    assert_eq!(sdk.certificates, CertificateStatus::NotRequired);

    // keep_cache is off, so the staged archive and its directories are gone.
    assert_dir_missing(
        &CacheStore::new(tree.cache_dir()).entry_dir("jdk", "temurin", "21.0.6_7"),
    );

    match install(&config).unwrap() {
        InstallOutcome::AlreadyInstalled { path } => assert_eq!(path, version_path),
        other => panic!("expected AlreadyInstalled, got {other:?}"),
    }

    listing.assert();
    archive.assert();
}

#[test]
fn test_corrupt_archive_leaves_nothing_behind() {
    let mut server = Server::new();
    let tree = TestTree::new();
    let config = load_config(&tree, &server);

    let _listing = mock_listing(&mut server, 1);
    let _archive = server
        .mock("GET", ARCHIVE_PATH)
        .with_status(200)
        .with_body("this is not a gzip stream")
        .create();

    match install(&config) {
        Err(StrigoError::InstallFailed { stage, source }) => {
            assert_eq!(stage, InstallStage::Extracted);
            assert!(matches!(*source, StrigoError::ExtractionFailed(_)));
        }
        other => panic!("expected an extraction failure, got {other:?}"),
    }

    let layout = InstallLayout::new(tree.sdk_dir());
    assert_dir_missing(&layout.version_path("jdks", "temurin", "21.0.6_7"));
    assert_dir_missing(&CacheStore::new(tree.cache_dir()).entry_dir("jdk", "temurin", "21.0.6_7"));
}

#[test]
fn test_download_http_error_is_not_installed() {
    let mut server = Server::new();
    let tree = TestTree::new();
    let config = load_config(&tree, &server);

    let _listing = mock_listing(&mut server, 1);
    let _archive = server.mock("GET", ARCHIVE_PATH).with_status(404).create();

    let err = install(&config).unwrap_err();
    assert!(matches!(err.root_cause(), StrigoError::Download { .. }));
    assert_eq!(strigo::error::get_exit_code(&err), 20);

    let layout = InstallLayout::new(tree.sdk_dir());
    assert_dir_missing(&layout.version_path("jdks", "temurin", "21.0.6_7"));
}

#[test]
fn test_unknown_version_reports_available() {
    let mut server = Server::new();
    let tree = TestTree::new();
    let config = load_config(&tree, &server);
    let _listing = mock_listing(&mut server, 1);

    let registry = config.registry("nexus").unwrap();
    let client = client_for(registry, Duration::from_secs(10)).unwrap();
    let orchestrator = InstallOrchestrator::new(
        &config,
        client.as_ref(),
        Arc::new(AttohttpcClient::new()),
        &PlentyOfSpace,
        CancellationToken::new(),
    )
    .without_progress();

    match orchestrator.install(&InstallTarget::new("jdk", "temurin", "21.0.5_11")) {
        Err(StrigoError::NoMatchingVersion { available, .. }) => {
            assert_eq!(available, vec!["21.0.6_7"]);
        }
        other => panic!("expected NoMatchingVersion, got {other:?}"),
    }
    assert_dir_missing(
        &InstallLayout::new(tree.sdk_dir()).version_path("jdks", "temurin", "21.0.6_7"),
    );
}
