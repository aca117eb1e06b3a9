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

//! Remote artifact registries and the catalog built from their listings.

pub mod catalog;
pub mod client;
pub mod models;

pub use catalog::{Catalog, CatalogBuilder, FilterMode};
pub use client::NexusClient;
pub use models::ListingEntry;

use crate::config::{Registry, SdkRepository};
use crate::error::{Result, StrigoError};
use std::time::Duration;

pub trait RegistryClient {
    /// Raw listing for a repository path, in registry order.
    fn list(&self, repository: &SdkRepository) -> Result<Vec<ListingEntry>>;
}

/// Selects the client implementation for a registry `type`.
pub fn client_for(registry: &Registry, timeout: Duration) -> Result<Box<dyn RegistryClient>> {
    match registry.registry_type.as_str() {
        "nexus" => Ok(Box::new(NexusClient::new(registry, timeout))),
        other => Err(StrigoError::UnsupportedRegistryType(other.to_string())),
    }
}

/// Lists a repository and builds its catalog with the given filter.
pub fn fetch_catalog(
    client: &dyn RegistryClient,
    repository: &SdkRepository,
    filter: &FilterMode,
) -> Result<Catalog> {
    let entries = client.list(repository)?;
    CatalogBuilder::new(&repository.path).build(entries, filter)
}
