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

use crate::config::{Registry, SdkRepository};
use crate::error::{Result, StrigoError};
use crate::registry::RegistryClient;
use crate::registry::models::{ListingEntry, NexusAssetPage};
use crate::user_agent;
use attohttpc::Session;
use log::{debug, trace, warn};
use std::time::Duration;

/// Upper bound on followed continuation tokens.
const MAX_PAGES: usize = 1000;

/// Lists assets through the Nexus 3 REST API.
///
/// Listing is never retried: a failure surfaces immediately with the URL
/// that was requested.
pub struct NexusClient {
    session: Session,
    api_url: String,
    max_pages: usize,
}

impl NexusClient {
    pub fn new(registry: &Registry, timeout: Duration) -> Self {
        let mut session = Session::new();
        session.header("User-Agent", user_agent::registry_client());
        session.timeout(timeout);
        session.proxy_settings(attohttpc::ProxySettings::from_env());

        Self {
            session,
            api_url: registry.api_url.clone(),
            max_pages: MAX_PAGES,
        }
    }

    /// Caps how many continuation tokens are followed.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// `<api_url with {repository} substituted>&path=<repository path>`
    pub fn listing_url(&self, repository: &SdkRepository) -> String {
        let base = self.api_url.replace("{repository}", &repository.repository);
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}path={}", repository.path)
    }

    fn fetch_page(&self, url: &str, path: &str) -> Result<NexusAssetPage> {
        debug!("Querying registry: {url}");

        let response =
            self.session
                .get(url)
                .send()
                .map_err(|e| StrigoError::RegistryUnreachable {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        if !response.is_success() {
            return Err(StrigoError::RegistryBadStatus {
                status: response.status().as_u16(),
                path: path.to_string(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .map_err(|e| StrigoError::RegistryUnreachable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        trace!("Registry response body: {body}");

        serde_json::from_str::<NexusAssetPage>(&body).map_err(|e| {
            StrigoError::RegistryMalformedResponse {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

impl RegistryClient for NexusClient {
    fn list(&self, repository: &SdkRepository) -> Result<Vec<ListingEntry>> {
        let first_url = self.listing_url(repository);
        let mut entries = Vec::new();
        let mut url = first_url.clone();
        let mut previous_token: Option<String> = None;

        for fetched in 1..=self.max_pages {
            let mut page = self.fetch_page(&url, &repository.path)?;
            let token = page.continuation_token.take();
            entries.extend(page.into_entries());

            match token {
                Some(token) if !token.is_empty() && previous_token.as_ref() != Some(&token) => {
                    if fetched == self.max_pages {
                        warn!(
                            "Stopped listing {} after {fetched} pages; the catalog may be incomplete",
                            repository.path
                        );
                        break;
                    }
                    url = format!("{first_url}&continuationToken={token}");
                    previous_token = Some(token);
                }
                _ => break,
            }
        }

        debug!(
            "Registry listed {} entries for {}",
            entries.len(),
            repository.path
        );
        Ok(entries)
    }
}
