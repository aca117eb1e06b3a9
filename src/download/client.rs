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
use crate::user_agent;
use attohttpc::{Response, Session};
use std::io::{self, Read};
use std::time::Duration;

pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<Box<dyn HttpResponse>>;

    /// Headers only. Used to learn an archive's size before downloading it.
    fn head(&self, url: &str) -> Result<Box<dyn HttpResponse>>;
}

pub trait HttpResponse: Read + Send {
    fn status(&self) -> u16;

    fn header(&self, name: &str) -> Option<&str>;
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

pub struct AttohttpcClient {
    timeout: Duration,
    user_agent: String,
}

impl AttohttpcClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: user_agent::download_client(),
        }
    }

    fn session(&self) -> Session {
        let mut session = Session::new();
        session.proxy_settings(attohttpc::ProxySettings::from_env());
        session.timeout(self.timeout);
        session.header("User-Agent", self.user_agent.as_str());
        session.follow_redirects(true);
        session
    }
}

impl Default for AttohttpcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for AttohttpcClient {
    fn get(&self, url: &str) -> Result<Box<dyn HttpResponse>> {
        let response = self.session().get(url).send()?;
        Ok(Box::new(AttohttpcResponse { response }))
    }

    fn head(&self, url: &str) -> Result<Box<dyn HttpResponse>> {
        let response = self.session().head(url).send()?;
        Ok(Box::new(AttohttpcResponse { response }))
    }
}

struct AttohttpcResponse {
    response: Response,
}

impl Read for AttohttpcResponse {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.response.read(buf)
    }
}

impl HttpResponse for AttohttpcResponse {
    fn status(&self) -> u16 {
        self.response.status().as_u16()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.response.headers().get(name)?.to_str().ok()
    }
}

/// Reads `Content-Length` from a HEAD request. `None` when the server does not say.
pub fn probe_size(client: &dyn HttpClient, url: &str) -> Option<u64> {
    let response = match client.head(url) {
        Ok(response) => response,
        Err(e) => {
            log::debug!("Size probe for {url} failed: {e}");
            return None;
        }
    };

    if !(200..300).contains(&response.status()) {
        log::debug!(
            "Size probe for {url} returned HTTP {}",
            response.status()
        );
        return None;
    }

    response
        .header("Content-Length")
        .and_then(|length| length.trim().parse::<u64>().ok())
}

pub(crate) fn download_error(url: &str, reason: impl ToString) -> StrigoError {
    StrigoError::Download {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
