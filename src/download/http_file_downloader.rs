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
use crate::download::client::{HttpClient, HttpResponse, download_error};
use crate::error::Result;
use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

const DOWNLOAD_CHUNK_SIZE: usize = 8192;

pub trait ProgressReporter: Send {
    fn on_start(&mut self, total_bytes: u64);

    fn on_progress(&mut self, bytes_downloaded: u64);

    fn on_complete(&mut self);
}

/// Streams a URL into a file.
///
/// Bytes land in a uniquely named temporary file next to the destination,
/// which is renamed into place only after the body was read completely. A
/// failed or cancelled download never leaves a partial file at the
/// destination.
pub struct HttpFileDownloader {
    http_client: Arc<dyn HttpClient>,
    progress_reporter: Option<Box<dyn ProgressReporter>>,
}

impl HttpFileDownloader {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            progress_reporter: None,
        }
    }

    pub fn with_progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    pub fn download(
        &mut self,
        url: &str,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let response = self
            .http_client
            .get(url)
            .map_err(|e| download_error(url, e))?;

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(download_error(url, format!("HTTP status {status}")));
        }

        let total_size = response
            .header("Content-Length")
            .and_then(|length| length.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let temp_file = NamedTempFile::new_in(parent)?;

        if let Some(reporter) = &mut self.progress_reporter {
            reporter.on_start(total_size);
        }

        let temp_file = self.stream_to_file(url, response, temp_file, cancel)?;

        temp_file
            .persist(destination)
            .map_err(|e| download_error(url, e.error))?;

        if let Some(reporter) = &mut self.progress_reporter {
            reporter.on_complete();
        }

        log::debug!("Downloaded {url} to {destination:?}");
        Ok(destination.to_path_buf())
    }

    fn stream_to_file(
        &mut self,
        url: &str,
        mut response: Box<dyn HttpResponse>,
        temp_file: NamedTempFile,
        cancel: &CancellationToken,
    ) -> Result<NamedTempFile> {
        let mut writer = BufWriter::new(temp_file);
        let mut downloaded = 0u64;
        let mut buffer = vec![0; DOWNLOAD_CHUNK_SIZE];

        loop {
            cancel.check("download")?;

            match response.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    writer.write_all(&buffer[..n])?;
                    downloaded += n as u64;

                    if let Some(reporter) = &mut self.progress_reporter {
                        reporter.on_progress(downloaded);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(download_error(url, e)),
            }
        }

        writer
            .into_inner()
            .map_err(|e| download_error(url, e.into_error()))
    }
}

#[cfg(test)]
#[path = "http_file_downloader_tests.rs"]
mod http_file_downloader_tests;
