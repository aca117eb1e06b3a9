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

use super::*;
use crate::download::client::probe_size;
use crate::error::StrigoError;
use std::io::Cursor;
use std::sync::Mutex;
use tempfile::tempdir;

struct MockHttpClient {
    responses: Mutex<Vec<MockResponse>>,
}

#[derive(Clone)]
struct MockResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl MockResponse {
    fn ok(body: &[u8]) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Length".to_string(), body.len().to_string())],
            body: body.to_vec(),
        }
    }
}

impl MockHttpClient {
    fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }

    fn next(&self) -> Result<Box<dyn HttpResponse>> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(StrigoError::SystemError("No more mock responses".to_string()));
        }
        let response = responses.remove(0);
        Ok(Box::new(MockHttpResponse {
            status: response.status,
            headers: response.headers,
            body: Cursor::new(response.body),
        }))
    }
}

impl HttpClient for MockHttpClient {
    fn get(&self, _url: &str) -> Result<Box<dyn HttpResponse>> {
        self.next()
    }

    fn head(&self, _url: &str) -> Result<Box<dyn HttpResponse>> {
        self.next()
    }
}

struct MockHttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Cursor<Vec<u8>>,
}

impl Read for MockHttpResponse {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.body.read(buf)
    }
}

impl HttpResponse for MockHttpResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct RecordingReporter {
    events: Arc<Mutex<Vec<String>>>,
}

impl ProgressReporter for RecordingReporter {
    fn on_start(&mut self, total_bytes: u64) {
        self.events.lock().unwrap().push(format!("start:{total_bytes}"));
    }

    fn on_progress(&mut self, bytes_downloaded: u64) {
        self.events
            .lock()
            .unwrap()
            .push(format!("progress:{bytes_downloaded}"));
    }

    fn on_complete(&mut self) {
        self.events.lock().unwrap().push("complete".to_string());
    }
}

fn entries_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_download_success() {
    let temp_dir = tempdir().unwrap();
    let destination = temp_dir.path().join("cache").join("archive.tar.gz");
    let client = Arc::new(MockHttpClient::new(vec![MockResponse::ok(b"archive bytes")]));
    let events = Arc::new(Mutex::new(Vec::new()));

    let mut downloader = HttpFileDownloader::new(client).with_progress_reporter(Box::new(
        RecordingReporter {
            events: events.clone(),
        },
    ));

    let path = downloader
        .download(
            "http://example.com/archive.tar.gz",
            &destination,
            &CancellationToken::new(),
        )
        .unwrap();

    assert_eq!(path, destination);
    assert_eq!(fs::read(&destination).unwrap(), b"archive bytes");
    assert_eq!(
        entries_in(destination.parent().unwrap()),
        vec!["archive.tar.gz".to_string()]
    );

    let events = events.lock().unwrap();
    assert_eq!(events.first().map(String::as_str), Some("start:13"));
    assert_eq!(events.last().map(String::as_str), Some("complete"));
}

#[test]
fn test_download_bad_status_leaves_nothing() {
    let temp_dir = tempdir().unwrap();
    let destination = temp_dir.path().join("archive.tar.gz");
    let client = Arc::new(MockHttpClient::new(vec![MockResponse {
        status: 404,
        headers: vec![],
        body: b"not found".to_vec(),
    }]));

    let mut downloader = HttpFileDownloader::new(client);
    let result = downloader.download(
        "http://example.com/archive.tar.gz",
        &destination,
        &CancellationToken::new(),
    );

    match result {
        Err(StrigoError::Download { reason, .. }) => assert!(reason.contains("404")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(entries_in(temp_dir.path()).is_empty());
}

#[test]
fn test_cancelled_download_leaves_no_partial_file() {
    let temp_dir = tempdir().unwrap();
    let destination = temp_dir.path().join("archive.tar.gz");
    let client = Arc::new(MockHttpClient::new(vec![MockResponse::ok(&[7u8; 32 * 1024])]));

    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut downloader = HttpFileDownloader::new(client);
    let result = downloader.download("http://example.com/archive.tar.gz", &destination, &cancel);

    assert!(matches!(result, Err(StrigoError::Cancelled(_))));
    assert!(entries_in(temp_dir.path()).is_empty());
}

#[test]
fn test_transport_error_maps_to_download_error() {
    let temp_dir = tempdir().unwrap();
    let client = Arc::new(MockHttpClient::new(vec![]));

    let mut downloader = HttpFileDownloader::new(client);
    let result = downloader.download(
        "http://example.com/archive.tar.gz",
        &temp_dir.path().join("archive.tar.gz"),
        &CancellationToken::new(),
    );

    assert!(matches!(result, Err(StrigoError::Download { .. })));
}

#[test]
fn test_probe_size() {
    let client = MockHttpClient::new(vec![
        MockResponse {
            status: 200,
            headers: vec![("content-length".to_string(), "1048576".to_string())],
            body: vec![],
        },
        MockResponse {
            status: 200,
            headers: vec![],
            body: vec![],
        },
        MockResponse {
            status: 405,
            headers: vec![("Content-Length".to_string(), "10".to_string())],
            body: vec![],
        },
    ]);

    assert_eq!(probe_size(&client, "http://example.com/a"), Some(1_048_576));
    assert_eq!(probe_size(&client, "http://example.com/a"), None);
    assert_eq!(probe_size(&client, "http://example.com/a"), None);
    assert_eq!(probe_size(&client, "http://example.com/a"), None);
}
