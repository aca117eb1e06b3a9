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

//! Archive downloads over HTTP.
//!
//! The client is a trait so installs can run against canned responses in
//! tests; [`AttohttpcClient`] is the production implementation.

mod client;
mod http_file_downloader;
mod progress;

pub use client::{AttohttpcClient, DEFAULT_TIMEOUT, HttpClient, HttpResponse, probe_size};
pub use http_file_downloader::{HttpFileDownloader, ProgressReporter};
pub use progress::IndicatifProgressReporter;
