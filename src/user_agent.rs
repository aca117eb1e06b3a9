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

//! User-Agent strings sent by strigo's HTTP clients.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for registry listing requests
pub fn registry_client() -> String {
    for_feature("registry")
}

/// User-Agent for archive downloads and size probes
pub fn download_client() -> String {
    for_feature("download")
}

pub fn for_feature(feature: &str) -> String {
    format!("strigo/{feature}/{VERSION}")
}
