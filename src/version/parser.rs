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

use regex::Regex;
use std::sync::LazyLock;

/// Vendor patterns, tried in order. The first capture group is the version.
const VENDOR_PATTERNS: &[&str] = &[
    // Corretto: amazon-corretto-11.0.26.4.1-linux-x64.tar.gz
    r"corretto-(\d+(?:\.\d+){3,})",
    // Temurin: OpenJDK11U-jdk_x64_linux_hotspot_11.0.26_4.tar.gz under jdk-11.0.26_4/
    r"jdk-(\d+\.\d+\.\d+_\d+)",
    r"jdk_x64_linux_hotspot_(\d+\.\d+\.\d+_\d+)",
    // Legacy JDK 8: 8u442b06
    r"(\d+u\d+[a-z]+\d+)",
    r"node-v(\d+\.\d+\.\d+)-linux-x64",
    r"zulu(\d+(?:\.\d+)+)-ca-",
    r"amazon-corretto-(\d+(?:\.\d+)+)-",
];

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    VENDOR_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// Extracts the canonical version from a registry listing path.
///
/// Returns `None` when neither a vendor pattern nor the path heuristics
/// recognise a version.
pub fn extract_version(path: &str) -> Option<String> {
    for pattern in PATTERNS.iter() {
        if let Some(version) = pattern.captures(path).and_then(|caps| caps.get(1)) {
            return Some(version.as_str().to_string());
        }
    }

    extract_from_components(path)
}

fn extract_from_components(path: &str) -> Option<String> {
    for component in path.split('/') {
        let mut chars = component.chars();
        if chars.next() == Some('v') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
            return Some(component[1..].to_string());
        }

        if component.contains("jdk") {
            let stripped = component
                .strip_prefix("jdk-")
                .or_else(|| component.strip_prefix("jdk"))
                .unwrap_or(component);
            let major = stripped.split('.').next().unwrap_or_default();
            if !major.is_empty() && major.parse::<u32>().is_ok() {
                return Some(stripped.to_string());
            }
        }
    }

    None
}
