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
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

pub mod parser;

pub use parser::extract_version;

/// Compares two canonical version strings.
///
/// `u` and `_` are treated as `.` separators, then tokens are compared
/// positionally over the shorter length. Tokens that are not integers on
/// either side are skipped. When no position decides, the version with fewer
/// tokens is older; equal token counts compare `Equal`.
///
/// Qualifier-only differences (`8u442b06` vs `8u442b07`) are not resolved.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_parts = tokenize(a);
    let b_parts = tokenize(b);

    for (left, right) in a_parts.iter().zip(b_parts.iter()) {
        let (Ok(left), Ok(right)) = (left.parse::<u64>(), right.parse::<u64>()) else {
            continue;
        };
        match left.cmp(&right) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }

    a_parts.len().cmp(&b_parts.len())
}

fn tokenize(version: &str) -> Vec<&str> {
    version.split(['.', '_', 'u']).collect()
}

/// Sorts versions newest first. Ties keep their original relative order.
pub fn sort_newest_first(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(b, a));
}

/// Grouping key derived from a canonical version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MajorVersion {
    Known(u32),
    Unknown,
}

impl MajorVersion {
    /// `11.0.26_4` is major 11, `8u442b06` is major 8, anything else is unknown.
    pub fn classify(version: &str) -> Self {
        let digits_end = version
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(version.len());
        if digits_end == 0 {
            return MajorVersion::Unknown;
        }

        match version[digits_end..].chars().next() {
            Some('.') | Some('u') => version[..digits_end]
                .parse::<u32>()
                .map(MajorVersion::Known)
                .unwrap_or(MajorVersion::Unknown),
            _ => MajorVersion::Unknown,
        }
    }

    /// Parses a user supplied major filter such as `"11"`.
    ///
    /// Only a bare number or the literal `unknown` is accepted.
    pub fn from_filter(filter: &str) -> Result<Self> {
        let trimmed = filter.trim();
        if trimmed.eq_ignore_ascii_case("unknown") {
            return Ok(MajorVersion::Unknown);
        }
        trimmed
            .parse::<u32>()
            .map(MajorVersion::Known)
            .map_err(|_| StrigoError::InvalidVersionFilter(filter.to_string()))
    }
}

impl Ord for MajorVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MajorVersion::Known(a), MajorVersion::Known(b)) => a.cmp(b),
            (MajorVersion::Known(_), MajorVersion::Unknown) => Ordering::Less,
            (MajorVersion::Unknown, MajorVersion::Known(_)) => Ordering::Greater,
            (MajorVersion::Unknown, MajorVersion::Unknown) => Ordering::Equal,
        }
    }
}

impl PartialOrd for MajorVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MajorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MajorVersion::Known(major) => write!(f, "{major}"),
            MajorVersion::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for MajorVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
