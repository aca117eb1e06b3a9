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

use chrono::{Local, NaiveDateTime};
use log::warn;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_LEVEL: &str = "warn";
const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

/// Initialize the logger with the specified verbosity level
///
/// # Arguments
/// * `verbose` - Verbosity level (0=config level, 1=info, 2=debug, 3+=trace)
/// * `config_level` - `general.log_level` from the configuration, used when no flag is given
/// * `log_path` - `general.log_path`; records go to this file instead of stderr
pub fn setup_logger(verbose: u8, config_level: Option<&str>, log_path: Option<&Path>) {
    let env_filter = filter_for(verbose, config_level);

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(env_filter));
    builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    let mut open_error = None;
    if let Some(path) = log_path {
        match open_log_file(path, Local::now().naive_local()) {
            Ok((_, file)) => {
                builder
                    .format_timestamp_secs()
                    .target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => open_error = Some((path.to_path_buf(), e)),
        }
    }

    // try_init: tests and repeated command runs may initialize more than once.
    let _ = builder.try_init();

    if let Some((path, e)) = open_error {
        warn!("Cannot open log file {path:?}, logging to stderr: {e}");
    }
}

fn filter_for(verbose: u8, config_level: Option<&str>) -> String {
    let level = match verbose {
        0 => config_level
            .map(|level| level.trim().to_lowercase())
            .filter(|level| LEVELS.contains(&level.as_str()))
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    format!("strigo={level}")
}

/// An existing directory gets a fresh `strigo_<YYYYmmdd_HHMMSS>.log` inside it.
fn log_file_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    if path.is_dir() {
        path.join(format!("strigo_{}.log", now.format("%Y%m%d_%H%M%S")))
    } else {
        path.to_path_buf()
    }
}

fn open_log_file(path: &Path, now: NaiveDateTime) -> io::Result<(PathBuf, File)> {
    let path = log_file_path(path, now);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}
