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
use crate::models::CertificateConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "strigo.toml";
pub const CONFIG_PATH_ENV: &str = "STRIGO_CONFIG_PATH";
const ENV_PREFIX: &str = "STRIGO";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_DOWNLOAD_ATTEMPTS: u32 = 1;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;

/// The only SDK type whose installs take a trust store.
pub const CERTIFICATE_SDK_TYPE: &str = "jdk";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StrigoConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub certificates: CertificateConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub registries: BTreeMap<String, Registry>,

    #[serde(default)]
    pub sdk_types: BTreeMap<String, SdkType>,

    #[serde(default)]
    pub sdk_repositories: BTreeMap<String, SdkRepository>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_sdk_install_dir")]
    pub sdk_install_dir: PathBuf,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default)]
    pub keep_cache: bool,

    /// Log file, or a directory that receives `strigo_<timestamp>.log`.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            sdk_install_dir: default_sdk_install_dir(),
            cache_dir: default_cache_dir(),
            keep_cache: false,
            log_path: None,
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_sdk_install_dir() -> PathBuf {
    PathBuf::from("~/.sdks")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("~/.cache/strigo")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total download attempts. `1` disables retries.
    #[serde(default = "default_download_attempts")]
    pub download_attempts: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            download_attempts: DEFAULT_DOWNLOAD_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_download_attempts() -> u32 {
    DEFAULT_DOWNLOAD_ATTEMPTS
}

fn default_retry_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(rename = "type")]
    pub registry_type: String,
    /// Listing endpoint with a `{repository}` placeholder.
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkType {
    #[serde(rename = "type")]
    pub sdk_type: String,
    pub install_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkRepository {
    pub registry: String,
    pub repository: String,
    #[serde(rename = "type")]
    pub sdk_type: String,
    pub path: String,
}

impl StrigoConfig {
    /// Loads the configuration from the first location found:
    /// `$STRIGO_CONFIG_PATH`, `./strigo.toml`, then `<config dir>/strigo/strigo.toml`.
    pub fn load() -> Result<Self> {
        let path = resolve_config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(StrigoError::ConfigFile(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: StrigoConfig = settings.try_deserialize()?;
        config.expand_paths();
        config.validate()?;

        log::debug!("Loaded config from {path:?}");
        Ok(config)
    }

    fn expand_paths(&mut self) {
        self.general.sdk_install_dir = expand_tilde(&self.general.sdk_install_dir);
        self.general.cache_dir = expand_tilde(&self.general.cache_dir);
        self.general.log_path = self.general.log_path.as_deref().map(expand_tilde);
        self.certificates.system_cacerts_path = expand_tilde(&self.certificates.system_cacerts_path);
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.sdk_install_dir.as_os_str().is_empty() {
            return Err(StrigoError::InvalidConfig(
                "general.sdk_install_dir must not be empty".to_string(),
            ));
        }
        if self.general.cache_dir.as_os_str().is_empty() {
            return Err(StrigoError::InvalidConfig(
                "general.cache_dir must not be empty".to_string(),
            ));
        }
        if self.network.download_attempts == 0 {
            return Err(StrigoError::InvalidConfig(
                "network.download_attempts must be at least 1".to_string(),
            ));
        }

        for (name, sdk_type) in &self.sdk_types {
            if sdk_type.install_dir.trim().is_empty() {
                return Err(StrigoError::InvalidConfig(format!(
                    "sdk_types.{name}.install_dir must not be empty"
                )));
            }
        }

        for (name, repository) in &self.sdk_repositories {
            if repository.path.trim_matches('/').trim().is_empty() {
                return Err(StrigoError::InvalidConfig(format!(
                    "sdk_repositories.{name}.path must not be empty"
                )));
            }
            if !self.registries.contains_key(&repository.registry) {
                return Err(StrigoError::InvalidConfig(format!(
                    "sdk_repositories.{name} references unknown registry '{}'",
                    repository.registry
                )));
            }
            if !self.sdk_types.contains_key(&repository.sdk_type) {
                return Err(StrigoError::InvalidConfig(format!(
                    "sdk_repositories.{name} references unknown SDK type '{}'",
                    repository.sdk_type
                )));
            }
        }

        Ok(())
    }

    pub fn sdk_type(&self, name: &str) -> Result<&SdkType> {
        self.sdk_types
            .get(name)
            .ok_or_else(|| StrigoError::UnknownSdkType {
                name: name.to_string(),
                available: self.sdk_types.keys().cloned().collect(),
            })
    }

    pub fn distributions_for(&self, sdk_type: &str) -> Vec<String> {
        self.sdk_repositories
            .iter()
            .filter(|(_, repository)| repository.sdk_type == sdk_type)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Looks up a distribution, which must belong to `sdk_type`.
    pub fn repository(&self, sdk_type: &str, distribution: &str) -> Result<&SdkRepository> {
        self.sdk_type(sdk_type)?;

        match self.sdk_repositories.get(distribution) {
            Some(repository) if repository.sdk_type == sdk_type => Ok(repository),
            _ => Err(StrigoError::UnknownDistribution {
                name: distribution.to_string(),
                sdk_type: sdk_type.to_string(),
                available: self.distributions_for(sdk_type),
            }),
        }
    }

    pub fn registry(&self, name: &str) -> Result<&Registry> {
        self.registries.get(name).ok_or_else(|| {
            StrigoError::InvalidConfig(format!("Registry '{name}' is not configured"))
        })
    }

    /// `<sdk_install_dir>/<type install_dir>`
    pub fn type_install_dir(&self, sdk_type: &str) -> Result<PathBuf> {
        let sdk = self.sdk_type(sdk_type)?;
        Ok(self.general.sdk_install_dir.join(&sdk.install_dir))
    }

    /// Certificate settings for an install of `sdk_type`, if any apply.
    pub fn certificates_for(&self, sdk_type: &str) -> Option<CertificateConfig> {
        if sdk_type == CERTIFICATE_SDK_TYPE && self.certificates.enabled {
            Some(self.certificates.clone())
        } else {
            None
        }
    }
}

/// Environment variable naming an SDK's home directory.
pub fn home_env_var(sdk_type: &str) -> String {
    match sdk_type {
        "jdk" => "JAVA_HOME".to_string(),
        "node" => "NODE_HOME".to_string(),
        other => format!("{}_HOME", other.to_uppercase()),
    }
}

pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(expand_tilde(Path::new(&path)));
        }
    }

    let mut searched = Vec::new();

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(local);
    }
    searched.push(local);

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("strigo").join(CONFIG_FILE_NAME);
        if user.is_file() {
            return Ok(user);
        }
        searched.push(user);
    }

    let searched: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
    Err(StrigoError::ConfigFile(format!(
        "No configuration file found (searched ${CONFIG_PATH_ENV}, {})",
        searched.join(", ")
    )))
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CertificateMode;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[general]
log_level = "info"
sdk_install_dir = "/opt/sdks"
cache_dir = "/var/cache/strigo"

[certificates]
mode = "symlink"
jdk_security_path = "lib/security/cacerts"
system_cacerts_path = "/etc/pki/java/cacerts"

[registries.nexus]
type = "nexus"
api_url = "http://localhost:8081/service/rest/v1/assets?repository={repository}"

[sdk_types.jdk]
type = "jdk"
install_dir = "jdks"

[sdk_types.node]
type = "node"
install_dir = "nodes"

[sdk_repositories.temurin]
registry = "nexus"
repository = "raw"
type = "jdk"
path = "jdk/adoptium/temurin"

[sdk_repositories.nodejs]
registry = "nexus"
repository = "raw"
type = "node"
path = "node"
"#;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    #[serial]
    fn test_load_sample_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, SAMPLE);

        let config = StrigoConfig::load_from(&path).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.sdk_install_dir, PathBuf::from("/opt/sdks"));
        assert!(!config.general.keep_cache);
        assert_eq!(config.general.log_path, None);
        assert!(config.certificates.enabled);
        assert_eq!(config.certificates.mode, CertificateMode::Symlink);
        assert_eq!(config.network.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.network.download_attempts, 1);
        assert_eq!(config.registries["nexus"].registry_type, "nexus");
        assert_eq!(config.sdk_repositories["temurin"].path, "jdk/adoptium/temurin");
    }

    #[test]
    #[serial]
    fn test_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, SAMPLE);

        unsafe {
            env::set_var("STRIGO_GENERAL__KEEP_CACHE", "true");
            env::set_var("STRIGO_NETWORK__DOWNLOAD_ATTEMPTS", "3");
        }
        let result = StrigoConfig::load_from(&path);
        unsafe {
            env::remove_var("STRIGO_GENERAL__KEEP_CACHE");
            env::remove_var("STRIGO_NETWORK__DOWNLOAD_ATTEMPTS");
        }

        let config = result.unwrap();
        assert!(config.general.keep_cache);
        assert_eq!(config.network.download_attempts, 3);
    }

    #[test]
    #[serial]
    fn test_log_path_is_expanded() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            &SAMPLE.replace(
                "log_level = \"info\"",
                "log_level = \"info\"\nlog_path = \"~/strigo-logs\"",
            ),
        );

        let config = StrigoConfig::load_from(&path).unwrap();
        let expected = match dirs::home_dir() {
            Some(home) => home.join("strigo-logs"),
            None => PathBuf::from("~/strigo-logs"),
        };
        assert_eq!(config.general.log_path, Some(expected));
    }

    #[test]
    #[serial]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = StrigoConfig::load_from(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(StrigoError::ConfigFile(_))));
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        unsafe {
            env::set_var(CONFIG_PATH_ENV, "/somewhere/strigo.toml");
        }
        let path = resolve_config_path();
        unsafe {
            env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(path.unwrap(), PathBuf::from("/somewhere/strigo.toml"));
    }

    #[test]
    #[serial]
    fn test_unknown_registry_reference() {
        let temp_dir = TempDir::new().unwrap();
        let contents = SAMPLE.replace(
            "registry = \"nexus\"\nrepository = \"raw\"\ntype = \"node\"",
            "registry = \"artifactory\"\nrepository = \"raw\"\ntype = \"node\"",
        );
        let path = write_config(&temp_dir, &contents);

        let result = StrigoConfig::load_from(&path);
        assert!(
            matches!(result, Err(StrigoError::InvalidConfig(msg)) if msg.contains("artifactory"))
        );
    }

    #[test]
    #[serial]
    fn test_missing_certificates_section_disables_certificates() {
        let temp_dir = TempDir::new().unwrap();
        let contents = SAMPLE.replace(
            "[certificates]\nmode = \"symlink\"\njdk_security_path = \"lib/security/cacerts\"\nsystem_cacerts_path = \"/etc/pki/java/cacerts\"\n",
            "",
        );
        let path = write_config(&temp_dir, &contents);

        let config = StrigoConfig::load_from(&path).unwrap();
        assert!(!config.certificates.enabled);
        assert!(config.certificates_for("jdk").is_none());
    }

    #[test]
    #[serial]
    fn test_empty_repository_path() {
        let temp_dir = TempDir::new().unwrap();
        let contents = SAMPLE.replace("path = \"node\"", "path = \"/\"");
        let path = write_config(&temp_dir, &contents);

        let result = StrigoConfig::load_from(&path);
        assert!(
            matches!(result, Err(StrigoError::InvalidConfig(msg)) if msg.contains("sdk_repositories.nodejs.path"))
        );
    }

    #[test]
    fn test_validate_empty_install_dir() {
        let mut config = StrigoConfig::default();
        config.general.sdk_install_dir = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(StrigoError::InvalidConfig(_))
        ));
    }

    #[test]
    #[serial]
    fn test_lookups() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, SAMPLE);
        let config = StrigoConfig::load_from(&path).unwrap();

        assert_eq!(config.repository("jdk", "temurin").unwrap().repository, "raw");
        assert_eq!(config.distributions_for("jdk"), vec!["temurin".to_string()]);
        assert_eq!(
            config.type_install_dir("node").unwrap(),
            PathBuf::from("/opt/sdks/nodes")
        );

        match config.repository("jdk", "nodejs") {
            Err(StrigoError::UnknownDistribution { available, .. }) => {
                assert_eq!(available, vec!["temurin".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            config.repository("python", "temurin"),
            Err(StrigoError::UnknownSdkType { .. })
        ));

        assert!(config.certificates_for("jdk").is_some());
        assert!(config.certificates_for("node").is_none());
    }

    #[test]
    fn test_home_env_var() {
        assert_eq!(home_env_var("jdk"), "JAVA_HOME");
        assert_eq!(home_env_var("node"), "NODE_HOME");
        assert_eq!(home_env_var("maven"), "MAVEN_HOME");
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/.sdks")), home.join(".sdks"));
        }
    }
}
