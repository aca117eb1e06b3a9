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

//! Points an installed JDK at the system trust store.

use crate::error::{Result, StrigoError};
use crate::models::{CertificateConfig, CertificateMode};
use crate::platform::create_symlink;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const BACKUP_SUFFIX: &str = "original";

pub struct CertificateInstaller;

impl CertificateInstaller {
    /// Replaces `<sdk_root>/<jdk_security_path>` with the configured system store.
    ///
    /// Returns the path of the JDK trust store that was updated.
    pub fn install(sdk_root: &Path, config: &CertificateConfig) -> Result<PathBuf> {
        if config.jdk_security_path.trim().is_empty() {
            return Err(StrigoError::CertConfigIncomplete(
                "jdk_security_path is empty".to_string(),
            ));
        }
        if config.system_cacerts_path.as_os_str().is_empty() {
            return Err(StrigoError::CertConfigIncomplete(
                "system_cacerts_path is empty".to_string(),
            ));
        }

        let source = &config.system_cacerts_path;
        if !source.is_file() {
            return Err(StrigoError::CertSourceMissing(source.clone()));
        }

        let target = sdk_root.join(config.jdk_security_path.trim());
        if fs::symlink_metadata(&target).is_err() {
            return Err(StrigoError::CertTargetMissing(target));
        }

        match config.mode {
            CertificateMode::Replace => Self::replace(source, &target)?,
            CertificateMode::Symlink => Self::link(source, &target)?,
        }

        info!(
            "Configured {} to use {} ({} mode)",
            target.display(),
            source.display(),
            config.mode
        );
        Ok(target)
    }

    fn replace(source: &Path, target: &Path) -> Result<()> {
        let backup = backup_path(target);
        if fs::symlink_metadata(&backup).is_ok() {
            debug!("Keeping existing backup {}", backup.display());
        } else {
            fs::hard_link(target, &backup)?;
            debug!("Backed up {} to {}", target.display(), backup.display());
        }

        fs::remove_file(target)?;
        fs::copy(source, target)?;
        Ok(())
    }

    fn link(source: &Path, target: &Path) -> Result<()> {
        fs::remove_file(target)?;
        create_symlink(source, target)?;
        Ok(())
    }
}

/// `<file>.original` next to the JDK trust store.
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(BACKUP_SUFFIX);
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        sdk_root: PathBuf,
        system: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let sdk_root = temp_dir.path().join("jdk-21.0.6+7");
        fs::create_dir_all(sdk_root.join("lib/security")).unwrap();
        fs::write(sdk_root.join("lib/security/cacerts"), b"bundled").unwrap();

        let system = temp_dir.path().join("etc-cacerts");
        fs::write(&system, b"system").unwrap();

        Fixture {
            sdk_root,
            system,
            _temp_dir: temp_dir,
        }
    }

    fn config(system: &Path, mode: CertificateMode) -> CertificateConfig {
        CertificateConfig {
            enabled: true,
            mode,
            jdk_security_path: "lib/security/cacerts".to_string(),
            system_cacerts_path: system.to_path_buf(),
        }
    }

    #[test]
    fn test_replace_mode_keeps_backup() {
        let fx = fixture();
        let target = CertificateInstaller::install(
            &fx.sdk_root,
            &config(&fx.system, CertificateMode::Replace),
        )
        .unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"system");
        assert_eq!(fs::read(backup_path(&target)).unwrap(), b"bundled");
        assert!(!fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_replace_mode_preserves_existing_backup() {
        let fx = fixture();
        let target = fx.sdk_root.join("lib/security/cacerts");
        fs::write(backup_path(&target), b"first backup").unwrap();

        CertificateInstaller::install(&fx.sdk_root, &config(&fx.system, CertificateMode::Replace))
            .unwrap();

        assert_eq!(fs::read(backup_path(&target)).unwrap(), b"first backup");
        assert_eq!(fs::read(&target).unwrap(), b"system");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_mode() {
        let fx = fixture();
        let target = CertificateInstaller::install(
            &fx.sdk_root,
            &config(&fx.system, CertificateMode::Symlink),
        )
        .unwrap();

        assert_eq!(fs::read_link(&target).unwrap(), fx.system);
        assert_eq!(fs::read(&target).unwrap(), b"system");
    }

    #[test]
    fn test_missing_source() {
        let fx = fixture();
        let missing = fx.system.with_file_name("nowhere");
        assert!(matches!(
            CertificateInstaller::install(&fx.sdk_root, &config(&missing, CertificateMode::Replace)),
            Err(StrigoError::CertSourceMissing(_))
        ));
    }

    #[test]
    fn test_missing_target() {
        let fx = fixture();
        fs::remove_file(fx.sdk_root.join("lib/security/cacerts")).unwrap();
        assert!(matches!(
            CertificateInstaller::install(&fx.sdk_root, &config(&fx.system, CertificateMode::Replace)),
            Err(StrigoError::CertTargetMissing(_))
        ));
    }

    #[test]
    fn test_incomplete_config() {
        let fx = fixture();
        let mut incomplete = config(&fx.system, CertificateMode::Replace);
        incomplete.jdk_security_path = "  ".to_string();
        assert!(matches!(
            CertificateInstaller::install(&fx.sdk_root, &incomplete),
            Err(StrigoError::CertConfigIncomplete(_))
        ));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/jdk/lib/security/cacerts")),
            PathBuf::from("/jdk/lib/security/cacerts.original")
        );
    }
}
