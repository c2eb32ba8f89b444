use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::{debug, OpskitError};
use crate::config::{FtpConfig, LoggingConfig, NetworkConfig, PasswordPolicy, TailscaleConfig, UserDefaults};

/// Root of `settings.json`. Every section may be absent.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub ftp_config: FtpConfig,
    pub tailscale_config: TailscaleConfig,
    pub network_config: NetworkConfig,
    pub password_policy: PasswordPolicy,
    pub user_defaults: UserDefaults,
    pub logging: LoggingConfig,
}

/// What to do when the configuration file does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFile {
    Fail,
    UseDefaults,
}

/// Outcome of [`Config::load`], so callers can tell the operator that
/// defaults are in effect.
#[derive(Debug)]
pub struct Loaded {
    pub config: Config,
    pub from_file: bool,
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "settings.json";

    pub async fn load(path: impl AsRef<Path>, missing: MissingFile) -> crate::Result<Loaded> {
        let path = path.as_ref();

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return match missing {
                    MissingFile::Fail => Err(OpskitError::ConfigNotFound {
                        path: path.to_path_buf(),
                    }),
                    MissingFile::UseDefaults => {
                        debug!(path=%path.display(), "Config file missing, using defaults");
                        Ok(Loaded {
                            config: Config::default(),
                            from_file: false,
                        })
                    }
                };
            }
            Err(err) => return Err(err.into()),
        };

        let config = Config::from_json(&raw).map_err(|source| OpskitError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path=%path.display(), ?config, "Config loaded");

        Ok(Loaded {
            config,
            from_file: true,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(Config::DEFAULT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();

        assert_eq!(config.ftp_config.ftp_root(), Path::new("/srv/ftp"));
        assert_eq!(config.password_policy.length(), 16);
        assert!(config.logging.enabled());
        assert!(config.network_config.ipv4_enabled());
        assert!(!config.network_config.ipv6_enabled());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_json(
            r#"{"ftp_config": {"ftp_root": "/data/ftp"}, "password_policy": {"length": 24}}"#,
        )
        .unwrap();

        assert_eq!(config.ftp_config.ftp_root(), Path::new("/data/ftp"));
        assert_eq!(config.ftp_config.ftp_group(), "ftpusers");
        assert_eq!(config.password_policy.length(), 24);
        assert_eq!(config.password_policy.min_digits(), 2);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = Config::from_json(r#"{"something_else": 1, "logging": {"extra": true}}"#);
        assert!(config.is_ok());
    }

    #[tokio::test]
    async fn missing_file_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let loaded = Config::load(&path, MissingFile::UseDefaults).await.unwrap();
        assert!(!loaded.from_file);

        let err = Config::load(&path, MissingFile::Fail).await.unwrap_err();
        assert!(matches!(err, OpskitError::ConfigNotFound { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_an_error_even_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load(&path, MissingFile::UseDefaults)
            .await
            .unwrap_err();
        assert!(matches!(err, OpskitError::InvalidConfig { .. }));
    }
}
