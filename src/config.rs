//! Server config file.
//!
//! ```json
//! {"Address": "127.0.0.1:6060", "CustomLog": "access.log", "LogFormat": ["time", "uri", "status"]}
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::prelude::*;
use crate::web::access_log::LogField;

pub const DEFAULT_PATH: &str = "server.conf";
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:6060";

/// `CustomLog` value which disables the access log.
const NO_LOG: &str = "nolog";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{}`", .path.display())]
    Read {
        path: PathBuf,

        #[source]
        source: std::io::Error,
    },

    #[error("config error in `{}`", .path.display())]
    Parse {
        path: PathBuf,

        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfigFile {
    pub address: Option<String>,
    pub custom_log: Option<String>,
    pub log_format: Option<Vec<LogField>>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> StdResult<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct AccessLogConfig {
    pub path: PathBuf,
    pub fields: Vec<LogField>,
}

/// Effective server settings.
#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub address: String,
    pub access_log: Option<AccessLogConfig>,
}

impl Config {
    /// Reads the explicitly given config file, or the default one if it exists.
    pub fn load(path: Option<&Path>, listen: Option<String>) -> StdResult<Self, ConfigError> {
        let file = match path {
            Some(path) => ConfigFile::read(path)?,
            None if Path::new(DEFAULT_PATH).exists() => ConfigFile::read(Path::new(DEFAULT_PATH))?,
            None => {
                info!("no config file, using the defaults");
                ConfigFile::default()
            }
        };
        Ok(Self::resolve(file, listen))
    }

    /// The `listen` option takes precedence over the config file.
    pub fn resolve(file: ConfigFile, listen: Option<String>) -> Self {
        let access_log = file
            .custom_log
            .filter(|path| !path.is_empty() && path != NO_LOG)
            .map(|path| AccessLogConfig {
                path: PathBuf::from(path),
                fields: file
                    .log_format
                    .filter(|fields| !fields.is_empty())
                    .unwrap_or_else(|| LogField::ALL.to_vec()),
            });
        Self {
            address: listen
                .or(file.address)
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            access_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> crate::Result<ConfigFile> {
        Ok(serde_json::from_str(json)?)
    }

    #[test]
    fn resolve_defaults_ok() {
        let config = Config::resolve(ConfigFile::default(), None);
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert_eq!(config.access_log, None);
    }

    #[test]
    fn resolve_file_ok() -> crate::Result {
        let file = parse(
            // language=JSON
            r#"{"Address": "127.0.0.1:1234", "CustomLog": "access.log", "LogFormat": ["uri", "status"]}"#,
        )?;
        let config = Config::resolve(file, None);
        assert_eq!(config.address, "127.0.0.1:1234");
        assert_eq!(
            config.access_log,
            Some(AccessLogConfig {
                path: PathBuf::from("access.log"),
                fields: vec![LogField::Uri, LogField::Status],
            }),
        );
        Ok(())
    }

    #[test]
    fn listen_overrides_file_ok() -> crate::Result {
        let file = parse(r#"{"Address": "127.0.0.1:1234"}"#)?;
        let config = Config::resolve(file, Some("[::1]:8080".to_string()));
        assert_eq!(config.address, "[::1]:8080");
        Ok(())
    }

    #[test]
    fn nolog_disables_access_log_ok() -> crate::Result {
        let file = parse(r#"{"CustomLog": "nolog", "LogFormat": null}"#)?;
        assert_eq!(Config::resolve(file, None).access_log, None);
        Ok(())
    }

    #[test]
    fn default_log_format_ok() -> crate::Result {
        let file = parse(r#"{"CustomLog": "access.log", "LogFormat": []}"#)?;
        let access_log = Config::resolve(file, None).access_log.ok_or_else(|| anyhow!("no log"))?;
        assert_eq!(access_log.fields, LogField::ALL);
        Ok(())
    }

    #[test]
    fn unknown_log_field_fails() {
        assert!(parse(r#"{"LogFormat": ["referer"]}"#).is_err());
    }

    #[test]
    fn read_missing_file_fails() {
        let result = ConfigFile::read(Path::new("/nonexistent/regplot/server.conf"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn read_malformed_file_fails() -> crate::Result {
        let path = std::env::temp_dir().join(format!("regplot-{}.conf", std::process::id()));
        std::fs::write(&path, "{not json")?;
        let result = ConfigFile::read(&path);
        std::fs::remove_file(&path)?;
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        Ok(())
    }
}
