//! # configs
//!
//! Layered settings: built-in defaults, then `config/default.toml`, then
//! `config/local.toml`, then `RP_FORUM__`-prefixed environment variables
//! (`RP_FORUM__STORAGE__BACKEND=memory`). A `.env` file is loaded first.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_PREFIX: &str = "RP_FORUM";
const ENV_SEPARATOR: &str = "__";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Default filter directive; `RUST_LOG` still wins when set.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    Memory,
    JsonFile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: Option<PathBuf>,
    /// Load the demo forum when the backend comes up empty.
    pub seed_if_empty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModerationSettings {
    /// Length of a ban issued without an explicit end date.
    pub ban_duration_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log: LogSettings,
    pub storage: StorageSettings,
    pub moderation: ModerationSettings,
}

impl Settings {
    /// Loads from `./config` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_dir(Path::new("config"))
    }

    /// Loads `.env`, then the files in `config_dir` and the process environment.
    pub fn load_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::load_from(config_dir, None)
    }

    /// Loads from `config_dir`. `env` replaces the process environment when given.
    pub fn load_from(
        config_dir: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings: Settings = config::Config::builder()
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .set_default("storage.backend", "json-file")?
            .set_default("storage.path", "data/forum.json")?
            .set_default("storage.seed_if_empty", true)?
            .set_default("moderation.ban_duration_days", 30)?
            .add_source(config::File::from(config_dir.join("default")).required(false))
            .add_source(config::File::from(config_dir.join("local")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.moderation.ban_duration_days == 0 {
            return Err(ConfigError::Invalid {
                field: "moderation.ban_duration_days",
                message: "must be at least 1".into(),
            });
        }
        if self.storage.backend == StorageBackend::JsonFile
            && self.storage.path.as_ref().map_or(true, |p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid {
                field: "storage.path",
                message: "required for the json-file backend".into(),
            });
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log.level",
                message: "cannot be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn defaults_apply_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path(), env(&[])).unwrap();
        assert_eq!(settings.log.format, LogFormat::Pretty);
        assert_eq!(settings.storage.backend, StorageBackend::JsonFile);
        assert_eq!(settings.storage.path, Some(PathBuf::from("data/forum.json")));
        assert!(settings.storage.seed_if_empty);
        assert_eq!(settings.moderation.ban_duration_days, 30);
    }

    #[test]
    fn file_then_environment_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[log]\nformat = \"json\"\n\n[moderation]\nban_duration_days = 7\n",
        )
        .unwrap();

        let settings = Settings::load_from(
            dir.path(),
            env(&[
                ("RP_FORUM__STORAGE__BACKEND", "memory"),
                ("RP_FORUM__MODERATION__BAN_DURATION_DAYS", "14"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.moderation.ban_duration_days, 14);
    }

    #[test]
    fn zero_day_bans_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(
            dir.path(),
            env(&[("RP_FORUM__MODERATION__BAN_DURATION_DAYS", "0")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "moderation.ban_duration_days", .. }
        ));
    }

    #[test]
    fn unknown_backend_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            Settings::load_from(dir.path(), env(&[("RP_FORUM__STORAGE__BACKEND", "sqlite")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
