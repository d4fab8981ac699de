pub mod logging_config;
pub mod retry_config;
pub mod store_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use logging_config::LoggingConfig;
pub use retry_config::RetryConfig;
pub use store_config::StoreConfig;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StitchConfig {
    pub store: StoreConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

impl StitchConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.retry.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = StitchConfig::from_toml("").unwrap();
        assert_eq!(config, StitchConfig::default());
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.store.busy_timeout_ms, 5000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = StitchConfig::from_toml(
            r#"
            [store]
            db_path = "/var/lib/stitchtrack/line1.db"

            [retry]
            max_attempts = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.store.db_path, "/var/lib/stitchtrack/line1.db");
        assert_eq!(config.store.read_pool_size, 2);
        assert_eq!(config.retry.max_attempts, 8);
        assert_eq!(config.retry.initial_backoff_ms, 25);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = StitchConfig::from_toml("[retry]\nmax_attempts = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "retry.max_attempts",
                ..
            }
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = StitchConfig::from_toml("[store\ndb_path = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stitchtrack.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        let config = StitchConfig::load(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = StitchConfig::load(Path::new("/nonexistent/stitchtrack.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
