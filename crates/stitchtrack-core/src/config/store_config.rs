//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Configuration for the SQLite batch store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the database file shared by all scanning stations.
    pub db_path: String,
    /// How long a statement waits on a locked database before failing
    /// with a busy error. This is the implicit timeout on every store call.
    pub busy_timeout_ms: u64,
    /// Read-only connections per store handle. 0 = default (2).
    pub read_pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: "stitchtrack.db".to_string(),
            busy_timeout_ms: 5000,
            read_pool_size: 2,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "store.db_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
