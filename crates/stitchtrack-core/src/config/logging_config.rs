use serde::{Deserialize, Serialize};

/// Log output settings. `STITCHTRACK_LOG` overrides `level` when set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. "info" or "stitchtrack_core=debug".
    pub level: String,
    /// Colored output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}
