use super::error_code::{self, TrackErrorCode};
use super::{ConfigError, DecodeError, StorageError, ValidationError};

/// Top-level error type for Stitchtrack.
/// All subsystem errors convert into this via `From` impls.
///
/// A barcode that matches no batch is not represented here; lookups return
/// `Option` and scans return `ScanOutcome::NotFound`.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("invalid transition to {target:?}: {reason}")]
    InvalidTransition { target: String, reason: String },

    #[error("store unavailable: {operation} gave up after {attempts} attempts")]
    StoreContention {
        operation: &'static str,
        attempts: u32,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience type alias.
pub type TrackResult<T> = Result<T, TrackError>;

impl TrackErrorCode for TrackError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Decode(e) => e.error_code(),
            Self::InvalidTransition { .. } => error_code::INVALID_TRANSITION,
            Self::StoreContention { .. } => error_code::STORE_CONTENTION,
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
