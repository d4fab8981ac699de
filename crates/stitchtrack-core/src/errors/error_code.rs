//! Stable error codes surfaced to the UI layer.
//!
//! The UI maps these strings to operator-facing messages; they must not
//! change between releases.

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const DECODE_ERROR: &str = "DECODE_ERROR";
pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
pub const STORE_CONTENTION: &str = "STORE_CONTENTION";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const DB_LOCKED: &str = "DB_LOCKED";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CORRUPT_ROW: &str = "CORRUPT_ROW";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";

/// Implemented by every error enum in the workspace.
pub trait TrackErrorCode {
    fn error_code(&self) -> &'static str;
}
