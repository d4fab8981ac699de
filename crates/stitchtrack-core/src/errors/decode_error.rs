//! Errors from splitting a scanned barcode back into segments.

use super::error_code::{self, TrackErrorCode};

/// A barcode string that does not follow the 7-segment format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("barcode is empty")]
    Empty,

    #[error("expected {expected} segments, found {found}")]
    SegmentCount { expected: usize, found: usize },

    #[error("segment '{segment}' must be {expected} characters, got {actual:?}")]
    SegmentWidth {
        segment: &'static str,
        expected: usize,
        actual: String,
    },

    #[error("segment '{segment}' contains invalid character {ch:?}")]
    InvalidCharacter { segment: &'static str, ch: char },

    #[error("segment '{segment}' value {value} is out of range")]
    OutOfRange { segment: &'static str, value: u64 },
}

impl TrackErrorCode for DecodeError {
    fn error_code(&self) -> &'static str {
        error_code::DECODE_ERROR
    }
}
