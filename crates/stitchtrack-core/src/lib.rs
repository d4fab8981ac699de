//! # stitchtrack-core
//!
//! Foundation crate for Stitchtrack batch tracking.
//! Defines the domain types, errors, config, tracing setup, the barcode
//! encoder and the production-phase state machine. Persistence is reached
//! only through the storage traits in [`traits`]; the SQLite implementation
//! lives in `stitchtrack-storage`.

pub mod config;
pub mod encoding;
pub mod errors;
pub mod intake;
pub mod phase;
pub mod retry;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::StitchConfig;
pub use encoding::{decode, encode, Barcode, BarcodeSegments};
pub use errors::error_code::TrackErrorCode;
pub use errors::{DecodeError, StorageError, TrackError, TrackResult, ValidationError};
pub use phase::{PhaseMachine, ScanOutcome};
pub use retry::RetryPolicy;
pub use traits::{IBatchStore, IReferenceStore};
pub use types::{BatchAttributes, BatchId, BatchRecord, Phase, PhaseState, ScanMode, Status};
