pub mod error_code;

mod config_error;
mod decode_error;
mod storage_error;
mod track_error;
mod validation_error;

pub use config_error::ConfigError;
pub use decode_error::DecodeError;
pub use storage_error::StorageError;
pub use track_error::{TrackError, TrackResult};
pub use validation_error::{FieldViolation, ValidationError};
