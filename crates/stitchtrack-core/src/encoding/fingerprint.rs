use std::fmt;

use serde::{Deserialize, Serialize};

use super::base36;
use crate::types::ModelName;

/// Two-character model fingerprint carried in the barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelTag(String);

impl ModelTag {
    pub const WIDTH: usize = 2;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an already validated segment.
    pub(crate) fn from_segment(segment: &str) -> Self {
        Self(segment.to_string())
    }
}

impl fmt::Display for ModelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// BLAKE3 of the normalized name, first two digest bytes read big-endian,
/// reduced to two base-36 digits. Lossy by construction.
pub fn fingerprint(model: &ModelName) -> ModelTag {
    let digest = blake3::hash(model.as_str().as_bytes());
    let bytes = digest.as_bytes();
    let value = u64::from(u16::from_be_bytes([bytes[0], bytes[1]])) % base36::capacity(ModelTag::WIDTH);
    let digits = base36::encode_fixed(value, ModelTag::WIDTH).unwrap_or_else(|| "00".to_string());
    ModelTag(digits)
}
