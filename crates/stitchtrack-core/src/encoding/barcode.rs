use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base36;
use super::fingerprint::{fingerprint, ModelTag};
use crate::errors::{DecodeError, ValidationError};
use crate::types::attributes::{LAYERS_RANGE, QUANTITY_RANGE, SERIAL_RANGE};
use crate::types::BatchAttributes;

pub const SEPARATOR: char = '-';
const SEPARATOR_STR: &str = "-";
pub const SEGMENT_COUNT: usize = 7;

/// Segment names and widths, in barcode order.
const SEGMENTS: [(&str, usize); SEGMENT_COUNT] = [
    ("brand", 3),
    ("model", ModelTag::WIDTH),
    ("size", 3),
    ("color", 3),
    ("quantity", 2),
    ("layers", 2),
    ("serial", 2),
];

/// Total length including separators.
pub const BARCODE_LEN: usize = 3 + 2 + 3 + 3 + 2 + 2 + 2 + (SEGMENT_COUNT - 1);

/// An encoded batch identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Barcode(String);

impl Barcode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn segments(&self) -> Result<BarcodeSegments, DecodeError> {
        decode(&self.0)
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What a barcode gives back. The model name is not recoverable, only its tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeSegments {
    pub brand_id: u64,
    pub model_tag: ModelTag,
    pub size_id: u64,
    pub color_id: u64,
    pub quantity: u16,
    pub layers: u8,
    pub serial: u16,
}

/// Validate `attrs` and render its barcode. Deterministic.
pub fn encode(attrs: &BatchAttributes) -> Result<Barcode, ValidationError> {
    attrs.validate()?;

    let tag = fingerprint(&attrs.model());
    let values = [
        Some(attrs.brand_id as u64),
        None,
        Some(attrs.size_id as u64),
        Some(attrs.color_id as u64),
        Some(attrs.quantity as u64),
        Some(attrs.layers as u64),
        Some(attrs.serial as u64),
    ];

    let mut parts = Vec::with_capacity(SEGMENT_COUNT);
    for (&(name, width), value) in SEGMENTS.iter().zip(values) {
        match value {
            None => parts.push(tag.as_str().to_string()),
            Some(v) => {
                // Ranges were checked by validate(); this only fires if a
                // segment width and its range disagree.
                let digits = base36::encode_fixed(v, width).ok_or_else(|| {
                    ValidationError::single(name, format!("{name} {v} does not fit {width} digits"))
                })?;
                parts.push(digits);
            }
        }
    }

    let code = parts.join(SEPARATOR_STR);
    debug!(barcode = %code, model_tag = %tag, "encoded batch attributes");
    Ok(Barcode(code))
}

/// Split a barcode into its segments. Strict: exact widths, uppercase
/// alphabet, in-range values.
pub fn decode(code: &str) -> Result<BarcodeSegments, DecodeError> {
    if code.is_empty() {
        return Err(DecodeError::Empty);
    }

    let parts: Vec<&str> = code.split(SEPARATOR).collect();
    if parts.len() != SEGMENT_COUNT {
        return Err(DecodeError::SegmentCount {
            expected: SEGMENT_COUNT,
            found: parts.len(),
        });
    }

    let mut values = [0u64; SEGMENT_COUNT];
    for (i, (&(name, width), part)) in SEGMENTS.iter().zip(&parts).enumerate() {
        if part.chars().count() != width {
            return Err(DecodeError::SegmentWidth {
                segment: name,
                expected: width,
                actual: part.to_string(),
            });
        }
        values[i] = base36::decode_digits(part)
            .map_err(|ch| DecodeError::InvalidCharacter { segment: name, ch })?;
    }

    let [brand, _, size, color, quantity, layers, serial] = values;
    for (name, value) in [("brand", brand), ("size", size), ("color", color)] {
        if value == 0 {
            return Err(DecodeError::OutOfRange { segment: name, value });
        }
    }
    let in_range = |name: &'static str, value: u64, range: std::ops::RangeInclusive<i64>| {
        if range.contains(&(value as i64)) {
            Ok(value)
        } else {
            Err(DecodeError::OutOfRange { segment: name, value })
        }
    };

    Ok(BarcodeSegments {
        brand_id: brand,
        model_tag: ModelTag::from_segment(parts[1]),
        size_id: size,
        color_id: color,
        quantity: in_range("quantity", quantity, QUANTITY_RANGE)? as u16,
        layers: in_range("layers", layers, LAYERS_RANGE)? as u8,
        serial: in_range("serial", serial, SERIAL_RANGE)? as u16,
    })
}
