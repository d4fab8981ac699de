//! Descriptive attributes of a batch, the input to barcode encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{FieldViolation, ValidationError};

pub const QUANTITY_RANGE: std::ops::RangeInclusive<i64> = 1..=999;
pub const LAYERS_RANGE: std::ops::RangeInclusive<i64> = 1..=99;
pub const SERIAL_RANGE: std::ops::RangeInclusive<i64> = 1..=999;

/// Model name reduced to its alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelName(String);

impl ModelName {
    pub const MIN_LEN: usize = 7;

    /// Strip everything that is not alphanumeric.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.chars().filter(|c| c.is_alphanumeric()).collect())
    }

    /// Normalize, then right-pad with `'0'` up to [`Self::MIN_LEN`].
    /// Intake uses this; `encode` does not pad on its own.
    pub fn padded(raw: &str) -> Self {
        let mut name = Self::normalize(raw);
        let missing = Self::MIN_LEN.saturating_sub(name.len());
        name.0.extend(std::iter::repeat('0').take(missing));
        name
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a barcode is derived from. Ids refer to the brand / size /
/// color reference tables; the model is carried by name because only its
/// fingerprint goes into the barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAttributes {
    pub brand_id: i64,
    pub model_name: String,
    pub size_id: i64,
    pub color_id: i64,
    pub quantity: i64,
    pub layers: i64,
    pub serial: i64,
}

impl BatchAttributes {
    pub fn model(&self) -> ModelName {
        ModelName::normalize(&self.model_name)
    }

    /// Check every field and report all violations at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        check_reference_id(&mut violations, "brand_id", self.brand_id);
        check_model(&mut violations, &self.model());
        check_reference_id(&mut violations, "size_id", self.size_id);
        check_reference_id(&mut violations, "color_id", self.color_id);
        check_counts(&mut violations, self.quantity, self.layers, self.serial);
        into_result(violations)
    }

    /// Shorthand for [`crate::encoding::encode`].
    pub fn barcode(&self) -> Result<crate::encoding::Barcode, ValidationError> {
        crate::encoding::encode(self)
    }
}

/// Serial as persisted and printed: always three digits.
pub fn serial_code(serial: u16) -> String {
    format!("{serial:03}")
}

pub(crate) fn into_result(violations: Vec<FieldViolation>) -> Result<(), ValidationError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

pub(crate) fn check_reference_id(out: &mut Vec<FieldViolation>, field: &'static str, id: i64) {
    let max = crate::encoding::max_reference_id() as i64;
    if id < 1 || id > max {
        out.push(FieldViolation {
            field,
            message: format!("{field} must be between 1-{max}"),
        });
    }
}

pub(crate) fn check_model(out: &mut Vec<FieldViolation>, model: &ModelName) {
    if model.is_empty() {
        out.push(FieldViolation {
            field: "model_name",
            message: "Model name is missing.".to_string(),
        });
    } else if model.len() < ModelName::MIN_LEN {
        out.push(FieldViolation {
            field: "model_name",
            message: "Model name must be at least 7 alphanumeric characters.".to_string(),
        });
    }
}

pub(crate) fn check_counts(out: &mut Vec<FieldViolation>, quantity: i64, layers: i64, serial: i64) {
    if !QUANTITY_RANGE.contains(&quantity) {
        out.push(FieldViolation {
            field: "quantity",
            message: "Quantity must be between 1-999.".to_string(),
        });
    }
    if !LAYERS_RANGE.contains(&layers) {
        out.push(FieldViolation {
            field: "layers",
            message: "Layers must be between 1-99.".to_string(),
        });
    }
    if !SERIAL_RANGE.contains(&serial) {
        out.push(FieldViolation {
            field: "serial",
            message: "Serial must be between 1-999.".to_string(),
        });
    }
}
