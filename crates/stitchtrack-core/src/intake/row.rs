use serde::{Deserialize, Serialize};

use crate::types::{ModelName, ReferenceKind};

/// One spreadsheet row, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeRow {
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub size_value: Option<String>,
    pub color_name: Option<String>,
    pub quantity: Option<String>,
    pub layers: Option<String>,
    pub serial: Option<String>,
}

/// Row with every column present and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CompleteRow {
    pub brand: String,
    pub model: String,
    pub size: String,
    pub color: String,
    pub quantity: String,
    pub layers: String,
    pub serial: String,
}

impl IntakeRow {
    /// `None` if any column is missing or blank.
    pub(crate) fn complete(&self) -> Option<CompleteRow> {
        let take = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(CompleteRow {
            brand: take(&self.brand_name)?,
            model: take(&self.model_name)?,
            size: take(&self.size_value)?,
            color: take(&self.color_name)?,
            quantity: take(&self.quantity)?,
            layers: take(&self.layers)?,
            serial: take(&self.serial)?,
        })
    }
}

/// Spreadsheets hand integers back as `"12.0"`.
pub(crate) fn strip_float_suffix(raw: &str) -> &str {
    match raw.split_once('.') {
        Some((int, frac)) if !int.is_empty() && frac.chars().all(|c| c == '0') => int,
        _ => raw,
    }
}

pub(crate) fn parse_count(raw: &str) -> Option<i64> {
    let digits = strip_float_suffix(raw.trim());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Numeric model names lose their leading zeros and any fraction
/// (`"0001234"` is `"1234"`, `"12.5"` is `"12"`). Anything else is unchanged.
fn canonical_number(raw: &str) -> &str {
    let digits_only = raw.chars().filter(|&c| c != '.').collect::<String>();
    if digits_only.is_empty() || !digits_only.chars().all(|c| c.is_ascii_digit()) {
        return raw;
    }
    let int = raw.split('.').next().unwrap_or(raw).trim_start_matches('0');
    if int.is_empty() {
        "0"
    } else {
        int
    }
}

/// Canonical stored name for a reference value, or `None` if blank.
/// Brand, size and color are trimmed and lowercased. Model names keep
/// their case; they are reduced to alphanumerics and padded to the
/// minimum length.
pub fn normalize_reference(kind: ReferenceKind, raw: &str) -> Option<String> {
    let trimmed = strip_float_suffix(raw.trim());
    let name = match kind {
        ReferenceKind::Model => {
            let model = canonical_number(trimmed);
            if ModelName::normalize(model).is_empty() {
                return None;
            }
            ModelName::padded(model).as_str().to_string()
        }
        ReferenceKind::Brand | ReferenceKind::Size | ReferenceKind::Color => {
            trimmed.to_lowercase()
        }
    };
    (!name.is_empty()).then_some(name)
}
