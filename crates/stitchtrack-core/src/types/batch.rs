//! Persisted batch records and the values exchanged with the store.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::attributes::{serial_code, BatchAttributes};
use super::phase::{Phase, PhaseState, ScanMode, Status};
use crate::encoding;
use crate::errors::ValidationError;

/// System-assigned batch identifier (`batches.batch_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BatchId(pub i64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A batch as the state machine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: BatchId,
    pub barcode: String,
    pub brand_id: i64,
    pub model_id: i64,
    pub size_id: i64,
    pub color_id: i64,
    pub quantity: u16,
    pub layers: u8,
    pub serial: u16,
    pub state: PhaseState,
    /// Bumped on every phase/status write; the compare-and-set token.
    pub revision: i64,
}

impl BatchRecord {
    pub fn serial_code(&self) -> String {
        serial_code(self.serial)
    }
}

/// Insert payload. New batches always start at [`PhaseState::INITIAL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBatch {
    pub barcode: String,
    pub brand_id: i64,
    pub model_id: i64,
    pub size_id: i64,
    pub color_id: i64,
    pub quantity: u16,
    pub layers: u8,
    pub serial: u16,
}

impl NewBatch {
    /// Encode `attrs` and pair the barcode with the resolved model id.
    pub fn from_attributes(attrs: &BatchAttributes, model_id: i64) -> Result<Self, ValidationError> {
        if model_id < 1 {
            return Err(ValidationError::single("model_id", "model_id must be positive"));
        }
        let barcode = encoding::encode(attrs)?;
        // encode() validated every range below.
        Ok(Self {
            barcode: barcode.into_string(),
            brand_id: attrs.brand_id,
            model_id,
            size_id: attrs.size_id,
            color_id: attrs.color_id,
            quantity: attrs.quantity as u16,
            layers: attrs.layers as u8,
            serial: attrs.serial as u16,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(BatchId),
    /// The barcode was already taken; the existing row is untouched.
    AlreadyExists(BatchId),
}

impl CreateOutcome {
    pub fn batch_id(self) -> BatchId {
        match self {
            Self::Created(id) | Self::AlreadyExists(id) => id,
        }
    }

    pub fn is_created(self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// What caused a phase/status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    ScanIn,
    ScanOut,
    /// Manual edit from the admin table.
    Override,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScanIn => "IN",
            Self::ScanOut => "OUT",
            Self::Override => "OVERRIDE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(Self::ScanIn),
            "OUT" => Some(Self::ScanOut),
            "OVERRIDE" => Some(Self::Override),
            _ => None,
        }
    }

    pub fn from_scan(mode: ScanMode) -> Option<Self> {
        match mode {
            ScanMode::View => None,
            ScanMode::In => Some(Self::ScanIn),
            ScanMode::Out => Some(Self::ScanOut),
        }
    }
}

/// Compare-and-set request: apply `to` only if the row is still at
/// `expected_revision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseUpdate {
    pub batch_id: BatchId,
    pub expected_revision: i64,
    pub from: PhaseState,
    pub to: PhaseState,
    pub trigger: Trigger,
}

/// One row of the phase audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub id: i64,
    pub batch_id: BatchId,
    pub trigger: Trigger,
    pub from: PhaseState,
    pub to: PhaseState,
    /// Unix seconds.
    pub created_at: i64,
}

/// Batch joined with its reference names, as listed in the admin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchView {
    pub batch_id: BatchId,
    pub barcode: String,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub size_value: Option<String>,
    pub color_name: Option<String>,
    pub quantity: u16,
    pub layers: u8,
    pub serial: String,
    pub phase: Phase,
    pub status: Status,
}

/// Case-insensitive substring filters for the admin listing.
/// Unset or blank filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchFilter {
    pub barcode: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub serial: Option<String>,
    pub phase: Option<String>,
    pub status: Option<String>,
}

impl BatchFilter {
    pub fn matches(&self, view: &BatchView) -> bool {
        fn hit(filter: &Option<String>, value: Option<&str>) -> bool {
            let Some(needle) = filter.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
                return true;
            };
            value
                .map(|v| v.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false)
        }

        hit(&self.barcode, Some(view.barcode.as_str()))
            && hit(&self.brand, view.brand_name.as_deref())
            && hit(&self.model, view.model_name.as_deref())
            && hit(&self.size, view.size_value.as_deref())
            && hit(&self.color, view.color_name.as_deref())
            && hit(&self.serial, Some(view.serial.as_str()))
            && hit(&self.phase, Some(view.phase.name()))
            && hit(&self.status, Some(view.status.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> BatchView {
        BatchView {
            batch_id: BatchId(1),
            barcode: "004-3F-002-009-3C-14-07".to_string(),
            brand_name: Some("northwind".to_string()),
            model_name: Some("TX2041Slim".to_string()),
            size_value: Some("xl".to_string()),
            color_name: None,
            quantity: 120,
            layers: 20,
            serial: "007".to_string(),
            phase: Phase::Sewing,
            status: Status::InProgress,
        }
    }

    #[test]
    fn empty_filter_matches_all() {
        assert!(BatchFilter::default().matches(&view()));
    }

    #[test]
    fn substring_and_case_insensitive() {
        let filter = BatchFilter {
            brand: Some("NORTH".into()),
            status: Some("progress".into()),
            ..Default::default()
        };
        assert!(filter.matches(&view()));
    }

    #[test]
    fn filter_on_missing_name_fails() {
        let filter = BatchFilter {
            color: Some("red".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&view()));
    }

    #[test]
    fn blank_filter_is_ignored() {
        let filter = BatchFilter {
            color: Some("   ".into()),
            ..Default::default()
        };
        assert!(filter.matches(&view()));
    }

    #[test]
    fn new_batch_carries_encoded_barcode() {
        let attrs = BatchAttributes {
            brand_id: 10,
            model_name: "TX-2041 Slim".to_string(),
            size_id: 3,
            color_id: 12,
            quantity: 12,
            layers: 5,
            serial: 1,
        };
        let batch = NewBatch::from_attributes(&attrs, 7).unwrap();
        assert_eq!(batch.barcode, attrs.barcode().unwrap().as_str());
        assert_eq!((batch.model_id, batch.quantity, batch.layers, batch.serial), (7, 12, 5, 1));
        assert!(NewBatch::from_attributes(&attrs, 0).unwrap_err().has("model_id"));
    }

    #[test]
    fn trigger_labels_round_trip() {
        for t in [Trigger::ScanIn, Trigger::ScanOut, Trigger::Override] {
            assert_eq!(Trigger::parse(t.as_str()), Some(t));
        }
        assert_eq!(Trigger::from_scan(ScanMode::View), None);
    }
}
