use crate::types::{BatchRecord, PhaseState, ScanMode, Status};

/// Result of one scan. A missing batch is an outcome here, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    NotFound { barcode: String },
    Viewed(BatchRecord),
    /// The write went through; `batch` is the state after it.
    Transitioned {
        mode: ScanMode,
        from: PhaseState,
        batch: BatchRecord,
    },
    Unchanged(BatchRecord),
    AlreadyCompleted(BatchRecord),
}

impl ScanOutcome {
    pub fn batch(&self) -> Option<&BatchRecord> {
        match self {
            Self::NotFound { .. } => None,
            Self::Viewed(b) | Self::Unchanged(b) | Self::AlreadyCompleted(b) => Some(b),
            Self::Transitioned { batch, .. } => Some(batch),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn wrote(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }

    /// One-line operator message for the scanner station.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { barcode } => format!("Barcode '{barcode}' was not found."),
            Self::Viewed(b) => format!("Item {} is at {}.", b.barcode, b.state),
            Self::Transitioned { batch, .. } if batch.state.status == Status::Completed => {
                format!("Item {} has completed production.", batch.barcode)
            }
            Self::Transitioned {
                mode: ScanMode::Out,
                batch,
                ..
            } => format!("Item {} moved to {}.", batch.barcode, batch.state.phase),
            Self::Transitioned { batch, .. } => {
                format!("Item {} started in {}.", batch.barcode, batch.state.phase)
            }
            Self::Unchanged(b) => format!("Item {} is already at {}.", b.barcode, b.state),
            Self::AlreadyCompleted(b) => {
                format!("Item {} has already completed production.", b.barcode)
            }
        }
    }
}
