//! Shared data structures.

pub mod attributes;
pub mod batch;
pub mod phase;
pub mod reference;

pub use attributes::{BatchAttributes, ModelName};
pub use batch::{
    BatchFilter, BatchId, BatchRecord, BatchView, CreateOutcome, NewBatch, PhaseEvent,
    PhaseUpdate, Trigger,
};
pub use phase::{Phase, PhaseState, ScanMode, Status, UnknownVariant};
pub use reference::{ReferenceEntry, ReferenceKind};
