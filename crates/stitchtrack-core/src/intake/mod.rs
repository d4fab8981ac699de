//! Bulk batch intake and reference seeding.
//!
//! Rows arrive already parsed (one string per column). Planning validates
//! and normalizes them, resolves reference ids and encodes barcodes;
//! committing persists the planned batches through the phase machine.

mod plan;
mod row;
mod seed;

pub use plan::{commit_intake, plan_intake, CommitSummary, IntakeReport, PlannedBatch, RowError};
pub use row::{normalize_reference, IntakeRow};
pub use seed::{seed_references, SeedSummary};
