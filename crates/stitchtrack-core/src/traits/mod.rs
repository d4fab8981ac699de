//! Shared traits used across Stitchtrack crates.

pub mod storage;

pub use storage::{IBatchStore, IReferenceStore};
