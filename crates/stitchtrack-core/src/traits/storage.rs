//! Storage trait module, re-exports all stitchtrack storage traits.
//!
//! These traits define the contract between the phase machine / intake
//! logic and the persistence backend. The SQLite implementation lives in
//! `stitchtrack-storage`. All traits are object-safe, `Send + Sync`, and
//! have blanket `Arc<T>` impls.

pub mod batch_store;
pub mod reference_store;
pub mod test_helpers;

pub use batch_store::IBatchStore;
pub use reference_store::IReferenceStore;
