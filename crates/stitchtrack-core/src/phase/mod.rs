//! Production-phase state machine.
//!
//! [`transition::plan`] decides what a scan does to a batch; the
//! [`PhaseMachine`] applies that decision through an [`crate::IBatchStore`]
//! with an optimistic compare-and-set loop.

mod machine;
mod outcome;
pub mod transition;

pub use machine::PhaseMachine;
pub use outcome::ScanOutcome;
pub use transition::{plan, Plan};
