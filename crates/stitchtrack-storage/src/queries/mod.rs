//! Raw SQL operations, one module per table group.

pub mod batch_ops;
pub mod event_ops;
pub mod reference_ops;
