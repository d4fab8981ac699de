//! Barcode encoding.
//!
//! A barcode is seven fixed-width, uppercase base-36 segments joined by `-`:
//!
//! ```text
//! brand(3) - model(2) - size(3) - color(3) - quantity(2) - layers(2) - serial(2)
//! ```
//!
//! Every barcode is exactly 23 ASCII characters. The model segment is a
//! fingerprint of the model name, not the name itself, so `decode` can
//! never give the name back.
//!
//! ## Known limitation
//! The model fingerprint has 1296 possible values. Two different model
//! names can share a tag, and two batches that also agree on every other
//! field then get the same barcode; the second `create` is skipped as a
//! duplicate. Collisions are not detected because doing so would change
//! the printed label format.

pub mod base36;
mod barcode;
mod fingerprint;
mod label;

pub use barcode::{decode, encode, Barcode, BarcodeSegments, BARCODE_LEN, SEGMENT_COUNT, SEPARATOR};
pub use fingerprint::{fingerprint, ModelTag};
pub use label::{label_lines, LabelText};

/// Width of the brand / size / color segments.
pub(crate) const REFERENCE_WIDTH: usize = 3;

/// Largest brand, size or color id that fits its segment.
pub fn max_reference_id() -> u64 {
    base36::capacity(REFERENCE_WIDTH) - 1
}
