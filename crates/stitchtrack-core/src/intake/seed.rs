use tracing::info;

use super::row::normalize_reference;
use crate::errors::TrackResult;
use crate::retry::{Attempt, RetryPolicy};
use crate::traits::IReferenceStore;
use crate::types::ReferenceKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Names now present, whether inserted by this call or already there.
    pub resolved: usize,
    pub blank: usize,
}

/// Make sure every name in `names` exists in the `kind` table.
pub fn seed_references<R, I, N>(
    refs: &R,
    kind: ReferenceKind,
    names: I,
    retry: &RetryPolicy,
) -> TrackResult<SeedSummary>
where
    R: IReferenceStore + ?Sized,
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    let mut summary = SeedSummary::default();
    for raw in names {
        let Some(name) = normalize_reference(kind, raw.as_ref()) else {
            summary.blank += 1;
            continue;
        };
        retry.run("seed_reference", |_| {
            refs.get_or_create(kind, &name).map(Attempt::Done)
        })?;
        summary.resolved += 1;
    }
    info!(kind = %kind, resolved = summary.resolved, blank = summary.blank, "references seeded");
    Ok(summary)
}
