use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::row::{normalize_reference, parse_count, IntakeRow};
use crate::encoding::LabelText;
use crate::errors::TrackResult;
use crate::phase::PhaseMachine;
use crate::retry::{Attempt, RetryPolicy};
use crate::traits::{IBatchStore, IReferenceStore};
use crate::types::attributes::check_counts;
use crate::types::{BatchAttributes, BatchId, NewBatch, ReferenceKind};

const MISSING_VALUES: &str = "Missing required values.";
const INVALID_NUMBERS: &str = "Invalid numeric values in quantity, layers, or serial.";

/// A rejected input row. `row` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// A row that passed validation, with normalized names and its barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedBatch {
    pub row: usize,
    pub brand: String,
    pub model: String,
    pub size: String,
    pub color: String,
    pub batch: NewBatch,
}

impl PlannedBatch {
    pub fn label(&self) -> LabelText {
        LabelText::new(
            &self.batch.barcode,
            &self.brand,
            &self.model,
            &self.color,
            self.batch.quantity,
            &self.size,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeReport {
    pub planned: Vec<PlannedBatch>,
    pub rejected: Vec<RowError>,
    /// Exact duplicate rows dropped after the first occurrence.
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub created: Vec<BatchId>,
    /// Barcodes that were already registered.
    pub skipped: Vec<String>,
}

/// Validate and encode `rows`. Reference names are resolved (and created
/// if new) through `refs`; nothing is written to the batch table.
pub fn plan_intake<R: IReferenceStore + ?Sized>(
    refs: &R,
    rows: &[IntakeRow],
    retry: &RetryPolicy,
) -> TrackResult<IntakeReport> {
    let mut report = IntakeReport::default();
    let mut complete = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        match row.complete() {
            Some(c) => complete.push((i + 1, c)),
            None => report.rejected.push(RowError {
                row: i + 1,
                message: MISSING_VALUES.to_string(),
            }),
        }
    }

    let mut seen = HashSet::new();
    for (row, values) in complete {
        if !seen.insert(values.clone()) {
            report.duplicates += 1;
            continue;
        }

        let (Some(quantity), Some(layers), Some(serial)) = (
            parse_count(&values.quantity),
            parse_count(&values.layers),
            parse_count(&values.serial),
        ) else {
            report.rejected.push(RowError {
                row,
                message: INVALID_NUMBERS.to_string(),
            });
            continue;
        };

        let names = [
            (ReferenceKind::Brand, &values.brand),
            (ReferenceKind::Model, &values.model),
            (ReferenceKind::Size, &values.size),
            (ReferenceKind::Color, &values.color),
        ]
        .map(|(kind, raw)| normalize_reference(kind, raw));
        let [Some(brand), Some(model), Some(size), Some(color)] = names else {
            report.rejected.push(RowError {
                row,
                message: "Model name is missing.".to_string(),
            });
            continue;
        };

        let mut violations = Vec::new();
        check_counts(&mut violations, quantity, layers, serial);
        if !violations.is_empty() {
            let message = violations
                .iter()
                .map(|v| v.message.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            report.rejected.push(RowError { row, message });
            continue;
        }

        let resolve = |kind: ReferenceKind, name: &str| {
            retry.run("get_or_create_reference", |_| {
                refs.get_or_create(kind, name).map(Attempt::Done)
            })
        };
        let attrs = BatchAttributes {
            brand_id: resolve(ReferenceKind::Brand, &brand)?,
            model_name: model.clone(),
            size_id: resolve(ReferenceKind::Size, &size)?,
            color_id: resolve(ReferenceKind::Color, &color)?,
            quantity,
            layers,
            serial,
        };
        let model_id = resolve(ReferenceKind::Model, &model)?;

        match NewBatch::from_attributes(&attrs, model_id) {
            Ok(batch) => {
                debug!(row, barcode = %batch.barcode, "intake row planned");
                report.planned.push(PlannedBatch {
                    row,
                    brand,
                    model,
                    size,
                    color,
                    batch,
                });
            }
            Err(e) => report.rejected.push(RowError {
                row,
                message: e.messages(),
            }),
        }
    }

    info!(
        planned = report.planned.len(),
        rejected = report.rejected.len(),
        duplicates = report.duplicates,
        "intake planned"
    );
    Ok(report)
}

/// Register every planned batch. Barcodes already on file are skipped.
pub fn commit_intake<S: IBatchStore>(
    machine: &PhaseMachine<S>,
    report: &IntakeReport,
) -> TrackResult<CommitSummary> {
    let mut summary = CommitSummary::default();
    for planned in &report.planned {
        let outcome = machine.register(&planned.batch)?;
        if outcome.is_created() {
            summary.created.push(outcome.batch_id());
        } else {
            summary.skipped.push(planned.batch.barcode.clone());
        }
    }
    if !summary.skipped.is_empty() {
        warn!(skipped = summary.skipped.len(), "intake skipped registered barcodes");
    }
    info!(created = summary.created.len(), "intake committed");
    Ok(summary)
}
