//! Bulk intake end to end against a real database.

use std::sync::Arc;

use stitchtrack_core::intake::{commit_intake, plan_intake, seed_references, IntakeRow};
use stitchtrack_core::traits::{IBatchStore, IReferenceStore};
use stitchtrack_core::types::{BatchFilter, ReferenceKind};
use stitchtrack_core::{PhaseMachine, PhaseState, RetryPolicy, ScanMode, ScanOutcome};
use stitchtrack_storage::SqliteStore;

fn row(model: &str, qty: &str, serial: &str) -> IntakeRow {
    IntakeRow {
        brand_name: Some(" Northwind ".into()),
        model_name: Some(model.into()),
        size_value: Some("XL".into()),
        color_name: Some("Navy".into()),
        quantity: Some(qty.into()),
        layers: Some("20".into()),
        serial: Some(serial.into()),
    }
}

#[test]
fn plan_commit_and_scan() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let retry = RetryPolicy::no_backoff(3);

    let rows = vec![
        row("TX-2041 Slim", "120", "1"),
        row("TX-2041 Slim", "120", "1"),
        row("TX-20", "120.0", "2"),
        row("TX-2041 Slim", "1000", "3"),
        IntakeRow {
            color_name: None,
            ..row("TX-2041 Slim", "5", "4")
        },
    ];
    let report = plan_intake(store.as_ref(), &rows, &retry).unwrap();
    assert_eq!(report.planned.len(), 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(report.rejected[0].row, 5);
    assert_eq!(report.rejected[0].message, "Missing required values.");
    assert_eq!(report.rejected[1].row, 4);
    assert_eq!(report.rejected[1].message, "Quantity must be between 1-999.");
    assert_eq!(report.planned[1].model, "TX20000");

    let machine = PhaseMachine::new(Arc::clone(&store), retry);
    let summary = commit_intake(&machine, &report).unwrap();
    assert_eq!(summary.created.len(), 2);
    assert!(summary.skipped.is_empty());

    let again = commit_intake(&machine, &report).unwrap();
    assert!(again.created.is_empty());
    assert_eq!(again.skipped.len(), 2);

    let views = machine.list(&BatchFilter::default()).unwrap();
    assert_eq!(views.len(), 2);
    assert!(views.iter().all(|v| v.brand_name.as_deref() == Some("northwind")));

    let barcode = &report.planned[0].batch.barcode;
    let outcome = machine.scan_named(barcode, ScanMode::In, "cutting").unwrap();
    assert!(matches!(outcome, ScanOutcome::Transitioned { .. }));
    let record = store.find_by_barcode(barcode).unwrap().unwrap();
    assert_ne!(record.state, PhaseState::INITIAL);
}

#[test]
fn seeding_normalizes_and_dedups() {
    let store = SqliteStore::open_in_memory().unwrap();
    let retry = RetryPolicy::no_backoff(1);
    let summary =
        seed_references(&store, ReferenceKind::Size, ["S", " s", "M", "", "L"], &retry).unwrap();
    assert_eq!((summary.resolved, summary.blank), (4, 1));
    let sizes = store.list_references(ReferenceKind::Size).unwrap();
    let names: Vec<_> = sizes.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["l", "m", "s"]);
}
