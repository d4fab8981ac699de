//! Several station handles on one database file.

use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

use stitchtrack_core::config::StoreConfig;
use stitchtrack_core::traits::{IBatchStore, IReferenceStore};
use stitchtrack_core::types::{ReferenceKind, Trigger};
use stitchtrack_core::{BatchAttributes, BatchId, Phase, PhaseMachine, RetryPolicy, ScanMode, Status};
use stitchtrack_storage::SqliteStore;

fn open(path: &Path) -> SqliteStore {
    SqliteStore::open_path(path, &StoreConfig::default()).unwrap()
}

fn register(store: &Arc<SqliteStore>, serial: i64) -> (BatchId, String) {
    let attrs = BatchAttributes {
        brand_id: store.get_or_create(ReferenceKind::Brand, "northwind").unwrap(),
        model_name: "tx2041slim".to_string(),
        size_id: store.get_or_create(ReferenceKind::Size, "m").unwrap(),
        color_id: store.get_or_create(ReferenceKind::Color, "red").unwrap(),
        quantity: 10,
        layers: 4,
        serial,
    };
    let model_id = store.get_or_create(ReferenceKind::Model, "tx2041slim").unwrap();
    let machine = PhaseMachine::new(Arc::clone(store), RetryPolicy::default());
    let id = machine.register_attributes(&attrs, model_id).unwrap().batch_id();
    let barcode = store.find_by_id(id).unwrap().unwrap().barcode;
    (id, barcode)
}

#[test]
fn concurrent_in_and_out_lose_no_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("floor.db");
    let setup = Arc::new(open(&path));

    for serial in 1..=10 {
        let (id, barcode) = register(&setup, serial);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [(ScanMode::In, Phase::Sewing), (ScanMode::Out, Phase::Cutting)]
            .into_iter()
            .map(|(mode, target)| {
                let path = path.clone();
                let barcode = barcode.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let machine = PhaseMachine::new(open(&path), RetryPolicy::default());
                    barrier.wait();
                    machine.scan(&barcode, mode, target).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().wrote());
        }

        let record = setup.find_by_id(id).unwrap().unwrap();
        assert_eq!(record.revision, 2, "batch {serial} lost an update");
        assert_eq!(record.state.phase, Phase::Sewing);
        assert!(matches!(record.state.status, Status::Pending | Status::InProgress));

        let history = setup.phase_history(id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].from, history[0].to);
        let mut triggers: Vec<_> = history.iter().map(|e| e.trigger.as_str()).collect();
        triggers.sort_unstable();
        assert_eq!(triggers, [Trigger::ScanIn.as_str(), Trigger::ScanOut.as_str()]);
    }
}

#[test]
fn concurrent_reference_upserts_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("refs.db");
    drop(open(&path));

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = open(&path);
                barrier.wait();
                store.get_or_create(ReferenceKind::Brand, "acme").unwrap()
            })
        })
        .collect();
    let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(open(&path).list_references(ReferenceKind::Brand).unwrap().len(), 1);
}
