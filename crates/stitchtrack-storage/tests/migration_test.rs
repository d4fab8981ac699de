//! Schema setup across reopen and concurrent open.

use std::sync::{Arc, Barrier};
use std::thread;

use stitchtrack_core::config::{StitchConfig, StoreConfig};
use stitchtrack_core::traits::IReferenceStore;
use stitchtrack_core::types::ReferenceKind;
use stitchtrack_storage::migrations::LATEST_VERSION;
use stitchtrack_storage::SqliteStore;

#[test]
fn reopen_keeps_schema_and_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reopen.db");

    let store = SqliteStore::open_path(&path, &StoreConfig::default()).unwrap();
    let id = store.get_or_create(ReferenceKind::Size, "xl").unwrap();
    drop(store);

    let store = SqliteStore::open_path(&path, &StoreConfig::default()).unwrap();
    assert_eq!(store.schema_version().unwrap(), LATEST_VERSION);
    assert_eq!(store.get_or_create(ReferenceKind::Size, "xl").unwrap(), id);
    assert!(store.pool().is_wal_mode().unwrap());
}

#[test]
fn stations_joining_a_migrated_database_apply_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("floor.db");
    drop(SqliteStore::open_path(&path, &StoreConfig::default()).unwrap());
    let barrier = Arc::new(Barrier::new(3));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                SqliteStore::open_path(&path, &StoreConfig::default())
                    .unwrap()
                    .schema_version()
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), LATEST_VERSION);
    }
}

#[test]
fn opens_from_toml_config() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("configured.db");
    let toml = format!(
        "[store]\ndb_path = {:?}\nbusy_timeout_ms = 250\nread_pool_size = 1\n",
        db.display().to_string()
    );
    let config = StitchConfig::from_toml(&toml).unwrap();
    let store = SqliteStore::from_config(&config).unwrap();
    assert_eq!(store.pool().reader_count(), 1);
    assert!(db.exists());
}
