//! `IReferenceStore` trait: brand, model, size and color lookup tables.

use std::sync::Arc;

use crate::errors::StorageError;
use crate::types::{ReferenceEntry, ReferenceKind};

pub trait IReferenceStore: Send + Sync {
    /// Id for `name`, inserting it first if needed. One idempotent
    /// statement; concurrent callers with the same name get the same id.
    fn get_or_create(&self, kind: ReferenceKind, name: &str) -> Result<i64, StorageError>;

    /// All entries of `kind`, ordered by name.
    fn list_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>, StorageError>;

    /// Case-insensitive substring search. An empty needle returns everything.
    fn search_references(
        &self,
        kind: ReferenceKind,
        needle: &str,
    ) -> Result<Vec<ReferenceEntry>, StorageError> {
        let needle = needle.trim().to_lowercase();
        let mut entries = self.list_references(kind)?;
        if !needle.is_empty() {
            entries.retain(|e| e.name.to_lowercase().contains(&needle));
        }
        Ok(entries)
    }
}

// ─── Arc blanket impl ───────────────────────────────────────────────

impl<T: IReferenceStore + ?Sized> IReferenceStore for Arc<T> {
    fn get_or_create(&self, kind: ReferenceKind, name: &str) -> Result<i64, StorageError> {
        (**self).get_or_create(kind, name)
    }
    fn list_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>, StorageError> {
        (**self).list_references(kind)
    }
    fn search_references(
        &self,
        kind: ReferenceKind,
        needle: &str,
    ) -> Result<Vec<ReferenceEntry>, StorageError> {
        (**self).search_references(kind, needle)
    }
}
