//! In-memory reference implementation of the persistence contract.
//!
//! This is the only concrete `Store` shipped in this crate: a real
//! production backend is a non-goal (spec.md §1). It exists so the
//! population manager and experiment controller can be exercised in
//! tests and so the contract itself is demonstrably implementable.

use crate::{
    error::Result,
    ids::{Kind, RecordId},
    traits::{Record, Store},
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An in-memory, multi-reader/multi-writer key/value store keyed by
/// `(Kind, RecordId)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<(Kind, RecordId), Record>,
}

impl MemoryStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Number of records currently held, across all kinds
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Store for MemoryStore {
    fn store(&mut self, kind: Kind, id: RecordId, value: Record) -> Result<()> {
        log::debug!("storing {:?} {}", kind, id);
        self.records.insert((kind, id), value);
        Ok(())
    }

    fn read(&self, id: RecordId, kind: Kind) -> Result<Option<Record>> {
        Ok(self.records.get(&(kind, id)).cloned())
    }

    fn delete(&mut self, id: RecordId, kind: Kind) -> Result<()> {
        self.records.remove(&(kind, id));
        Ok(())
    }

    fn list(&self, kind: Kind) -> Result<Vec<(RecordId, Record)>> {
        Ok(self
            .records
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|((_, id), v)| (*id, v.clone()))
            .collect())
    }

    fn backup(&self, path: &Path) -> Result<PathBuf> {
        use std::io::Write;
        let mut file = std::fs::File::create(path)?;
        for ((kind, id), record) in &self.records {
            writeln!(
                file,
                "{:?}\t{}\t{}",
                kind,
                id,
                record.as_bytes().len()
            )?;
            file.write_all(record.as_bytes())?;
            file.write_all(b"\n")?;
        }
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_read_round_trips() {
        let mut store = MemoryStore::new();
        let id = RecordId::new(1);
        store.store(Kind::Agent, id, Record::new(vec![9, 9])).unwrap();
        let found = store.read(id, Kind::Agent).unwrap();
        assert_eq!(found, Some(Record::new(vec![9, 9])));
    }

    #[test]
    fn read_missing_record_is_none_not_error() {
        let store = MemoryStore::new();
        let found = store.read(RecordId::new(42), Kind::Trace).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = MemoryStore::new();
        let id = RecordId::new(1);
        store.store(Kind::Specie, id, Record::new(vec![1])).unwrap();
        store.delete(id, Kind::Specie).unwrap();
        store.delete(id, Kind::Specie).unwrap();
        assert!(store.read(id, Kind::Specie).unwrap().is_none());
    }

    #[test]
    fn list_filters_by_kind() {
        let mut store = MemoryStore::new();
        store
            .store(Kind::Agent, RecordId::new(1), Record::new(vec![1]))
            .unwrap();
        store
            .store(Kind::Trace, RecordId::new(1), Record::new(vec![2]))
            .unwrap();
        store
            .store(Kind::Agent, RecordId::new(2), Record::new(vec![3]))
            .unwrap();

        let agents = store.list(Kind::Agent).unwrap();
        assert_eq!(agents.len(), 2);
        let traces = store.list(Kind::Trace).unwrap();
        assert_eq!(traces.len(), 1);
    }

    #[test]
    fn backup_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.tsv");

        let mut store = MemoryStore::new();
        store
            .store(Kind::Champion, RecordId::new(1), Record::new(vec![1, 2, 3]))
            .unwrap();

        let written = store.backup(&path).unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
    }
}
