//! A simple file-backed store layered over [`MemoryStore`].
//!
//! Each record is flushed to its own file under `base_dir`, named by
//! kind and id, on every write; the in-memory map continues to serve
//! reads so the store stays fast for the population manager's tight
//! generation loop while remaining durable across restarts.

use crate::{
    error::Result,
    ids::{Kind, RecordId},
    memory::MemoryStore,
    traits::{Record, Store},
};
use std::path::{Path, PathBuf};

/// File-backed implementation of the persistence contract
pub struct FileStore {
    cache: MemoryStore,
    base_dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a file store rooted at `base_dir`,
    /// loading any records already present.
    pub fn open<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;

        let mut cache = MemoryStore::new();
        for kind in Kind::ALL {
            let dir = base_dir.join(kind_dir(kind));
            if !dir.exists() {
                continue;
            }
            for entry in std::fs::read_dir(&dir)? {
                let entry = entry?;
                let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str().map(str::to_owned)) else {
                    continue;
                };
                let Ok(token) = stem.parse::<u64>() else {
                    continue;
                };
                let bytes = std::fs::read(entry.path())?;
                cache.store(kind, RecordId::new(token), Record::new(bytes))?;
            }
        }

        Ok(Self { cache, base_dir })
    }

    fn record_path(&self, kind: Kind, id: RecordId) -> PathBuf {
        self.base_dir.join(kind_dir(kind)).join(format!("{}.bin", id.raw()))
    }
}

fn kind_dir(kind: Kind) -> &'static str {
    match kind {
        Kind::Experiment => "experiment",
        Kind::Population => "population",
        Kind::Specie => "specie",
        Kind::Agent => "agent",
        Kind::Cortex => "cortex",
        Kind::Neuron => "neuron",
        Kind::Sensor => "sensor",
        Kind::Actuator => "actuator",
        Kind::Morphology => "morphology",
        Kind::Trace => "trace",
        Kind::Stat => "stat",
        Kind::Champion => "champion",
    }
}

impl Store for FileStore {
    fn store(&mut self, kind: Kind, id: RecordId, value: Record) -> Result<()> {
        let path = self.record_path(kind, id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, value.as_bytes())?;
        self.cache.store(kind, id, value)
    }

    fn read(&self, id: RecordId, kind: Kind) -> Result<Option<Record>> {
        self.cache.read(id, kind)
    }

    fn delete(&mut self, id: RecordId, kind: Kind) -> Result<()> {
        let path = self.record_path(kind, id);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        self.cache.delete(id, kind)
    }

    fn list(&self, kind: Kind) -> Result<Vec<(RecordId, Record)>> {
        self.cache.list(kind)
    }

    fn backup(&self, path: &Path) -> Result<PathBuf> {
        self.cache.backup(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_reopen_recovers_records() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store
                .store(Kind::Agent, RecordId::new(1), Record::new(vec![5, 6]))
                .unwrap();
        }

        let reopened = FileStore::open(dir.path()).unwrap();
        let found = reopened.read(RecordId::new(1), Kind::Agent).unwrap();
        assert_eq!(found, Some(Record::new(vec![5, 6])));
    }

    #[test]
    fn delete_removes_file_and_cache_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let id = RecordId::new(2);
        store.store(Kind::Trace, id, Record::new(vec![1])).unwrap();
        store.delete(id, Kind::Trace).unwrap();
        assert!(store.read(id, Kind::Trace).unwrap().is_none());
    }
}
