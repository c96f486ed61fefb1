//! Bincode-backed (de)serialization and bounded-retry writes against the
//! [`Store`] contract (spec.md §6, §7's storage-failure handling).

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tweann_storage::{Kind, Record, RecordId, Store};

use crate::error::{ExperimentError, Result};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

fn encode<T: Serialize>(what: &str, value: &T) -> Result<Record> {
    bincode::serialize(value)
        .map(Record::new)
        .map_err(|err| ExperimentError::Codec { what: what.to_string(), reason: err.to_string() })
}

fn decode<T: DeserializeOwned>(what: &str, record: &Record) -> Result<T> {
    bincode::deserialize(record.as_bytes())
        .map_err(|err| ExperimentError::Codec { what: what.to_string(), reason: err.to_string() })
}

/// Persist `value` under `(kind, id)`, retrying with a short fixed
/// backoff before surfacing a fatal [`ExperimentError::StorageExhausted`].
pub async fn persist<T: Serialize>(store: &mut dyn Store, kind: Kind, id: RecordId, what: &str, value: &T) -> Result<()> {
    let record = encode(what, value)?;
    let mut last_err = None;
    for attempt in 1..=MAX_ATTEMPTS {
        match store.store(kind, id, record.clone()) {
            Ok(()) => return Ok(()),
            Err(err) => {
                log::warn!("attempt {attempt}/{MAX_ATTEMPTS} to persist {what} failed: {err}");
                last_err = Some(err);
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
        }
    }
    Err(ExperimentError::StorageExhausted {
        what: what.to_string(),
        attempts: MAX_ATTEMPTS,
        source: last_err.expect("loop ran at least once"),
    })
}

/// Read and decode the record at `(kind, id)`, if present
pub fn load<T: DeserializeOwned>(store: &dyn Store, kind: Kind, id: RecordId, what: &str) -> Result<Option<T>> {
    match store.read(id, kind).map_err(|source| ExperimentError::StorageExhausted { what: what.to_string(), attempts: 1, source })? {
        Some(record) => decode(what, &record).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tweann_storage::MemoryStore;

    #[tokio::test]
    async fn persist_then_load_round_trips() {
        let mut store = MemoryStore::default();
        persist(&mut store, Kind::Stat, RecordId::new(1), "test value", &42u32).await.unwrap();
        let loaded: Option<u32> = load(&store, Kind::Stat, RecordId::new(1), "test value").unwrap();
        assert_eq!(loaded, Some(42));
    }

    #[test]
    fn load_of_missing_record_is_none() {
        let store = MemoryStore::default();
        let loaded: Option<u32> = load(&store, Kind::Stat, RecordId::new(99), "test value").unwrap();
        assert_eq!(loaded, None);
    }
}
