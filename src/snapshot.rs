use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::storage::Storage;

/// Records that carry the collection-assigned integer id.
pub trait HasId {
    fn id(&self) -> u64;
}

/// A whole-collection snapshot plus the id counter that survives deletions.
///
/// `count + 1` id assignment reissues a stale id as soon as the
/// highest-numbered record is deleted, so the counter is persisted with the
/// collection and only ever grows. Plain fixture arrays (the seed format)
/// are still accepted on read; their counter starts past the largest id
/// present.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<T> {
    #[serde(rename = "nextId")]
    pub next_id: u64,
    pub items: Vec<T>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotRepr<T> {
    Envelope {
        #[serde(rename = "nextId")]
        next_id: u64,
        items: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T: HasId> Snapshot<T> {
    pub fn empty() -> Self {
        Self { next_id: 1, items: Vec::new() }
    }

    /// Hands out the next id and bumps the counter.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn from_repr(repr: SnapshotRepr<T>) -> Self {
        match repr {
            SnapshotRepr::Envelope { next_id, items } => Self { next_id, items },
            SnapshotRepr::Bare(items) => {
                let next_id = items.iter().map(HasId::id).max().unwrap_or(0) + 1;
                Self { next_id, items }
            }
        }
    }
}

/// Reads and parses the snapshot stored under `key`; absent means empty.
pub fn load<T>(storage: &dyn Storage, key: &str) -> Result<Snapshot<T>>
where
    T: HasId + DeserializeOwned,
{
    match storage.read(key)? {
        None => Ok(Snapshot::empty()),
        Some(raw) => {
            let repr: SnapshotRepr<T> =
                serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })?;
            Ok(Snapshot::from_repr(repr))
        }
    }
}

/// Serializes and writes the whole collection back under `key`.
pub fn save<T>(storage: &dyn Storage, key: &str, snapshot: &Snapshot<T>) -> Result<()>
where
    T: Serialize,
{
    let raw = serde_json::to_string(snapshot).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    storage.write(key, &raw)
}
