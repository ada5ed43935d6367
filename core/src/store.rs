use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::Username;

/// The kinds of per-user record a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Meals,
    Weights,
    Goals,
}

impl StoreKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meals => "meals",
            Self::Weights => "weights",
            Self::Goals => "goals",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable per-user key-value state, one document per (user, kind).
///
/// `get` returns `None` when nothing usable is stored. `put` replaces the whole
/// document. There is no locking: concurrent writers race and the last one wins.
pub trait RecordStore: Send + Sync {
    fn get(&self, user: &Username, kind: StoreKind) -> Result<Option<Value>>;
    fn put(&self, user: &Username, kind: StoreKind, value: &Value) -> Result<()>;
}

/// Read a typed document, falling back to `T::default()` when it is absent or
/// does not have the expected shape.
pub fn load<T>(store: &dyn RecordStore, user: &Username, kind: StoreKind) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(value) = store.get(user, kind)? else {
        return Ok(T::default());
    };
    match serde_json::from_value(value) {
        Ok(v) => Ok(v),
        Err(e) => {
            warn!(user = %user, %kind, "ignoring malformed record: {e}");
            Ok(T::default())
        }
    }
}

/// Read a typed document that is about to be rewritten.
///
/// Unlike [`load`], a document that parses as JSON but not as `T` is an error:
/// saving a default over it would drop every record in it.
pub fn load_for_update<T>(store: &dyn RecordStore, user: &Username, kind: StoreKind) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(value) = store.get(user, kind)? else {
        return Ok(T::default());
    };
    serde_json::from_value(value).with_context(|| {
        format!("refusing to overwrite unreadable {kind} record for {user}")
    })
}

pub fn save<T: Serialize>(
    store: &dyn RecordStore,
    user: &Username,
    kind: StoreKind,
    value: &T,
) -> Result<()> {
    let value = serde_json::to_value(value).context("failed to serialize record")?;
    store.put(user, kind, &value)
}

/// One pretty-printed JSON file per (user, kind): `<dir>/<user>_<kind>.json`.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path_for(&self, user: &Username, kind: StoreKind) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", user.storage_key(), kind.as_str()))
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, user: &Username, kind: StoreKind) -> Result<Option<Value>> {
        let path = self.path_for(user, kind);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&content) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!(path = %path.display(), "treating unreadable JSON as empty: {e}");
                Ok(None)
            }
        }
    }

    fn put(&self, user: &Username, kind: StoreKind, value: &Value) -> Result<()> {
        let path = self.path_for(user, kind);
        let content = serde_json::to_string_pretty(value).context("failed to serialize record")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "wrote record");
        Ok(())
    }
}

/// In-process store, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(String, StoreKind), Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, user: &Username, kind: StoreKind) -> Result<Option<Value>> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(records.get(&(user.storage_key(), kind)).cloned())
    }

    fn put(&self, user: &Username, kind: StoreKind, value: &Value) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        records.insert((user.storage_key(), kind), value.clone());
        Ok(())
    }
}
