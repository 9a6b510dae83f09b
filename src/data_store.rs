use bytes::Bytes;
use chrono::{DateTime, Utc};
use mockall::automock;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// Tag identifying the data type held by an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    List,
    Set,
    Hash,
    SortedSet,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::List => "list",
            Kind::Set => "set",
            Kind::Hash => "hash",
            Kind::SortedSet => "sortedset",
        }
    }
}

/// A stored payload, one variant per supported data type.
///
/// Only `String` is populated by live traffic today. The remaining
/// variants are reserved: adding command families for them forces
/// exhaustive handling wherever values are matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(Bytes),
    List(Vec<Bytes>),
    Set(Vec<Bytes>),
    Hash(HashMap<Bytes, Bytes>),
    SortedSet(Vec<(Bytes, f64)>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Set(_) => Kind::Set,
            Value::Hash(_) => Kind::Hash,
            Value::SortedSet(_) => Kind::SortedSet,
        }
    }
}

/// One key-value entry. The payload's shape always matches its kind
/// tag by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub value: Value,

    /// Absolute expiration time; `None` means the entry never expires.
    /// No reaper enforces this yet.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn new(value: Value) -> Entry {
        Entry {
            value,
            expires_at: None,
        }
    }
}

/// Outcome of a string read. "Absent" and "present but holding another
/// kind" are distinct outcomes: collapsing them would lose the signal
/// a caller needs to answer WRONGTYPE instead of a false "not found".
#[derive(Debug, Clone, PartialEq)]
pub enum GetResult {
    Missing,
    WrongType,
    Value(Bytes),
}

#[automock]
pub trait StoreBase: Send + Sync {
    fn get(&self, key: Bytes) -> GetResult;

    fn set(&self, key: Bytes, value: Bytes) -> &'static str;

    fn del(&self, keys: Vec<Bytes>) -> u64;

    fn key_type(&self, key: Bytes) -> Option<Kind>;
}

/// Shared data store across all the connections.
///
/// Cloning `SharedStore` only increments an atomic reference count;
/// every clone observes the same underlying map.
#[derive(Debug, Clone)]
pub struct SharedStore {
    /// An `Arc` to provide shared ownership across the tokio tasks.
    shared: Arc<GuardedDataStore>,
}

#[derive(Debug)]
struct GuardedDataStore {
    /// Reads share the lock; a mutation holds it exclusively for the
    /// duration of that single call. No operation spans more than one
    /// lock acquisition, so each call is atomic on its own.
    ///
    /// `std::sync` rather than the tokio lock: the critical sections
    /// are small and never await.
    entries: RwLock<HashMap<Bytes, Entry>>,
}

impl SharedStore {
    pub fn new() -> SharedStore {
        let shared = Arc::new(GuardedDataStore {
            entries: RwLock::new(HashMap::new()),
        });
        SharedStore { shared }
    }

    /// Install an entry of any kind directly, bypassing the
    /// string-only command surface. Lets tests stage non-string
    /// entries to exercise wrong-type reads.
    pub fn seed(&self, key: Bytes, value: Value) {
        let mut entries = self.shared.entries.write().unwrap();
        entries.insert(key, Entry::new(value));
    }
}

impl Default for SharedStore {
    fn default() -> SharedStore {
        SharedStore::new()
    }
}

impl StoreBase for SharedStore {
    /// Read the string stored at `key`, keeping a missing key distinct
    /// from one holding a non-string kind.
    fn get(&self, key: Bytes) -> GetResult {
        let entries = self.shared.entries.read().unwrap();

        match entries.get(&key) {
            None => GetResult::Missing,
            Some(entry) => match &entry.value {
                Value::String(data) => GetResult::Value(data.clone()),
                _ => GetResult::WrongType,
            },
        }
    }

    /// Insert or overwrite `key` with a string entry and no expiry.
    /// Always succeeds; returns the fixed acknowledgement.
    fn set(&self, key: Bytes, value: Bytes) -> &'static str {
        let mut entries = self.shared.entries.write().unwrap();
        entries.insert(key, Entry::new(Value::String(value)));

        "OK"
    }

    /// Remove the given keys, returning how many existed immediately
    /// before removal. Nonexistent keys are skipped, not errors.
    fn del(&self, keys: Vec<Bytes>) -> u64 {
        let mut entries = self.shared.entries.write().unwrap();

        let mut count = 0;
        for key in keys {
            if entries.remove(&key).is_some() {
                count += 1;
            }
        }

        count
    }

    /// Report the kind stored at `key`, if any. No side effects.
    fn key_type(&self, key: Bytes) -> Option<Kind> {
        let entries = self.shared.entries.read().unwrap();
        entries.get(&key).map(|entry| entry.value.kind())
    }
}
