//! Key-value persistence for session snapshots.
//!
//! The WASM module cannot reach `localStorage` itself, so `BridgeStore` keeps
//! an in-memory mirror seeded from the value the bridge read at load time and
//! queues every write. Route handlers drain the queue and replay it on the
//! page.

use std::collections::HashMap;

/// Injected key-value store (browser local storage in production).
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// Plain map store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// A write the page still has to apply to `localStorage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Set { key: String, value: String },
    Remove { key: String },
}

/// Mirror of the page's storage plus the queue of writes not yet flushed.
#[derive(Debug, Clone, Default)]
pub struct BridgeStore {
    mirror: MemoryStore,
    pending: Vec<StoreOp>,
}

impl BridgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the mirror with a value the bridge read from storage.
    /// Seeding is not a write and queues nothing.
    pub fn seeded(key: &str, value: Option<&str>) -> Self {
        let mut store = Self::new();
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            store.mirror.set(key, v.to_string());
        }
        store
    }

    pub fn pending(&self) -> &[StoreOp] {
        &self.pending
    }

    /// Take the queued writes. Only the last write per key matters, so the
    /// queue is collapsed before it is returned.
    pub fn drain(&mut self) -> Vec<StoreOp> {
        let mut ops: Vec<StoreOp> = Vec::new();
        for op in self.pending.drain(..) {
            let key = match &op {
                StoreOp::Set { key, .. } | StoreOp::Remove { key } => key.clone(),
            };
            ops.retain(|o| !matches!(o, StoreOp::Set { key: k, .. } | StoreOp::Remove { key: k } if *k == key));
            ops.push(op);
        }
        ops
    }
}

impl SnapshotStore for BridgeStore {
    fn get(&self, key: &str) -> Option<String> {
        self.mirror.get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        self.mirror.set(key, value.clone());
        self.pending.push(StoreOp::Set {
            key: key.to_string(),
            value,
        });
    }

    fn remove(&mut self, key: &str) {
        self.mirror.remove(key);
        self.pending.push(StoreOp::Remove { key: key.to_string() });
    }
}
