use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// In-memory keyed store with a monotonically increasing id (starting at 1).
pub struct MemoryStore<T> {
    items: DashMap<u64, T>,
    next_id: AtomicU64,
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate an id, build the item from it and store it.
    pub fn insert_with(&self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let item = build(id);
        self.items.insert(id, item.clone());
        item
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.items.get(&id).map(|e| e.value().clone())
    }

    /// All items ordered by id.
    pub fn list(&self) -> Vec<T> {
        let mut entries: Vec<(u64, T)> = self
            .items
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, v)| v).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
