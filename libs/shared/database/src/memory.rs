use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local table keyed by row id. Every read observes all writes
/// that completed before it; nothing is cached outside the lock.
#[derive(Debug)]
pub struct MemoryTable<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone + Send + Sync> MemoryTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: Uuid, row: T) {
        self.rows.write().await.insert(id, row);
    }

    pub async fn get(&self, id: &Uuid) -> Option<T> {
        self.rows.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &Uuid) -> bool {
        self.rows.read().await.contains_key(id)
    }

    /// Snapshot of all rows, in no particular order.
    pub async fn values(&self) -> Vec<T> {
        self.rows.read().await.values().cloned().collect()
    }

    /// Apply `f` to the stored row in place and return the updated copy.
    pub async fn modify<F>(&self, id: &Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(id)?;
        f(row);
        Some(row.clone())
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.rows.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}
