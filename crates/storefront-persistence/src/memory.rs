//! In-memory store, cache and export sink backed by `DashMap`.
//!
//! Used as test doubles for the real backends. Each fake can be switched
//! into a failing mode and counts the calls it receives.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::{PersistenceError, Result};
use crate::repository::traits::{ExportSink, RecordCache, RecordStore, ScanStore};
use storefront_domain::Record;

// =============================================================================
// STORE
// =============================================================================

/// Primary store with relational insert semantics: a duplicate key is a
/// write conflict.
pub struct MemoryStore<T> {
    rows: DashMap<String, T>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Seed the store without counting writes.
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let store = Self::new();
        for record in records {
            store.rows.insert(record.id().to_string(), record);
        }
        store
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of fetch and scan calls.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of insert attempts, including failed ones.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn fetch(&self, id: &str) -> Result<Option<T>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Injected("store read"));
        }
        Ok(self.rows.get(id).map(|row| row.value().clone()))
    }

    async fn insert(&self, record: &T) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Injected("store write"));
        }

        match self.rows.entry(record.id().to_string()) {
            Entry::Occupied(_) => Err(PersistenceError::WriteConflict(format!(
                "Duplicate entry '{}' for key 'PRIMARY'",
                record.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<T: Record> ScanStore<T> for MemoryStore<T> {
    async fn scan_all(&self) -> Result<Vec<T>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Injected("store scan"));
        }
        Ok(self.rows.iter().map(|row| row.value().clone()).collect())
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// String cache without expiry.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed an entry without counting a set.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of set attempts, including failed ones.
    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RecordCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Injected("cache read"));
        }
        Ok(self.get_raw(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Injected("cache write"));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

// =============================================================================
// EXPORT SINK
// =============================================================================

/// Object sink that keeps the latest body per key.
#[derive(Default)]
pub struct MemorySink {
    objects: DashMap<String, Vec<u8>>,
    fail: AtomicBool,
    puts: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.get(key).map(|object| object.value().clone())
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExportSink for MemorySink {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(PersistenceError::Injected("object put"));
        }
        self.objects.insert(key.to_string(), body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_domain::Order;

    fn order(id: &str) -> Order {
        Order {
            id: id.into(),
            customerid: "c-1".into(),
            productid: "p-1".into(),
        }
    }

    #[tokio::test]
    async fn test_store_rejects_duplicate_ids() {
        let store = MemoryStore::<Order>::new();
        store.insert(&order("o-1")).await.unwrap();
        assert!(matches!(
            store.insert(&order("o-1")).await,
            Err(PersistenceError::WriteConflict(_))
        ));
        assert_eq!(store.writes(), 2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_switches() {
        let store = MemoryStore::with_records([order("o-1")]);
        store.fail_reads(true);
        assert!(store.fetch("o-1").await.is_err());
        assert!(store.scan_all().await.is_err());

        store.fail_reads(false);
        assert_eq!(store.fetch("o-1").await.unwrap(), Some(order("o-1")));
        assert_eq!(store.reads(), 3);
    }

    #[tokio::test]
    async fn test_cache_counts_failed_sets() {
        let cache = MemoryCache::new();
        cache.fail_writes(true);
        assert!(cache.set("k", "v".into()).await.is_err());
        assert_eq!(cache.sets(), 1);
        assert!(cache.is_empty());
    }
}
