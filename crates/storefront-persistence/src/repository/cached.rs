//! Cache-aside repository joining a primary store, an optional cache and
//! the read/write strategies.

use std::sync::Arc;
use tracing::Instrument;

use super::traits::{RecordCache, RecordStore, SharedCache};
use crate::cache::cache_key;
use crate::error::Result;
use crate::strategy::{CacheFill, Lookup, ReadStrategy, WriteStrategy};
use storefront_domain::Record;

/// Repository for one record type.
///
/// Without a cache every read and write goes straight to the store and
/// reports [`CacheFill::Skipped`].
pub struct CachedRepository<T: Record> {
    store: Arc<dyn RecordStore<T>>,
    cache: Option<SharedCache>,
    read_strategy: ReadStrategy,
    write_strategy: WriteStrategy,
}

impl<T: Record> CachedRepository<T> {
    /// Create a repository with default strategies.
    pub fn new(store: Arc<dyn RecordStore<T>>, cache: Option<SharedCache>) -> Self {
        Self::with_strategies(store, cache, ReadStrategy::default(), WriteStrategy::default())
    }

    /// Create with custom strategies.
    pub fn with_strategies(
        store: Arc<dyn RecordStore<T>>,
        cache: Option<SharedCache>,
        read_strategy: ReadStrategy,
        write_strategy: WriteStrategy,
    ) -> Self {
        Self {
            store,
            cache,
            read_strategy,
            write_strategy,
        }
    }

    pub const fn read_strategy(&self) -> ReadStrategy {
        self.read_strategy
    }

    pub const fn write_strategy(&self) -> WriteStrategy {
        self.write_strategy
    }

    pub const fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Get a record by id: cache, then store, then best-effort cache fill.
    pub async fn get(&self, id: &str) -> Lookup<T> {
        let span = tracing::info_span!("get", entity = T::ENTITY, id);
        let key = cache_key::<T>(id);
        let key = key.as_str();
        let cache = self.cache.as_ref();

        let lookup = self
            .read_strategy
            .read(
                cache.map(|cache| move || async move { read_cached::<T>(cache.as_ref(), key).await }),
                || self.store.fetch(id),
                cache.map(|cache| {
                    move |record: T| async move { write_cached(cache.as_ref(), key, &record).await }
                }),
            )
            .instrument(span.clone())
            .await;

        span.in_scope(|| match &lookup {
            Lookup::Found(served) => {
                if let CacheFill::Failed(reason) = &served.fill {
                    tracing::warn!(%reason, "Record served but cache fill failed");
                }
                tracing::debug!(cache = served.lookup.as_str(), "Record served");
            }
            Lookup::NotFound => tracing::info!("Record not found"),
            Lookup::StoreError(e) => tracing::error!(error = %e, "Failed to fetch record"),
        });

        lookup
    }

    /// Insert a record into the store, then best-effort write it to the cache.
    ///
    /// # Errors
    ///
    /// Returns the store error if the insert fails; cache failures are
    /// reported through the returned [`CacheFill`].
    pub async fn create(&self, record: &T) -> Result<CacheFill> {
        let span = tracing::info_span!("create", entity = T::ENTITY, id = record.id());
        let key = cache_key::<T>(record.id());
        let key = key.as_str();
        let cache = self.cache.as_ref();

        let outcome = self
            .write_strategy
            .write(
                record,
                |_| self.store.insert(record),
                cache.map(|cache| {
                    move |record: &T| {
                        let json = serde_json::to_string(record);
                        async move { cache.set(key, json?).await }
                    }
                }),
            )
            .instrument(span.clone())
            .await;

        span.in_scope(|| match &outcome {
            Ok(CacheFill::Stored) => tracing::info!("Successfully saved to cache"),
            Ok(CacheFill::Failed(reason)) => {
                tracing::warn!(%reason, "Record created but cache write failed");
            }
            Ok(CacheFill::Skipped) => {}
            Err(e) => tracing::error!(error = %e, "Failed to save record"),
        });

        outcome
    }
}

async fn read_cached<T: Record>(cache: &dyn RecordCache, key: &str) -> Result<Option<T>> {
    match cache.get(key).await? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

async fn write_cached<T: Record>(cache: &dyn RecordCache, key: &str, record: &T) -> Result<()> {
    let json = serde_json::to_string(record)?;
    cache.set(key, json).await
}
