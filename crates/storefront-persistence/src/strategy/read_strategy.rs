//! Read strategy implementations using enum dispatch.

use std::fmt::Debug;
use std::future::Future;

use super::write_strategy::CacheFill;
use crate::error::{PersistenceError, Result};

/// Read strategy enum - determines cache/db access pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Check cache first, fall back to DB on miss or cache error
    #[default]
    CacheFirst,
    /// Check cache first, fall back to DB on miss only
    CacheStrict,
    /// Only read from database, skip cache
    DbOnly,
}

/// What the cache said before the store was consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
    /// Cache read failed and the read fell back to the store.
    Error(String),
    /// Cache not consulted (strategy or no cache configured).
    Skipped,
}

impl CacheLookup {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Error(_) => "error",
            Self::Skipped => "skip",
        }
    }
}

/// A successfully served record plus its cache-side outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served<T> {
    pub value: T,
    pub lookup: CacheLookup,
    pub fill: CacheFill,
}

impl<T> Served<T> {
    pub const fn is_cache_hit(&self) -> bool {
        matches!(self.lookup, CacheLookup::Hit)
    }

    /// Served, but the cache is now stale or absent for this key.
    pub const fn is_degraded(&self) -> bool {
        matches!(self.lookup, CacheLookup::Error(_)) || matches!(self.fill, CacheFill::Failed(_))
    }
}

/// Outcome of a read by primary key, consumed by every read handler.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(Served<T>),
    NotFound,
    StoreError(PersistenceError),
}

impl<T> Lookup<T> {
    /// The record, if one was found.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(served) => Some(served.value),
            Self::NotFound | Self::StoreError(_) => None,
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl ReadStrategy {
    /// Execute a read operation according to the strategy.
    ///
    /// - `cache_fn`: Async function to read from cache, `None` when no cache is configured
    /// - `db_fn`: Async function to read from database
    /// - `fill_fn`: Async function to populate cache after DB read
    pub async fn read<T, CacheFut, DbFut, FillFut>(
        &self,
        cache_fn: Option<impl FnOnce() -> CacheFut>,
        db_fn: impl FnOnce() -> DbFut,
        fill_fn: Option<impl FnOnce(T) -> FillFut>,
    ) -> Lookup<T>
    where
        T: Clone + Debug,
        CacheFut: Future<Output = Result<Option<T>>>,
        DbFut: Future<Output = Result<Option<T>>>,
        FillFut: Future<Output = Result<()>>,
    {
        let (cache_fn, fill_fn) = match self {
            Self::DbOnly => (None, None),
            Self::CacheFirst | Self::CacheStrict => (cache_fn, fill_fn),
        };

        let lookup = match cache_fn {
            None => CacheLookup::Skipped,
            Some(cache_fn) => match cache_fn().await {
                Ok(Some(value)) => {
                    tracing::debug!("Cache hit");
                    return Lookup::Found(Served {
                        value,
                        lookup: CacheLookup::Hit,
                        fill: CacheFill::Skipped,
                    });
                }
                Ok(None) => {
                    tracing::debug!("Cache miss, falling back to DB");
                    CacheLookup::Miss
                }
                Err(e) if *self == Self::CacheStrict => {
                    tracing::error!(error = %e, "Cache error");
                    return Lookup::StoreError(e);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Cache error, falling back to DB");
                    CacheLookup::Error(e.to_string())
                }
            },
        };

        let value = match db_fn().await {
            Ok(Some(value)) => value,
            Ok(None) => return Lookup::NotFound,
            Err(e) => return Lookup::StoreError(e),
        };

        let fill = match fill_fn {
            None => CacheFill::Skipped,
            Some(fill_fn) => match fill_fn(value.clone()).await {
                Ok(()) => CacheFill::Stored,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to populate cache");
                    CacheFill::Failed(e.to_string())
                }
            },
        };

        Lookup::Found(Served {
            value,
            lookup,
            fill,
        })
    }
}
