//! Write strategy implementations using enum dispatch.

use std::fmt::Debug;
use std::future::Future;

use crate::error::Result;

/// Write strategy enum - determines cache/db write pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Write to DB, then best-effort write to cache
    #[default]
    WriteThrough,
    /// Write to DB only, no cache interaction
    DbOnly,
}

/// Cache-side outcome of a write or a read-triggered fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheFill {
    Stored,
    /// The primary write succeeded but the cache was not updated.
    Failed(String),
    Skipped,
}

impl CacheFill {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Failed(_) => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl WriteStrategy {
    /// Execute a write operation according to the strategy.
    ///
    /// The DB write decides success. A cache failure after it is logged and
    /// reported as [`CacheFill::Failed`], never as an error.
    ///
    /// - `db_fn`: Async function to write to database
    /// - `cache_fn`: Async function to write to cache, `None` when no cache is configured
    pub async fn write<T, DbFut, CacheFut>(
        &self,
        value: &T,
        db_fn: impl FnOnce(&T) -> DbFut,
        cache_fn: Option<impl FnOnce(&T) -> CacheFut>,
    ) -> Result<CacheFill>
    where
        T: Debug,
        DbFut: Future<Output = Result<()>>,
        CacheFut: Future<Output = Result<()>>,
    {
        db_fn(value).await?;

        let cache_fn = match self {
            Self::WriteThrough => cache_fn,
            Self::DbOnly => None,
        };

        let Some(cache_fn) = cache_fn else {
            return Ok(CacheFill::Skipped);
        };

        match cache_fn(value).await {
            Ok(()) => Ok(CacheFill::Stored),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to write to cache");
                Ok(CacheFill::Failed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_write_through() {
        let strategy = WriteStrategy::WriteThrough;
        let cache_called = Arc::new(AtomicBool::new(false));
        let db_called = Arc::new(AtomicBool::new(false));

        let cache_flag = cache_called.clone();
        let db_flag = db_called.clone();

        let fill = strategy
            .write(
                &42,
                |_| {
                    db_flag.store(true, Ordering::SeqCst);
                    async { Ok(()) }
                },
                Some(|_: &i32| {
                    cache_flag.store(true, Ordering::SeqCst);
                    async { Ok(()) }
                }),
            )
            .await
            .unwrap();

        assert_eq!(fill, CacheFill::Stored);
        assert!(cache_called.load(Ordering::SeqCst));
        assert!(db_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_db_failure_skips_cache() {
        let strategy = WriteStrategy::WriteThrough;
        let cache_called = Arc::new(AtomicBool::new(false));
        let cache_flag = cache_called.clone();

        let result = strategy
            .write(
                &42,
                |_| async { Err(PersistenceError::WriteConflict("duplicate id".into())) },
                Some(|_: &i32| {
                    cache_flag.store(true, Ordering::SeqCst);
                    async { Ok(()) }
                }),
            )
            .await;

        assert!(matches!(result, Err(PersistenceError::WriteConflict(_))));
        assert!(!cache_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cache_failure_is_reported_not_raised() {
        let strategy = WriteStrategy::WriteThrough;

        let fill = strategy
            .write(
                &42,
                |_| async { Ok(()) },
                Some(|_: &i32| async { Err(PersistenceError::Injected("cache down")) }),
            )
            .await
            .unwrap();

        assert_eq!(fill.as_str(), "failed");
    }

    #[tokio::test]
    async fn test_db_only() {
        let strategy = WriteStrategy::DbOnly;
        let cache_called = Arc::new(AtomicBool::new(false));
        let db_called = Arc::new(AtomicBool::new(false));

        let cache_flag = cache_called.clone();
        let db_flag = db_called.clone();

        let fill = strategy
            .write(
                &42,
                |_| {
                    db_flag.store(true, Ordering::SeqCst);
                    async { Ok(()) }
                },
                Some(|_: &i32| {
                    cache_flag.store(true, Ordering::SeqCst);
                    async { Ok(()) }
                }),
            )
            .await
            .unwrap();

        assert_eq!(fill, CacheFill::Skipped);
        assert!(!cache_called.load(Ordering::SeqCst)); // Cache NOT called
        assert!(db_called.load(Ordering::SeqCst));
    }
}
