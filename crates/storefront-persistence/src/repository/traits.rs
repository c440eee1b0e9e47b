//! # Repository Traits
//!
//! Abstract interfaces for the primary stores, the cache and the export
//! sink. Implementations can be swapped for different backends (MySQL,
//! ScyllaDB, Redis, object storage, in-memory fakes).

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use storefront_domain::Record;

// =============================================================================
// PRIMARY STORE
// =============================================================================

/// Durable source of truth for one record type.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Get record by primary key. `Ok(None)` means the row is absent.
    async fn fetch(&self, id: &str) -> Result<Option<T>>;

    /// Insert a record. No existence check is performed; duplicate keys
    /// surface whatever the backend does with them.
    async fn insert(&self, record: &T) -> Result<()>;
}

/// Full-table read access, used by the export path.
#[async_trait]
pub trait ScanStore<T: Record>: Send + Sync {
    /// Read every record in the table. Unbounded.
    async fn scan_all(&self) -> Result<Vec<T>>;
}

// =============================================================================
// CACHE
// =============================================================================

/// String key-value cache. Values are written without expiry.
#[async_trait]
pub trait RecordCache: Send + Sync {
    /// `Ok(None)` is a definitive miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Shared cache handle
pub type SharedCache = Arc<dyn RecordCache>;

// =============================================================================
// EXPORT SINK
// =============================================================================

/// Blob storage for dataset snapshots.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Write `body` under `key`, replacing any previous object.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()>;
}
