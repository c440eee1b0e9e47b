//! # Storefront Persistence Library
//!
//! Persistence layer for the order, product and customer services.
//!
//! ## Architecture
//!
//! Each service owns one record type. Reads and writes go through a
//! cache-aside repository whose behaviour is picked by a read and a write
//! strategy:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       HTTP handlers                          │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                          │
//!                    ▼                          ▼
//! ┌──────────────────────────────┐   ┌──────────────────────────┐
//! │      CachedRepository<T>     │   │       Exporter<T>        │
//! │ (applies read/write strategy)│   │  (scan, sort, serialize) │
//! └──────────────────────────────┘   └──────────────────────────┘
//!          │               │                │             │
//!          ▼               ▼                ▼             ▼
//! ┌──────────────┐ ┌───────────────────────────────┐ ┌──────────┐
//! │ Redis cache  │ │  MySQL (product, customer)    │ │    S3    │
//! │  (optional)  │ │  ScyllaDB (order)             │ │ (export) │
//! └──────────────┘ └───────────────────────────────┘ └──────────┘
//! ```
//!
//! ## Features
//!
//! - `mysql`: MySQL backend via sqlx (default)
//! - `scylla`: ScyllaDB backend (default)
//! - `redis`: Redis cache layer (default)
//! - `s3`: S3 export sink via object_store (default)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_persistence::{
//!     cache::{CacheClient, CacheConfig},
//!     repository::{CachedRepository, SqlClient, SqlConfig, SqlRecordStore},
//! };
//! use storefront_domain::Product;
//!
//! let sql = SqlClient::new(&sql_config).await?;
//! let cache = CacheClient::new(CacheConfig::default()).await?;
//!
//! let store = SqlRecordStore::<Product>::new(sql, "product")?;
//! let products = CachedRepository::new(Arc::new(store), Some(cache.into_shared()));
//!
//! let lookup = products.get("p-1").await;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod export;
pub mod memory;
pub mod repository;
pub mod strategy;

#[cfg(feature = "s3")]
pub mod object_sink;

// Re-export commonly used types
pub use error::{PersistenceError, Result};
pub use export::{ExportError, ExportReport, Exporter};
pub use repository::{
    CachedRepository, ExportSink, RecordCache, RecordStore, ScanStore, SharedCache,
};
pub use strategy::{CacheFill, CacheLookup, Lookup, ReadStrategy, Served, WriteStrategy};

#[cfg(feature = "redis")]
pub use cache::{CacheClient, CacheConfig};
#[cfg(feature = "s3")]
pub use object_sink::{ObjectStoreConfig, ObjectStoreSink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
