//! # Cache Module
//!
//! Redis cache layer for hot-path record reads.

#[cfg(feature = "redis")]
pub mod redis_client;

#[cfg(feature = "redis")]
pub use redis_client::{CacheClient, CacheConfig};

/// Cache key for a record: `<entity>:<id>`.
pub fn cache_key<T: storefront_domain::Record>(id: &str) -> String {
    format!("{}:{id}", T::ENTITY)
}
