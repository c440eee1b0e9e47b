//! # Redis Cache Layer
//!
//! Redis client wrapper used as the cache-aside layer for product and
//! customer records. Entries are written with plain `SET` and never expire.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::sync::Arc;

use crate::error::Result;
use crate::repository::traits::{RecordCache, SharedCache};

/// Redis cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub url: String,
}

impl CacheConfig {
    /// Build a URL from host and port. ElastiCache-style endpoints need TLS,
    /// which selects the `rediss://` scheme.
    pub fn from_host(host: &str, port: u16, tls: bool) -> Self {
        let scheme = if tls { "rediss" } else { "redis" };
        Self {
            url: format!("{scheme}://{host}:{port}"),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// Redis cache client with a multiplexed, auto-reconnecting connection
#[derive(Clone)]
pub struct CacheClient {
    conn: ConnectionManager,
}

impl CacheClient {
    /// Create a new cache client. Connects eagerly, so an unreachable
    /// server is reported here rather than on the first request.
    pub async fn new(config: CacheConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }

    /// Round-trip check used at startup.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Wrap into the shared trait-object handle used by repositories.
    pub fn into_shared(self) -> SharedCache {
        Arc::new(self)
    }
}

#[async_trait]
impl RecordCache for CacheClient {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_from_host() {
        assert_eq!(
            CacheConfig::from_host("cache.internal", 6379, true).url,
            "rediss://cache.internal:6379"
        );
        assert_eq!(
            CacheConfig::from_host("localhost", 6380, false).url,
            "redis://localhost:6380"
        );
    }
}
