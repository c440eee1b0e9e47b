//! Persistence layer error types

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("MySQL error: {0}")]
    Sql(String),

    #[error("ScyllaDB error: {0}")]
    Scylla(String),

    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Object store error: {0}")]
    ObjectStore(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("Write conflict: {0}")]
    WriteConflict(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Injected failure: {0}")]
    Injected(&'static str),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sql(err.to_string())
    }
}

#[cfg(feature = "scylla")]
impl From<scylla::transport::errors::NewSessionError> for PersistenceError {
    fn from(err: scylla::transport::errors::NewSessionError) -> Self {
        Self::Scylla(err.to_string())
    }
}

#[cfg(feature = "scylla")]
impl From<scylla::transport::errors::QueryError> for PersistenceError {
    fn from(err: scylla::transport::errors::QueryError) -> Self {
        Self::Scylla(err.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for PersistenceError {
    fn from(err: redis::RedisError) -> Self {
        Self::Redis(err.to_string())
    }
}

#[cfg(feature = "s3")]
impl From<object_store::Error> for PersistenceError {
    fn from(err: object_store::Error) -> Self {
        Self::ObjectStore(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
