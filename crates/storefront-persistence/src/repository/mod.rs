//! # Repository Module
//!
//! Repository pattern implementations for record persistence.

pub mod cached;
pub mod traits;

#[cfg(feature = "mysql")]
pub mod mysql_impl;
#[cfg(feature = "scylla")]
pub mod scylla_impl;

pub use cached::CachedRepository;
pub use traits::{ExportSink, RecordCache, RecordStore, ScanStore, SharedCache};

#[cfg(feature = "mysql")]
pub use mysql_impl::{SqlClient, SqlConfig, SqlRecordStore};
#[cfg(feature = "scylla")]
pub use scylla_impl::{ScyllaClient, ScyllaConfig, ScyllaRecordStore};

use crate::error::{PersistenceError, Result};

/// Table and keyspace names are interpolated into statements, so only
/// plain identifiers are accepted.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(PersistenceError::InvalidQuery(format!(
            "invalid identifier: {name:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("orders").is_ok());
        assert!(validate_identifier("_shop_2024").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2fast").is_err());
        assert!(validate_identifier("order items").is_err());
        assert!(validate_identifier("product;--").is_err());
    }
}
