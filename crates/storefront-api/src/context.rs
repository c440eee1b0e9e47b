//! # Service Context
//!
//! Application state shared by the handlers of one service.

use std::sync::Arc;

use storefront_domain::Record;
use storefront_persistence::{CachedRepository, Exporter};

/// State for a service that owns records of type `T`.
pub struct ServiceContext<T: Record> {
    /// Read/write path for single records
    pub repository: Arc<CachedRepository<T>>,

    /// Full-table export; only the order service sets this
    pub exporter: Option<Arc<Exporter<T>>>,
}

impl<T: Record> ServiceContext<T> {
    pub fn new(repository: CachedRepository<T>) -> Self {
        Self {
            repository: Arc::new(repository),
            exporter: None,
        }
    }

    #[must_use]
    pub fn with_exporter(mut self, exporter: Exporter<T>) -> Self {
        self.exporter = Some(Arc::new(exporter));
        self
    }
}

impl<T: Record> Clone for ServiceContext<T> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            exporter: self.exporter.clone(),
        }
    }
}
