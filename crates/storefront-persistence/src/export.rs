//! # Export Module
//!
//! Full-table snapshot of a record store written as one JSON array to a
//! fixed object key. Every run overwrites the previous object.

use std::sync::Arc;
use thiserror::Error;

use crate::error::PersistenceError;
use crate::repository::traits::{ExportSink, ScanStore};
use storefront_domain::Record;

/// Default object key for the snapshot.
pub const DEFAULT_OBJECT_KEY: &str = "orders_data.json";

/// Record count above which an export is logged as oversized.
pub const DEFAULT_WARN_THRESHOLD: usize = 100_000;

/// Export failure, tagged by the step that failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to scan records: {0}")]
    Scan(#[source] PersistenceError),

    #[error("failed to serialize records: {0}")]
    Serialize(#[source] PersistenceError),

    #[error("failed to write export object: {0}")]
    Upload(#[source] PersistenceError),
}

/// Summary of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub records: usize,
    pub bytes: usize,
    pub object_key: String,
}

/// Scans a store and writes the snapshot to a sink.
pub struct Exporter<T: Record> {
    store: Arc<dyn ScanStore<T>>,
    sink: Option<Arc<dyn ExportSink>>,
    object_key: String,
    warn_threshold: usize,
}

impl<T: Record> Exporter<T> {
    /// Create an exporter. A missing sink makes every export fail at the
    /// upload step.
    pub fn new(store: Arc<dyn ScanStore<T>>, sink: Option<Arc<dyn ExportSink>>) -> Self {
        Self {
            store,
            sink,
            object_key: DEFAULT_OBJECT_KEY.to_string(),
            warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_object_key(mut self, key: impl Into<String>) -> Self {
        self.object_key = key.into();
        self
    }

    #[must_use]
    pub const fn with_warn_threshold(mut self, threshold: usize) -> Self {
        self.warn_threshold = threshold;
        self
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    /// Scan, serialize and upload. Nothing is retried and partial
    /// progress is not kept.
    ///
    /// # Errors
    ///
    /// Returns the first failing step.
    pub async fn export(&self) -> Result<ExportReport, ExportError> {
        let mut records = self.store.scan_all().await.map_err(|e| {
            tracing::error!(entity = T::ENTITY, error = %e, "Failed to scan records");
            ExportError::Scan(e)
        })?;

        if records.len() > self.warn_threshold {
            // Flagged only; the export is never truncated.
            tracing::warn!(
                entity = T::ENTITY,
                records = records.len(),
                threshold = self.warn_threshold,
                "Export exceeds warning threshold; whole table is held in memory"
            );
        }

        let body = render(&mut records).map_err(|e| {
            tracing::error!(entity = T::ENTITY, error = %e, "Failed to marshal records");
            ExportError::Serialize(e)
        })?;
        let bytes = body.len();

        let Some(sink) = &self.sink else {
            tracing::error!(entity = T::ENTITY, "No object store configured for export");
            return Err(ExportError::Upload(PersistenceError::NotConfigured("object store")));
        };

        sink.put(&self.object_key, body).await.map_err(|e| {
            tracing::error!(entity = T::ENTITY, key = %self.object_key, error = %e, "Error saving export object");
            ExportError::Upload(e)
        })?;

        tracing::info!(
            entity = T::ENTITY,
            records = records.len(),
            bytes,
            key = %self.object_key,
            "Successfully saved export object"
        );

        Ok(ExportReport {
            records: records.len(),
            bytes,
            object_key: self.object_key.clone(),
        })
    }
}

/// Serialize records as a JSON array ordered by id, so identical data
/// always yields identical bytes regardless of scan order.
pub fn render<T: Record>(records: &mut [T]) -> Result<Vec<u8>, PersistenceError> {
    records.sort_by(|a, b| a.id().cmp(b.id()));
    Ok(serde_json::to_vec(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySink, MemoryStore};
    use storefront_domain::Order;

    fn order(id: &str, customer: &str) -> Order {
        Order {
            id: id.into(),
            customerid: customer.into(),
            productid: format!("p-{id}"),
        }
    }

    fn exporter(store: &Arc<MemoryStore<Order>>, sink: &Arc<MemorySink>) -> Exporter<Order> {
        Exporter::new(store.clone(), Some(sink.clone()))
    }

    #[tokio::test]
    async fn test_export_length_matches_table() {
        let store = Arc::new(MemoryStore::with_records([
            order("o-2", "c-1"),
            order("o-1", "c-2"),
            order("o-3", "c-1"),
        ]));
        let sink = Arc::new(MemorySink::new());

        let report = exporter(&store, &sink).export().await.unwrap();
        assert_eq!(report.records, 3);
        assert_eq!(report.object_key, DEFAULT_OBJECT_KEY);

        let body = sink.object(DEFAULT_OBJECT_KEY).unwrap();
        assert_eq!(report.bytes, body.len());
        let exported: Vec<Order> = serde_json::from_slice(&body).unwrap();
        let ids: Vec<&str> = exported.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["o-1", "o-2", "o-3"]);
    }

    #[tokio::test]
    async fn test_repeat_export_is_byte_identical() {
        let store = Arc::new(MemoryStore::with_records(
            (0..50).map(|i| order(&format!("o-{i:03}"), "c-1")),
        ));
        let sink = Arc::new(MemorySink::new());
        let exporter = exporter(&store, &sink).with_object_key("snapshots/orders.json");

        exporter.export().await.unwrap();
        let first = sink.object("snapshots/orders.json").unwrap();
        exporter.export().await.unwrap();
        let second = sink.object("snapshots/orders.json").unwrap();

        assert_eq!(first, second);
        assert_eq!(sink.puts(), 2);
    }

    #[tokio::test]
    async fn test_empty_table_exports_empty_array() {
        let store = Arc::new(MemoryStore::<Order>::new());
        let sink = Arc::new(MemorySink::new());

        let report = exporter(&store, &sink).export().await.unwrap();
        assert_eq!(report.records, 0);
        assert_eq!(sink.object(DEFAULT_OBJECT_KEY).unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_scan_failure_writes_nothing() {
        let store = Arc::new(MemoryStore::with_records([order("o-1", "c-1")]));
        store.fail_reads(true);
        let sink = Arc::new(MemorySink::new());

        let err = exporter(&store, &sink).export().await.unwrap_err();
        assert!(matches!(err, ExportError::Scan(_)));
        assert_eq!(sink.puts(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure() {
        let store = Arc::new(MemoryStore::with_records([order("o-1", "c-1")]));
        let sink = Arc::new(MemorySink::new());
        sink.fail_puts(true);

        let err = exporter(&store, &sink).export().await.unwrap_err();
        assert!(matches!(err, ExportError::Upload(PersistenceError::Injected(_))));
    }

    #[tokio::test]
    async fn test_missing_sink_fails_at_upload() {
        let store = Arc::new(MemoryStore::with_records([order("o-1", "c-1")]));
        let exporter = Exporter::new(store, None);

        let err = exporter.export().await.unwrap_err();
        assert!(matches!(
            err,
            ExportError::Upload(PersistenceError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_threshold_does_not_truncate() {
        let store = Arc::new(MemoryStore::with_records(
            (0..10).map(|i| order(&format!("o-{i}"), "c-1")),
        ));
        let sink = Arc::new(MemorySink::new());

        let report = exporter(&store, &sink)
            .with_warn_threshold(2)
            .export()
            .await
            .unwrap();
        assert_eq!(report.records, 10);
    }
}
