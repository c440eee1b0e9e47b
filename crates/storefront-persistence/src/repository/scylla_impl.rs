//! ScyllaDB repository implementation for the order table.

use async_trait::async_trait;
use scylla::{Session, SessionBuilder};
use std::marker::PhantomData;
use std::sync::Arc;

use super::traits::{RecordStore, ScanStore};
use super::validate_identifier;
use crate::error::{PersistenceError, Result};
use storefront_domain::Record;

/// Row shape shared by every record table: key plus two nullable columns.
type RecordRow = (String, Option<String>, Option<String>);

fn scylla_error(err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Scylla(err.to_string())
}

// =============================================================================
// SCYLLA CONFIGURATION
// =============================================================================

/// ScyllaDB connection configuration.
#[derive(Debug, Clone)]
pub struct ScyllaConfig {
    pub hosts: Vec<String>,
    pub keyspace: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ScyllaConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["localhost:9042".to_string()],
            keyspace: "storefront".to_string(),
            username: None,
            password: None,
        }
    }
}

// =============================================================================
// SCYLLA CLIENT
// =============================================================================

/// ScyllaDB client wrapper.
pub struct ScyllaClient {
    session: Arc<Session>,
    pub config: ScyllaConfig,
}

impl ScyllaClient {
    /// Create a new ScyllaDB client.
    pub async fn new(config: ScyllaConfig) -> Result<Self> {
        validate_identifier(&config.keyspace)?;

        let mut builder = SessionBuilder::new().known_nodes(&config.hosts);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.user(user, pass);
        }

        let session = builder.build().await?;

        // Use keyspace
        session
            .query_unpaged(format!("USE {}", config.keyspace), ())
            .await?;

        Ok(Self {
            session: Arc::new(session),
            config,
        })
    }

    /// Get session reference.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

// =============================================================================
// RECORD TABLE
// =============================================================================

/// Key-value table holding records of type `T`, partitioned by `T::FIELDS[0]`.
pub struct ScyllaRecordStore<T> {
    client: Arc<ScyllaClient>,
    table: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> ScyllaRecordStore<T> {
    /// Create a store over `table` in the client's keyspace.
    pub fn new(client: Arc<ScyllaClient>, table: &str) -> Result<Self> {
        validate_identifier(table)?;
        Ok(Self {
            client,
            table: table.to_string(),
            _record: PhantomData,
        })
    }

    fn columns() -> String {
        T::FIELDS.join(", ")
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for ScyllaRecordStore<T> {
    async fn fetch(&self, id: &str) -> Result<Option<T>> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            Self::columns(),
            self.table,
            T::FIELDS[0]
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (id,))
            .await
            .inspect_err(|e| {
                tracing::error!(entity = T::ENTITY, id, error = %e, "Error fetching item from ScyllaDB");
            })?;

        let rows = result.into_rows_result().map_err(scylla_error)?;
        let row = rows.maybe_first_row::<RecordRow>().map_err(scylla_error)?;

        Ok(row.map(|(id, second, third)| T::from_row(id, second, third)))
    }

    async fn insert(&self, record: &T) -> Result<()> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?)",
            self.table,
            Self::columns()
        );
        let [id, second, third] = record.field_values();

        self.client
            .session()
            .query_unpaged(query, (id, second, third))
            .await
            .inspect_err(|e| {
                tracing::error!(entity = T::ENTITY, id, error = %e, "Error saving item to ScyllaDB");
            })?;

        tracing::info!(entity = T::ENTITY, id, "Successfully saved item to ScyllaDB");
        Ok(())
    }
}

#[async_trait]
impl<T: Record> ScanStore<T> for ScyllaRecordStore<T> {
    async fn scan_all(&self) -> Result<Vec<T>> {
        let query = format!("SELECT {} FROM {}", Self::columns(), self.table);

        let result = self.client.session().query_unpaged(query, ()).await?;
        let rows = result.into_rows_result().map_err(scylla_error)?;

        let mut records = Vec::with_capacity(rows.rows_num());
        for row in rows.rows::<RecordRow>().map_err(scylla_error)? {
            let (id, second, third) = row.map_err(scylla_error)?;
            records.push(T::from_row(id, second, third));
        }

        Ok(records)
    }
}
