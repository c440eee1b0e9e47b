//! HTTP client for one storefront service.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use storefront_domain::Record;
use thiserror::Error;

/// Smoke check failures
#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{entity} request returned {status}: {body}")]
    Status {
        entity: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{entity} {id} was created but could not be read back")]
    Missing { entity: &'static str, id: String },

    #[error("{entity} {id} differs in fields {fields:?}")]
    Mismatch {
        entity: &'static str,
        id: String,
        fields: Vec<&'static str>,
    },
}

/// Client bound to one service base URL, e.g. `http://localhost:8081`.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn record_url<T: Record>(&self) -> String {
        format!("{}/v1/{}", self.base_url, T::ENTITY)
    }

    pub fn export_url<T: Record>(&self) -> String {
        format!("{}/v1/s3/{}", self.base_url, T::ENTITY)
    }

    /// `POST /v1/<entity>`; expects 201.
    pub async fn create<T: Record>(&self, record: &T) -> Result<(), SmokeError> {
        let response = self.http.post(self.record_url::<T>()).json(record).send().await?;
        expect_status::<T>(response, StatusCode::CREATED).await?;
        Ok(())
    }

    /// `GET /v1/<entity>?id=`; a 404 is `Ok(None)`.
    pub async fn fetch<T: Record>(&self, id: &str) -> Result<Option<T>, SmokeError> {
        let response = self
            .http
            .get(self.record_url::<T>())
            .query(&[("id", id)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = expect_status::<T>(response, StatusCode::OK).await?;
        Ok(Some(response.json().await?))
    }

    /// `POST /v1/s3/<entity>`; returns the service's message.
    pub async fn export<T: Record>(&self) -> Result<String, SmokeError> {
        let response = self.http.post(self.export_url::<T>()).send().await?;
        let response = expect_status::<T>(response, StatusCode::OK).await?;
        let body: Value = response.json().await?;

        Ok(body["message"].as_str().unwrap_or_default().to_string())
    }

    /// Create a record, read it back and compare every field.
    pub async fn round_trip<T: Record>(&self, record: &T) -> Result<(), SmokeError> {
        self.create(record).await?;

        let Some(stored) = self.fetch::<T>(record.id()).await? else {
            return Err(SmokeError::Missing {
                entity: T::ENTITY,
                id: record.id().to_string(),
            });
        };

        let fields = mismatched_fields(record, &stored);
        if fields.is_empty() {
            Ok(())
        } else {
            Err(SmokeError::Mismatch {
                entity: T::ENTITY,
                id: record.id().to_string(),
                fields,
            })
        }
    }
}

/// Names of the fields whose values differ.
pub fn mismatched_fields<T: Record>(expected: &T, actual: &T) -> Vec<&'static str> {
    T::FIELDS
        .iter()
        .zip(expected.field_values().iter().zip(actual.field_values()))
        .filter(|(_, (left, right))| *left != right)
        .map(|(field, _)| *field)
        .collect()
}

async fn expect_status<T: Record>(
    response: reqwest::Response,
    expected: StatusCode,
) -> Result<reqwest::Response, SmokeError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    Err(SmokeError::Status {
        entity: T::ENTITY,
        status,
        body: response.text().await.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storefront_api::{ServiceContext, build_router};
    use storefront_domain::{Customer, Order};
    use storefront_persistence::memory::{MemoryCache, MemorySink, MemoryStore};
    use storefront_persistence::{
        CachedRepository, ExportSink, Exporter, ReadStrategy, WriteStrategy,
    };

    async fn spawn(router: axum::Router) -> ServiceClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        ServiceClient::new(Client::new(), &format!("http://{addr}"))
    }

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.into(),
            name: name.into(),
            gender: "female".into(),
        }
    }

    fn customer_service(
        write_strategy: WriteStrategy,
    ) -> (Arc<MemoryStore<Customer>>, Arc<MemoryCache>, axum::Router) {
        let store = Arc::new(MemoryStore::<Customer>::new());
        let cache = Arc::new(MemoryCache::new());
        let repository = CachedRepository::with_strategies(
            store.clone(),
            Some(cache.clone()),
            ReadStrategy::CacheFirst,
            write_strategy,
        );
        (store, cache, build_router(ServiceContext::new(repository)))
    }

    fn order_service(sink: Option<Arc<MemorySink>>) -> axum::Router {
        let store = Arc::new(MemoryStore::<Order>::new());
        let repository = CachedRepository::with_strategies(
            store.clone(),
            None,
            ReadStrategy::DbOnly,
            WriteStrategy::DbOnly,
        );
        let sink = sink.map(|sink| sink as Arc<dyn ExportSink>);
        build_router(ServiceContext::new(repository).with_exporter(Exporter::new(store, sink)))
    }

    #[tokio::test]
    async fn test_round_trip_against_running_service() {
        let (store, _, router) = customer_service(WriteStrategy::WriteThrough);
        let client = spawn(router).await;

        client.round_trip(&customer("c-1", "Ada Lovelace")).await.unwrap();
        assert_eq!(store.len(), 1);

        assert!(client.fetch::<Customer>("c-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_reports_status() {
        let (_, _, router) = customer_service(WriteStrategy::WriteThrough);
        let client = spawn(router).await;
        let record = customer("c-2", "Grace Hopper");

        client.create(&record).await.unwrap();
        let err = client.create(&record).await.unwrap_err();
        assert!(matches!(
            err,
            SmokeError::Status { entity: "customer", status, .. }
                if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_stale_read_reports_mismatched_fields() {
        let (_, cache, router) = customer_service(WriteStrategy::DbOnly);
        let stale = customer("c-3", "Barbara Liskov");
        cache.insert_raw("customer:c-3", &serde_json::to_string(&stale).unwrap());
        let client = spawn(router).await;

        let err = client
            .round_trip(&customer("c-3", "Frances Allen"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SmokeError::Mismatch { ref id, ref fields, .. } if id == "c-3" && fields == &["name"]
        ));
    }

    #[tokio::test]
    async fn test_export() {
        let sink = Arc::new(MemorySink::new());
        let client = spawn(order_service(Some(sink.clone()))).await;

        let message = client.export::<Order>().await.unwrap();
        assert_eq!(message, "Orders saved to S3 successfully");
        assert_eq!(sink.puts(), 1);

        let client = spawn(order_service(None)).await;
        let err = client.export::<Order>().await.unwrap_err();
        assert!(matches!(
            err,
            SmokeError::Status { status, ref body, .. }
                if status == StatusCode::INTERNAL_SERVER_ERROR && body.contains("failed to save data to S3")
        ));
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let client = ServiceClient::new(Client::new(), "http://localhost:8080/");
        assert_eq!(client.record_url::<Customer>(), "http://localhost:8080/v1/customer");
        assert_eq!(client.export_url::<Order>(), "http://localhost:8080/v1/s3/order");
    }

    #[test]
    fn test_mismatched_fields() {
        let expected = Order {
            id: "o-1".into(),
            customerid: "c-1".into(),
            productid: "p-1".into(),
        };
        assert!(mismatched_fields(&expected, &expected.clone()).is_empty());

        let actual = Order {
            productid: "p-2".into(),
            ..expected.clone()
        };
        assert_eq!(mismatched_fields(&expected, &actual), ["productid"]);
    }
}
