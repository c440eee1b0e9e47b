//! # Request Handlers
//!
//! Handlers generic over the record type, mounted once per service.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use crate::context::ServiceContext;
use crate::error::{ApiError, ApiResult};
use storefront_domain::Record;
use storefront_persistence::{ExportError, Lookup, PersistenceError};

/// Cache lookup outcome of a read: `hit`, `miss`, `error` or `skip`.
pub const CACHE_HEADER: &str = "x-cache";

/// Cache write outcome of a read or create: `stored`, `failed` or `skipped`.
pub const CACHE_FILL_HEADER: &str = "x-cache-fill";

/// `?id=` query. A missing id is treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: String,
}

/// `GET /v1/<entity>?id=`
pub async fn get_record<T: Record>(
    State(ctx): State<ServiceContext<T>>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Response> {
    match ctx.repository.get(&query.id).await {
        Lookup::Found(served) => Ok((
            [
                (CACHE_HEADER, served.lookup.as_str()),
                (CACHE_FILL_HEADER, served.fill.as_str()),
            ],
            Json(served.value),
        )
            .into_response()),
        Lookup::NotFound => Err(ApiError::NotFound { entity: T::ENTITY }),
        Lookup::StoreError(e) => Err(ApiError::fetch(T::ENTITY, e)),
    }
}

/// `POST /v1/<entity>`
///
/// The body is decoded as JSON whatever its content type. Absent fields
/// become empty strings; syntax and type errors are rejected before any
/// store access.
pub async fn create_record<T: Record>(
    State(ctx): State<ServiceContext<T>>,
    body: Bytes,
) -> ApiResult<Response> {
    let record: T = serde_json::from_slice(&body).map_err(|e| {
        tracing::info!(entity = T::ENTITY, error = %e, "Rejected request body");
        ApiError::BadRequest(e.to_string())
    })?;

    let fill = ctx
        .repository
        .create(&record)
        .await
        .map_err(|e| ApiError::save(T::ENTITY, e))?;

    Ok((
        StatusCode::CREATED,
        [(CACHE_FILL_HEADER, fill.as_str())],
        Json(json!({ "message": format!("{} created successfully", T::LABEL) })),
    )
        .into_response())
}

/// `POST /v1/s3/<entity>`
pub async fn export_records<T: Record>(
    State(ctx): State<ServiceContext<T>>,
) -> ApiResult<Json<serde_json::Value>> {
    let export_error = |source| ApiError::Export {
        entity: T::ENTITY,
        source,
    };

    let Some(exporter) = ctx.exporter.as_ref() else {
        return Err(export_error(ExportError::Upload(PersistenceError::NotConfigured(
            "exporter",
        ))));
    };

    exporter.export().await.map_err(export_error)?;

    Ok(Json(json!({
        "message": format!("{}s saved to S3 successfully", T::LABEL)
    })))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Service banner at `/`
pub async fn banner<T: Record>() -> String {
    format!("Storefront {} Service", T::LABEL)
}
