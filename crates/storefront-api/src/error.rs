//! # API Error Types
//!
//! Unified error handling for the HTTP layer. Clients only ever see a
//! fixed message; the underlying cause is logged by the persistence layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use storefront_persistence::{ExportError, PersistenceError};

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be decoded. Carries the extractor's text.
    #[error("{0}")]
    BadRequest(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A store call failed. `action` is the verb used in the client message.
    #[error("failed to {action} {entity}: {source}")]
    Dependency {
        action: &'static str,
        entity: &'static str,
        #[source]
        source: PersistenceError,
    },

    #[error("export of {entity} records failed: {source}")]
    Export {
        entity: &'static str,
        #[source]
        source: ExportError,
    },
}

impl ApiError {
    pub fn fetch(entity: &'static str, source: PersistenceError) -> Self {
        Self::Dependency {
            action: "fetch",
            entity,
            source,
        }
    }

    pub fn save(entity: &'static str, source: PersistenceError) -> Self {
        Self::Dependency {
            action: "save",
            entity,
            source,
        }
    }

    /// Get HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Dependency { .. } | Self::Export { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(text) => text.clone(),
            Self::NotFound { entity } => format!("{entity} not found"),
            Self::Dependency { action, entity, .. } => format!("failed to {action} {entity}"),
            Self::Export { entity, source } => match source {
                ExportError::Scan(_) => format!("failed to fetch {entity}s"),
                ExportError::Serialize(_) => format!("failed to marshal {entity}s"),
                ExportError::Upload(_) => "failed to save data to S3".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::debug!(error = %self, "Request failed");
        }

        let body = serde_json::json!({ "error": self.public_message() });
        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_messages_hide_cause() {
        let err = ApiError::fetch("product", PersistenceError::Sql("connection reset".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "failed to fetch product");

        let err = ApiError::save("customer", PersistenceError::WriteConflict("dup".into()));
        assert_eq!(err.public_message(), "failed to save customer");
    }

    #[test]
    fn test_export_messages_follow_failed_step() {
        let message = |source| ApiError::Export { entity: "order", source }.public_message();

        assert_eq!(
            message(ExportError::Scan(PersistenceError::Injected("scan"))),
            "failed to fetch orders"
        );
        assert_eq!(
            message(ExportError::Serialize(PersistenceError::Serialization("bad".into()))),
            "failed to marshal orders"
        );
        assert_eq!(
            message(ExportError::Upload(PersistenceError::NotConfigured("object store"))),
            "failed to save data to S3"
        );
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::NotFound { entity: "customer" };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "customer not found");
    }
}
