//! # Storefront API
//!
//! HTTP services for the storefront: one binary per record type, all built
//! from the same generic router.
//!
//! ## Endpoints
//!
//! - `GET /v1/<entity>?id=` - fetch one record
//! - `POST /v1/<entity>` - create one record
//! - `POST /v1/s3/order` - snapshot the order table to S3 (order service only)
//! - `GET /health` - liveness
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! │           (generic handlers, one router per service)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   ServiceContext<T>                         │
//! │            (CachedRepository<T>, Exporter<T>)               │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │     Redis Cache         │   │   MySQL / ScyllaDB / S3      │
//! │ (product, customer)     │   │                              │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod server;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub use config::{CachedServiceConfig, ConfigError, OrderServiceConfig, ServerConfig};
pub use context::ServiceContext;
pub use error::{ApiError, ApiResult};

use storefront_domain::Record;

/// Build the Axum router for one record type. The export route is only
/// mounted when the context carries an exporter.
pub fn build_router<T: Record>(ctx: ServiceContext<T>) -> Router {
    let mut router = Router::new().route(
        &format!("/v1/{}", T::ENTITY),
        get(handlers::get_record::<T>).post(handlers::create_record::<T>),
    );

    if ctx.exporter.is_some() {
        router = router.route(
            &format!("/v1/s3/{}", T::ENTITY),
            post(handlers::export_records::<T>),
        );
    }

    router
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::banner::<T>))
        // State and middleware
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
