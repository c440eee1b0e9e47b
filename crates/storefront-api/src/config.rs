//! # Service Configuration
//!
//! Environment-based configuration for the three services. Every loader
//! takes a variable lookup function so it can be driven from a map in
//! tests; `from_env` wires it to the process environment.

use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

use storefront_domain::EntityKind;
use storefront_persistence::export::{DEFAULT_OBJECT_KEY, DEFAULT_WARN_THRESHOLD};
use storefront_persistence::repository::{ScyllaConfig, SqlConfig};
use storefront_persistence::{CacheConfig, ObjectStoreConfig, ReadStrategy, WriteStrategy};

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Process environment lookup.
pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Table variable and default table name per entity.
pub const fn table_setting(kind: EntityKind) -> (&'static str, &'static str) {
    match kind {
        EntityKind::Order => ("ORDER_TABLE", "orders"),
        EntityKind::Product => ("PRODUCT_TABLE", "product"),
        EntityKind::Customer => ("CUSTOMER_TABLE", "customers"),
    }
}

// =============================================================================
// SHARED SERVER SETTINGS
// =============================================================================

/// Logging level used when `RUST_LOG` is unset. Read on its own so tracing
/// is up before the rest of the configuration is parsed.
pub fn log_level(lookup: &impl Fn(&str) -> Option<String>) -> String {
    lookup("LOG_LEVEL")
        .map(|level| level.trim().to_string())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// Settings every service reads.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub server_addr: SocketAddr,

    pub read_strategy: ReadStrategy,
    pub write_strategy: WriteStrategy,
}

impl ServerConfig {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            server_addr: parsed(lookup, "SERVER_ADDR")?
                .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080))),
            read_strategy: parsed(lookup, "READ_STRATEGY")?.unwrap_or_default(),
            write_strategy: parsed(lookup, "WRITE_STRATEGY")?.unwrap_or_default(),
        })
    }
}

// =============================================================================
// PRODUCT / CUSTOMER
// =============================================================================

/// Configuration for a MySQL-backed service with an optional Redis cache.
#[derive(Debug, Clone)]
pub struct CachedServiceConfig {
    pub server: ServerConfig,
    pub mysql: SqlConfig,
    /// `None` runs the service without a cache.
    pub redis: Option<CacheConfig>,
    pub table: String,
}

impl CachedServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env(kind: EntityKind) -> Result<Self, ConfigError> {
        Self::from_lookup(kind, &env_lookup)
    }

    pub fn from_lookup(
        kind: EntityKind,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let (table_var, default_table) = table_setting(kind);

        Ok(Self {
            server: ServerConfig::from_lookup(lookup)?,
            mysql: SqlConfig {
                user: required(lookup, "MYSQL_USER")?,
                password: required(lookup, "MYSQL_PASSWORD")?,
                host: required(lookup, "MYSQL_HOST")?,
                port: required_parsed(lookup, "MYSQL_PORT")?,
                database: required(lookup, "MYSQL_DBNAME")?,
                max_connections: parsed(lookup, "MYSQL_MAX_CONNECTIONS")?.unwrap_or(10),
            },
            redis: redis_config(lookup)?,
            table: lookup(table_var).unwrap_or_else(|| default_table.to_string()),
        })
    }
}

fn redis_config(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<CacheConfig>, ConfigError> {
    if let Some(url) = lookup("REDIS_URL") {
        return Ok(Some(CacheConfig { url }));
    }

    let Some(host) = lookup("REDIS_HOST") else {
        return Ok(None);
    };
    let port = parsed(lookup, "REDIS_PORT")?.unwrap_or(6379);
    let tls = flag(lookup, "REDIS_TLS")?.unwrap_or(true);

    Ok(Some(CacheConfig::from_host(&host, port, tls)))
}

// =============================================================================
// ORDER
// =============================================================================

/// Export target settings.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// `None` leaves the export endpoint failing at upload time.
    pub object_store: Option<ObjectStoreConfig>,
    pub object_key: String,
    pub warn_threshold: usize,
}

impl ExportConfig {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let object_store = match lookup("S3_BUCKET").filter(|bucket| !bucket.is_empty()) {
            Some(bucket) => Some(ObjectStoreConfig {
                bucket,
                region: lookup("AWS_REGION"),
                endpoint: lookup("S3_ENDPOINT"),
                allow_http: flag(lookup, "S3_ALLOW_HTTP")?.unwrap_or(false),
            }),
            None => None,
        };

        Ok(Self {
            object_store,
            object_key: lookup("EXPORT_OBJECT_KEY").unwrap_or_else(|| DEFAULT_OBJECT_KEY.to_string()),
            warn_threshold: parsed(lookup, "EXPORT_WARN_THRESHOLD")?
                .unwrap_or(DEFAULT_WARN_THRESHOLD),
        })
    }
}

/// Configuration for the ScyllaDB-backed order service.
#[derive(Debug, Clone)]
pub struct OrderServiceConfig {
    pub server: ServerConfig,
    pub scylla: ScyllaConfig,
    pub table: String,
    pub export: ExportConfig,
}

impl OrderServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (table_var, default_table) = table_setting(EntityKind::Order);

        Ok(Self {
            server: ServerConfig::from_lookup(lookup)?,
            scylla: ScyllaConfig {
                hosts: required(lookup, "SCYLLA_HOSTS")?
                    .split(',')
                    .map(str::trim)
                    .filter(|host| !host.is_empty())
                    .map(String::from)
                    .collect(),
                keyspace: required(lookup, "SCYLLA_KEYSPACE")?,
                username: lookup("SCYLLA_USERNAME"),
                password: lookup("SCYLLA_PASSWORD"),
            },
            table: lookup(table_var).unwrap_or_else(|| default_table.to_string()),
            export: ExportConfig::from_lookup(lookup)?,
        })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ConfigError> {
    lookup(var)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn parsed<V>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<V>, ConfigError>
where
    V: FromStr,
    V::Err: std::fmt::Display,
{
    lookup(var)
        .map(|value| {
            match value.trim().parse::<V>() {
                Ok(parsed) => Ok(parsed),
                Err(e) => Err(ConfigError::Invalid {
                    var,
                    reason: e.to_string(),
                    value,
                }),
            }
        })
        .transpose()
}

fn required_parsed<V>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<V, ConfigError>
where
    V: FromStr,
    V::Err: std::fmt::Display,
{
    parsed(lookup, var)?.ok_or(ConfigError::Missing(var))
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<bool>, ConfigError> {
    lookup(var)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid {
                var,
                value,
                reason: "expected a boolean".to_string(),
            }),
        })
        .transpose()
}
