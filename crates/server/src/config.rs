//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORDERLINE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   the generic `DATABASE_URL`)
//!
//! ## Optional
//! - `ORDERLINE_HOST` - Bind address (default: 127.0.0.1)
//! - `ORDERLINE_PORT` - Listen port (default: 8082)
//! - `KAFKA_BROKERS` - Comma-separated broker list (default: localhost:9092)
//! - `KAFKA_TOPIC` - Order topic (default: orders)
//! - `KAFKA_GROUP_ID` - Consumer group (default: orderline)
//! - `ORDERLINE_CACHE_CAPACITY` - Max cached orders (default: 1000)
//! - `ORDERLINE_CACHE_PRELOAD_LIMIT` - Orders seeded at startup (default: 100)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Message topic configuration
    pub kafka: KafkaConfig,
    /// Order cache configuration
    pub cache: CacheConfig,
}

/// Kafka consumer configuration.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma-separated broker addresses
    pub brokers: String,
    /// Topic the order records are published on
    pub topic: String,
    /// Consumer group id
    pub group_id: String,
}

/// Order cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached orders
    pub capacity: u64,
    /// How many recent orders to seed the cache with at startup
    pub preload_limit: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ORDERLINE_DATABASE_URL")?;
        let host = parse_env("ORDERLINE_HOST", "127.0.0.1")?;
        let port = parse_env("ORDERLINE_PORT", "8082")?;

        let kafka = KafkaConfig {
            brokers: get_env_or_default("KAFKA_BROKERS", "localhost:9092"),
            topic: get_env_or_default("KAFKA_TOPIC", "orders"),
            group_id: get_env_or_default("KAFKA_GROUP_ID", "orderline"),
        };

        let cache = CacheConfig {
            capacity: parse_env("ORDERLINE_CACHE_CAPACITY", "1000")?,
            preload_limit: parse_env("ORDERLINE_CACHE_PRELOAD_LIMIT", "100")?,
        };

        Ok(Self {
            database_url,
            host,
            port,
            kafka,
            cache,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable with a default and parse it.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
