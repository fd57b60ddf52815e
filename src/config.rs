use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown storage backend: {0} (expected \"postgres\" or \"memory\")")]
    UnknownStorage(String),
}

/// Which repository implementations the server wires up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Process-wide configuration, loaded once at startup and passed by reference
/// to whatever needs it
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub storage: StorageBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_query_timeout: Duration,
    pub password_memory_kib: u32,
    pub password_iterations: u32,
}

impl Config {
    /// Loads configuration from the environment, reading a `.env` file first if one exists
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let jwt_secret = get("JWT_SECRET", DEFAULT_JWT_SECRET);
        if jwt_secret == DEFAULT_JWT_SECRET {
            warn!("JWT_SECRET not set, using the development default");
        }

        let storage = match get("STORAGE", "postgres").to_lowercase().as_str() {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => return Err(ConfigError::UnknownStorage(other.to_string())),
        };

        let database_url = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                get("DB_USER", "postgres"),
                get("DB_PASSWORD", ""),
                get("DB_HOST", "localhost"),
                parse::<u16>("DB_PORT", &get("DB_PORT", "5432"))?,
                get("DB_NAME", "events"),
            ),
        };

        Ok(Self {
            port: parse("PORT", &get("PORT", "8080"))?,
            jwt_secret,
            storage,
            database_url,
            db_max_connections: parse("DB_MAX_CONNECTIONS", &get("DB_MAX_CONNECTIONS", "10"))?,
            db_query_timeout: Duration::from_secs(parse_positive(
                "DB_QUERY_TIMEOUT_SECS",
                &get("DB_QUERY_TIMEOUT_SECS", "3"),
            )?),
            password_memory_kib: parse(
                "PASSWORD_HASH_MEMORY_KIB",
                &get("PASSWORD_HASH_MEMORY_KIB", "19456"),
            )?,
            password_iterations: parse(
                "PASSWORD_HASH_ITERATIONS",
                &get("PASSWORD_HASH_ITERATIONS", "2"),
            )?,
        })
    }

    pub fn listen_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// A zero timeout would fail every acquire and query immediately
fn parse_positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    match parse::<u64>(key, value)? {
        0 => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
        secs => Ok(secs),
    }
}
