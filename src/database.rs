use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::shared::AppError;

/// Connects the Postgres pool described by the configuration
#[instrument(skip(config))]
pub async fn connect(config: &Config) -> Result<PgPool, AppError> {
    info!(
        max_connections = config.db_max_connections,
        "Connecting to PostgreSQL"
    );

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_query_timeout)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to connect to database");
            AppError::DatabaseError(e.to_string())
        })
}

/// Runs a single store operation under the per-operation timeout.
/// An elapsed timeout is reported the same way as any other store failure.
pub async fn bounded<T, F>(timeout: Duration, operation: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("query exceeded {}ms", timeout.as_millis()),
        ))),
    }
}

/// True when the error is a unique constraint violation reported by the database
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation())
}

/// Maps a store failure into the application error, logging the details
pub fn store_error(context: &str, error: sqlx::Error) -> AppError {
    warn!(error = %error, "{}", context);
    AppError::DatabaseError(error.to_string())
}
