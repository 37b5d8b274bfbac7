//! Database connection management
//!
//! The seed run talks to PostgreSQL over exactly one connection, so the
//! sqlx pool is capped at a single member.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Every statement goes through the same connection.
const SINGLE_CONNECTION: u32 = 1;

/// Default time to wait for the connection before giving up.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Open the single-connection pool.
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = connect("postgres://localhost/blogctl").await?;
/// ```
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    connect_with_timeout(database_url, DEFAULT_CONNECT_TIMEOUT).await
}

/// Open the single-connection pool with a custom acquire timeout.
pub async fn connect_with_timeout(
    database_url: &str,
    timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(timeout_secs = timeout.as_secs(), "connecting to database");

    PgPoolOptions::new()
        .max_connections(SINGLE_CONNECTION)
        .acquire_timeout(timeout)
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p blogctl-db -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = connect(&url).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn unreachable_database_fails() {
        let result = connect_with_timeout(
            "postgres://nobody@127.0.0.1:1/missing",
            Duration::from_millis(200),
        )
        .await;

        assert!(result.is_err());
    }
}
