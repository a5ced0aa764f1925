/**
 * Server Configuration
 *
 * This module handles loading of server configuration and the SQLite
 * connection pool.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables (a `.env` file is read
 * by the binary before this runs), with sensible defaults for local
 * development.
 *
 * | Variable | Default |
 * |---|---|
 * | `DATABASE_URL` | `sqlite://feedline.db?mode=rwc` |
 * | `SERVER_PORT` | `5000` |
 * | `JWT_SECRET` | development secret (warned about) |
 * | `UPLOAD_DIR` | `uploads` |
 * | `CORS_ORIGIN` | `http://localhost:5173` |
 * | `FEED_LIMIT` | `20` |
 * | `POST_RATE_LIMIT` | `5` |
 * | `POST_RATE_WINDOW_SECS` | `900` |
 * | `BCRYPT_COST` | `bcrypt::DEFAULT_COST` |
 *
 * # Error Handling
 *
 * Unparseable values are logged and replaced by their default. Unlike the
 * optional services, the database is required: failing to open it or to
 * apply migrations is a startup error.
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::backend::error::BackendError;

const DEV_JWT_SECRET: &str = "feedline-dev-secret-change-in-production";

/// Runtime configuration for the feed server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// sqlx connection string for the SQLite store
    pub database_url: String,
    /// TCP port the server listens on
    pub port: u16,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Directory uploaded images are written to and served from
    pub upload_dir: PathBuf,
    /// Largest accepted image attachment
    pub max_upload_bytes: usize,
    /// Origin allowed by CORS (with credentials)
    pub cors_origin: String,
    /// Number of posts returned by the feed listing
    pub feed_limit: i64,
    /// Posts a client may create per window
    pub post_rate_limit: usize,
    /// Length of the sliding rate-limit window
    pub post_rate_window: Duration,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Capacity of the real-time broadcast channel
    pub broadcast_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://feedline.db?mode=rwc".to_string(),
            port: 5000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 5 * 1024 * 1024,
            cors_origin: "http://localhost:5173".to_string(),
            feed_limit: 20,
            post_rate_limit: 5,
            post_rate_window: Duration::from_secs(15 * 60),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            broadcast_capacity: 1000,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            port: env_or("SERVER_PORT", defaults.port),
            jwt_secret,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            cors_origin: std::env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            feed_limit: env_or("FEED_LIMIT", defaults.feed_limit),
            post_rate_limit: env_or("POST_RATE_LIMIT", defaults.post_rate_limit),
            post_rate_window: Duration::from_secs(env_or(
                "POST_RATE_WINDOW_SECS",
                defaults.post_rate_window.as_secs(),
            )),
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost),
            broadcast_capacity: defaults.broadcast_capacity,
        }
    }
}

/// Read and parse an environment variable, falling back to `default`
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Open the SQLite pool and apply the embedded migrations
///
/// # Errors
///
/// Returns an error when the connection string is invalid, the database
/// cannot be opened, or a migration fails.
pub async fn load_database(database_url: &str) -> Result<SqlitePool, BackendError> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            e
        })?;

    tracing::info!("Database connection pool created successfully");
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the schema applied
///
/// The pool is pinned to a single connection that never expires, since every
/// new SQLite memory connection would otherwise see an empty database.
pub async fn memory_database() -> Result<SqlitePool, BackendError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), BackendError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_feed_rules() {
        let config = ServerConfig::default();
        assert_eq!(config.feed_limit, 20);
        assert_eq!(config.post_rate_limit, 5);
        assert_eq!(config.post_rate_window, Duration::from_secs(900));
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_memory_database_has_schema() {
        let pool = memory_database().await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
