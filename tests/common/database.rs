//! Test application fixture
//!
//! Every fixture gets its own in-memory SQLite store and temporary upload
//! directory, so tests never share state.

use axum::Router;
use axum_test::TestServer;
use feedline::backend::routes::create_router;
use feedline::backend::server::config::memory_database;
use feedline::backend::server::{AppState, ServerConfig};
use tempfile::TempDir;

/// Configuration used by every fixture: cheap hashing, temp uploads
pub fn test_config(upload_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        upload_dir: upload_dir.path().to_path_buf(),
        bcrypt_cost: 4,
        jwt_secret: "test-secret".to_string(),
        ..ServerConfig::default()
    }
}

/// Application state plus the directory backing its uploads
pub struct TestApp {
    pub state: AppState,
    pub uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|config| config).await
    }

    /// Build with a tweaked configuration
    pub async fn with_config(tweak: impl FnOnce(ServerConfig) -> ServerConfig) -> Self {
        let uploads = tempfile::tempdir().expect("Failed to create upload dir");
        let config = tweak(test_config(&uploads));
        let pool = memory_database().await.expect("Failed to open test database");
        let state = AppState::new(config, pool);
        state.uploads.ensure_dir().await.expect("Failed to create upload dir");
        Self { state, uploads }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// In-process test server over the full router
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }

    /// Number of rows in a table
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.state.db_pool)
            .await
            .expect("Failed to count rows")
    }

    /// Files currently in the upload directory
    pub fn upload_files(&self) -> Vec<String> {
        std::fs::read_dir(self.uploads.path())
            .expect("Failed to read upload dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect()
    }
}
