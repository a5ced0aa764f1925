/**
 * Image Upload Storage
 *
 * Stores attached images on local disk and hands back the stored filename,
 * which becomes the post's `image` reference. Files are served read-only
 * under `/uploads` by the router.
 *
 * # Naming
 *
 * `<unix-millis>-<original name>`, with any directory components removed
 * from the client-supplied name so a file can never land outside the
 * upload directory.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::error::BackendError;

/// Name used when the client sends no usable file name
const FALLBACK_FILE_NAME: &str = "upload";

/// Upload directory plus the per-file size limit
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: Arc<PathBuf>,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self {
            dir: Arc::new(dir),
            max_bytes,
        }
    }

    /// Directory files are written to
    pub fn dir(&self) -> &Path {
        self.dir.as_path()
    }

    /// Largest accepted file, in bytes
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<(), BackendError> {
        tokio::fs::create_dir_all(self.dir.as_path()).await?;
        Ok(())
    }

    /// Write an uploaded file and return its stored name
    ///
    /// # Errors
    ///
    /// * `400 Bad Request` - The file exceeds the size limit
    /// * `500 Internal Server Error` - The file could not be written
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, BackendError> {
        if bytes.len() > self.max_bytes {
            tracing::warn!("Rejected upload of {} bytes (limit {})", bytes.len(), self.max_bytes);
            return Err(BackendError::validation(format!(
                "File too large (max {} bytes)",
                self.max_bytes
            )));
        }

        let file_name = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            tracing::error!("Failed to write upload {}: {}", path.display(), e);
            e
        })?;

        tracing::info!("Stored upload {} ({} bytes)", file_name, bytes.len());
        Ok(file_name)
    }

    /// Delete a stored upload; failures are only logged
    pub async fn remove(&self, file_name: &str) {
        let path = self.dir.join(sanitize_file_name(file_name));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!("Removed upload {}", file_name),
            Err(e) => tracing::warn!("Failed to remove upload {}: {}", path.display(), e),
        }
    }
}

/// Keep only the final path component of a client-supplied file name
fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        FALLBACK_FILE_NAME.to_string()
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("cat.png"), "cat.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\dog.jpg"), "dog.jpg");
        assert_eq!(sanitize_file_name("dir/"), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name(".."), FALLBACK_FILE_NAME);
    }

    #[tokio::test]
    async fn test_save_writes_timestamped_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().join("uploads"), 1024);
        store.ensure_dir().await.unwrap();

        let name = store.save("photo.png", b"png-bytes").await.unwrap();

        assert!(name.ends_with("-photo.png"));
        let (millis, _) = name.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        let written = tokio::fs::read(store.dir().join(&name)).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().to_path_buf(), 4);

        let err = store.save("big.bin", b"12345").await.unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().to_path_buf(), 1024);

        let name = store.save("photo.png", b"png-bytes").await.unwrap();
        store.remove(&name).await;
        store.remove(&name).await;

        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
