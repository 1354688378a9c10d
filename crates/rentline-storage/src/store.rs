use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::StorageError;

/// Suffix of the sidecar file that records an object's declared content
/// type, so serving returns exactly what the upload declared.
const CONTENT_TYPE_SUFFIX: &str = ".ctype";

/// Verify that a resolved path stays within the expected base directory.
/// Prevents path traversal attacks.
fn ensure_within(base: &Path, target: &Path) -> Result<PathBuf, StorageError> {
    // Canonicalize base; target may not exist yet so normalize manually
    let canonical_base = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
    // Build the full path and strip out any `..` components
    let mut resolved = canonical_base.clone();
    for component in target
        .strip_prefix(&canonical_base)
        .unwrap_or(target)
        .components()
    {
        match component {
            std::path::Component::Normal(c) => resolved.push(c),
            std::path::Component::ParentDir => {
                return Err(StorageError::BadRequest(
                    "Path traversal detected".to_string(),
                ));
            }
            _ => {} // RootDir, CurDir, Prefix — skip
        }
    }
    if !resolved.starts_with(&canonical_base) {
        return Err(StorageError::BadRequest(
            "Path traversal detected".to_string(),
        ));
    }
    Ok(resolved)
}

/// Filesystem-backed object store addressed by relative path.
///
/// Objects are written under `base_path`; the public URL of an object is
/// `<public_base_url>/objects/<path>`, served by [`crate::http`].
#[derive(Debug, Clone)]
pub struct ObjectStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: usize,
}

impl ObjectStore {
    pub async fn new(
        base_path: PathBuf,
        public_base_url: String,
        max_size: usize,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Storage(format!(
                "Failed to create object directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Object store initialized");

        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Store an object under a relative path and return its durable public
    /// URL.  Parent directories are created as needed; an existing object
    /// at the same path is overwritten.
    pub async fn put(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        if data.is_empty() {
            return Err(StorageError::Storage("Empty object".to_string()));
        }
        if data.len() > self.max_size {
            return Err(StorageError::TooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        let full = self.safe_object_path(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::Storage(format!("Failed to create object subdirectory: {e}"))
            })?;
        }

        fs::write(&full, data)
            .await
            .map_err(|e| StorageError::Storage(format!("Failed to write object {path}: {e}")))?;

        let meta = sidecar_path(&full);
        fs::write(&meta, content_type.as_bytes())
            .await
            .map_err(|e| StorageError::Storage(format!("Failed to write object metadata: {e}")))?;

        debug!(path, size = data.len(), content_type, "Stored object");
        Ok(self.public_url(path))
    }

    /// Read an object back, returning its bytes and declared content type.
    pub async fn get(&self, path: &str) -> Result<(Vec<u8>, String), StorageError> {
        let full = self.safe_object_path(path)?;

        if !full.exists() {
            return Err(StorageError::NotFound(path.to_string()));
        }

        let data = fs::read(&full)
            .await
            .map_err(|e| StorageError::Storage(format!("Failed to read object {path}: {e}")))?;

        let content_type = fs::read_to_string(sidecar_path(&full))
            .await
            .unwrap_or_else(|_| "application/octet-stream".to_string());

        debug!(path, size = data.len(), "Retrieved object");
        Ok((data, content_type))
    }

    /// Derive the durable public URL for an object path.  Pure string
    /// derivation: the object need not exist yet.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/objects/{}", self.public_base_url, path)
    }

    /// Safe object path that validates against traversal.
    fn safe_object_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        if path.is_empty() || path.starts_with('/') || path.contains('\\') || path.contains("..") {
            return Err(StorageError::BadRequest(format!(
                "Invalid object path: {path}"
            )));
        }
        let raw = self.base_path.join(path);
        ensure_within(&self.base_path, &raw)
    }
}

fn sidecar_path(object_path: &Path) -> PathBuf {
    let mut os = object_path.as_os_str().to_owned();
    os.push(CONTENT_TYPE_SUFFIX);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (ObjectStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::new(
            dir.path().to_path_buf(),
            "http://localhost:8080".into(),
            1024 * 1024,
        )
        .await
        .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (store, _dir) = test_store().await;
        let data = b"fake-png-bytes";

        let url = store
            .put("chat-images/u1/1700000000.png", data, "image/png")
            .await
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:8080/objects/chat-images/u1/1700000000.png"
        );

        let (retrieved, content_type) = store.get("chat-images/u1/1700000000.png").await.unwrap();
        assert_eq!(retrieved, data);
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn test_not_found() {
        let (store, _dir) = test_store().await;
        assert!(matches!(
            store.get("missing.png").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_object_rejected() {
        let (store, _dir) = test_store().await;
        assert!(store.put("x.png", b"", "image/png").await.is_err());
    }

    #[tokio::test]
    async fn test_too_large_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf(), "http://x".into(), 4)
            .await
            .unwrap();
        let err = store.put("big.bin", b"12345", "application/octet-stream").await;
        assert!(matches!(err, Err(StorageError::TooLarge { size: 5, max: 4 })));
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let (store, _dir) = test_store().await;
        assert!(store.put("../escape.png", b"x", "image/png").await.is_err());
        assert!(store.get("/etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_public_url_is_pure() {
        let (store, _dir) = test_store().await;
        assert_eq!(
            store.public_url("a/b.png"),
            "http://localhost:8080/objects/a/b.png"
        );
    }
}
