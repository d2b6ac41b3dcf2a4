//! Local-disk implementation of FileStorage

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, FileStorage};

/// Writes uploads under `root` and returns the public `/uploads/...` path.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Keep only the final path component and a conservative character set,
/// so a client-supplied name can never escape the upload directory.
fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        let stored_name = format!("{}-{}", uuid::Uuid::new_v4(), sanitize_file_name(file_name));
        let path = self.root.join(&stored_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        tracing::debug!("Stored upload {} ({} bytes)", path.display(), bytes.len());
        Ok(format!("/uploads/{}", stored_name))
    }

    async fn remove(&self, reference: &str) -> Result<(), DomainError> {
        let stored_name = sanitize_file_name(reference.trim_start_matches("/uploads/"));
        let path = self.root.join(&stored_name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Removed upload {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\bukti.jpg"), "bukti.jpg");
        assert_eq!(sanitize_file_name("foto shalat.png"), "foto_shalat.png");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[tokio::test]
    async fn test_store_writes_file_under_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalFileStorage::new(dir.path());

        let reference = storage
            .store("bukti.jpg", b"jpeg-bytes")
            .await
            .expect("store failed");

        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with("-bukti.jpg"));
        let stored = reference.trim_start_matches("/uploads/");
        let contents = std::fs::read(dir.path().join(stored)).expect("file missing");
        assert_eq!(contents, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file_and_ignores_unknown() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalFileStorage::new(dir.path());

        let reference = storage.store("bukti.jpg", b"jpeg").await.expect("store failed");
        let stored = dir.path().join(reference.trim_start_matches("/uploads/"));
        assert!(stored.exists());

        storage.remove(&reference).await.expect("remove failed");
        assert!(!stored.exists());

        storage.remove(&reference).await.expect("second remove failed");
        storage.remove("/uploads/../../etc/passwd").await.expect("escape ignored");
    }
}
