//! File storage abstraction for uploaded images.

use async_trait::async_trait;

use super::DomainError;

/// Largest image accepted with a claim or catalog entry.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// An image received with a request, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Stores an uploaded file and hands back the reference kept on the record
/// (a path or URL). The core never reads the file back.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, DomainError>;

    /// Drop a file previously returned by `store`. Unknown references are ignored.
    async fn remove(&self, reference: &str) -> Result<(), DomainError>;
}

/// Size check shared by every upload path.
pub fn ensure_image_size(bytes: &[u8]) -> Result<(), DomainError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(DomainError::validation(
            "image file size should be less than 10 MB",
        ));
    }
    Ok(())
}
