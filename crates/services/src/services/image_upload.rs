//! Seam to whatever stores uploaded images and hands back a public URL.

use async_trait::async_trait;

use super::api_error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// `Ok(None)` means the upload was abandoned and the form must stay as is.
    async fn upload(&self, file: UploadFile) -> Result<Option<String>, ApiError>;
}
