//! Disk-backed storage for uploaded book photos.
//!
//! Uploads are written under a single directory with generated names
//! and served back as static files. The reference stored on a book row
//! is the public path relative to the server root.

use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// URL path segment uploads are served under
const PUBLIC_PREFIX: &str = "uploads";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Upload exceeds the maximum allowed size of {0} bytes")]
    TooLarge(usize),

    #[error("Unsupported photo type: {0}")]
    UnsupportedType(String),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded photos to disk and hands back the reference that is
/// stored on the book row.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
    max_bytes: usize,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Create the storage directory if it does not exist
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Persist an uploaded photo and return its public reference.
    ///
    /// The content type is taken from the multipart part when present,
    /// otherwise guessed from the client file name.
    pub async fn save(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<String, StorageError> {
        if data.len() > self.max_bytes {
            return Err(StorageError::TooLarge(self.max_bytes));
        }

        let mime = match content_type {
            Some(ct) => ct.to_string(),
            None => file_name
                .and_then(|name| mime_guess::from_path(name).first_raw())
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        let extension = extension_for(&mime).ok_or(StorageError::UnsupportedType(mime))?;

        let stored_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
        fs::write(self.root.join(&stored_name), &data).await?;

        Ok(format!("{}/{}", PUBLIC_PREFIX, stored_name))
    }
}

/// Map an accepted image content type to the stored file extension
fn extension_for(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
