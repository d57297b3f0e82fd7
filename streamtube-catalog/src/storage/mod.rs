use async_trait::async_trait;
use thiserror::Error;

mod http;
pub use http::*;

/// A file received from a client, ready to be uploaded
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Hosted media returned by the storage service
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Publicly reachable URL of the hosted file
    pub url: String,
    /// Duration in seconds, derived by the service for video media
    pub duration: Option<f64>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid media storage URL: {0}")]
    InvalidUrl(String),

    #[error("Upload was rejected: {0}")]
    Rejected(String),

    #[error("Failed to reach media storage: {0}")]
    Request(String),

    #[error("Failed to parse media storage response: {0}")]
    MalformedResponse(String),
}

/// Represents a service that hosts uploaded media and derives its metadata
#[async_trait]
pub trait MediaStorage: Send + Sync + 'static {
    /// Uploads a file, returning its hosted location. There is no
    /// compensation on failure, a half-finished upload is the service's
    /// problem to clean up.
    async fn upload(&self, file: MediaFile) -> Result<StoredMedia, StorageError>;
}
