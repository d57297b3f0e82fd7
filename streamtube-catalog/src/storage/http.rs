use async_trait::async_trait;
use log::warn;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use url::Url;

use crate::{MediaFile, MediaStorage, StorageError, StoredMedia};

/// A media storage implementation backed by an HTTP upload service
pub struct HttpMediaStorage {
    base: Url,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    duration: Option<f64>,
}

impl HttpMediaStorage {
    pub fn new(base_url: &str) -> Result<Self, StorageError> {
        let base = Url::parse(base_url).map_err(|e| StorageError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            base,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl MediaStorage for HttpMediaStorage {
    async fn upload(&self, file: MediaFile) -> Result<StoredMedia, StorageError> {
        let endpoint = self
            .base
            .join("upload")
            .map_err(|e| StorageError::InvalidUrl(e.to_string()))?;

        let part = Part::bytes(file.data)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| StorageError::Rejected(e.to_string()))?;

        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Media upload was rejected with status {}", response.status());
            return Err(StorageError::Rejected(response.status().to_string()));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::MalformedResponse(e.to_string()))?;

        Ok(StoredMedia {
            url: body.url,
            duration: body.duration,
        })
    }
}
