// src/export/storage.rs
//! Where report artifacts are written: a local directory or a GCS bucket.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::AppError;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// A stored file and the URL it can be read back from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtifact {
    pub path: String,
    pub url: String,
}

/// Write access to an artifact store. Paths are relative and `/`-separated.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredArtifact, AppError>;

    async fn exists(&self, path: &str) -> Result<bool, AppError>;
}

// --- Local filesystem ---

/// Writes artifacts under a root directory and returns `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(AppError::Storage {
                backend: self.name().to_string(),
                message: format!("refusing to write outside the storage root: '{}'", path),
            });
        }
        Ok(self.root.join(relative))
    }

    fn file_url(&self, full: &Path) -> Result<String, AppError> {
        let absolute = if full.is_absolute() {
            full.to_path_buf()
        } else {
            std::env::current_dir()?.join(full)
        };
        url::Url::from_file_path(&absolute)
            .map(|u| u.to_string())
            .map_err(|_| AppError::Storage {
                backend: self.name().to_string(),
                message: format!("cannot build a file URL for {}", absolute.display()),
            })
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    fn name(&self) -> &str {
        "local"
    }

    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredArtifact, AppError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, &bytes).await?;
        log::info!(
            "Wrote {} ({} bytes, {})",
            full.display(),
            bytes.len(),
            content_type
        );

        Ok(StoredArtifact {
            path: path.to_string(),
            url: self.file_url(&full)?,
        })
    }

    async fn exists(&self, path: &str) -> Result<bool, AppError> {
        let full = self.resolve(path)?;
        Ok(tokio::fs::try_exists(full).await?)
    }
}

// --- Google Cloud Storage ---

pub const GCS_DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Uploads through the GCS JSON API and publishes objects as public-read.
#[derive(Clone)]
pub struct GcsStorage {
    client: Client,
    bucket: String,
    access_token: String,
    endpoint: String,
}

impl std::fmt::Debug for GcsStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsStorage")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GcsStorage {
    pub fn new(
        bucket: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, AppError> {
        let bucket = bucket.into();
        let access_token = access_token.into();
        if bucket.trim().is_empty() {
            return Err(AppError::MissingConfiguration("GCS_BUCKET is empty".into()));
        }
        if access_token.trim().is_empty() {
            return Err(AppError::MissingConfiguration(
                "GCS_ACCESS_TOKEN is empty".into(),
            ));
        }
        Ok(Self {
            client: Client::builder().build()?,
            bucket,
            access_token,
            endpoint: GCS_DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Points uploads at another endpoint, such as a local emulator.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, path)
    }

    fn failure(&self, status: StatusCode, body: &str) -> AppError {
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        AppError::Storage {
            backend: self.name().to_string(),
            message: format!("HTTP {}: {}", status, preview),
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for GcsStorage {
    fn name(&self) -> &str {
        "gcs"
    }

    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredArtifact, AppError> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.endpoint, self.bucket);
        log::debug!("POST {} name={}", url, path);

        let size = bytes.len();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header(header::CONTENT_TYPE, content_type)
            .query(&[
                ("uploadType", "media"),
                ("name", path),
                ("predefinedAcl", "publicRead"),
            ])
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.failure(status, &body));
        }

        let artifact = StoredArtifact {
            path: path.to_string(),
            url: self.public_url(path),
        };
        log::info!("Uploaded {} bytes to {}", size, artifact.url);
        Ok(artifact)
    }

    async fn exists(&self, path: &str) -> Result<bool, AppError> {
        let object: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
        let url = format!("{}/storage/v1/b/{}/o/{}", self.endpoint, self.bucket, object);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(self.failure(status, &body))
            }
        }
    }
}
