//! Storage for the original uploaded files
//!
//! Uploads are kept by reference: the dataset row stores the key returned
//! here. Keys have the form `datasets/{dataset_id}/{file_name}`.

use anyhow::{bail, Context, Result};
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use eqviz_common::checksum::sha256_hex;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub mod config;

pub use config::{StorageBackend, StorageConfig};

#[derive(Clone)]
enum Backend {
    Local { root: PathBuf },
    S3 { client: Client, bucket: String },
}

#[derive(Clone)]
pub struct Storage {
    backend: Backend,
}

#[derive(Debug, Clone)]
pub struct UploadResult {
    pub key: String,
    pub checksum: String,
    pub size: i64,
}

impl Storage {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        debug!("Initializing storage with config: {:?}", config.backend);

        match config.backend {
            StorageBackend::Local => {
                tokio::fs::create_dir_all(&config.local_dir)
                    .await
                    .with_context(|| {
                        format!("Failed to create storage dir {}", config.local_dir.display())
                    })?;
                info!("Local storage initialized at {}", config.local_dir.display());
                Ok(Self::local(config.local_dir))
            },
            StorageBackend::S3 => {
                let s3 = config.s3;
                let credentials =
                    Credentials::new(&s3.access_key, &s3.secret_key, None, None, "eqviz-storage");

                let mut builder = aws_sdk_s3::Config::builder()
                    .credentials_provider(credentials)
                    .region(Region::new(s3.region.clone()))
                    .force_path_style(s3.path_style);

                if let Some(endpoint) = &s3.endpoint {
                    builder = builder.endpoint_url(endpoint);
                }

                let client = Client::from_conf(builder.build());
                info!("Storage client initialized for bucket: {}", s3.bucket);

                Ok(Self {
                    backend: Backend::S3 {
                        client,
                        bucket: s3.bucket,
                    },
                })
            },
        }
    }

    /// Local storage without touching the filesystem until first write
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Local { root: root.into() },
        }
    }

    pub fn build_key(dataset_id: Uuid, file_name: &str) -> String {
        format!("datasets/{}/{}", dataset_id, file_name)
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<UploadResult> {
        let checksum = sha256_hex(&data);
        let size = data.len() as i64;

        match &self.backend {
            Backend::Local { root } => {
                let path = local_path(root, key)?;
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                tokio::fs::write(&path, data)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                debug!("Stored {} bytes at {}", size, path.display());
            },
            Backend::S3 { client, bucket } => {
                debug!("Uploading {} bytes to s3://{}/{}", size, bucket, key);

                let mut request = client
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .body(ByteStream::from(data));

                if let Some(ct) = content_type {
                    request = request.content_type(ct);
                }

                request.send().await.context("Failed to upload to S3")?;
            },
        }

        Ok(UploadResult {
            key: key.to_string(),
            checksum,
            size,
        })
    }

    /// Remove a stored object; a key that is already gone is not an error
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        match &self.backend {
            Backend::Local { root } => {
                let path = local_path(root, key)?;
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {},
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
                    Err(e) => {
                        return Err(e).with_context(|| format!("Failed to delete {}", path.display()))
                    },
                }
                // The per-dataset directory only ever holds this one file
                if let Some(parent) = path.parent() {
                    if parent != root.as_path() {
                        let _ = tokio::fs::remove_dir(parent).await;
                    }
                }
            },
            Backend::S3 { client, bucket } => {
                client
                    .delete_object()
                    .bucket(bucket)
                    .key(key)
                    .send()
                    .await
                    .context(format!("Failed to delete from S3: {}", key))?;
            },
        }

        debug!("Deleted stored object {}", key);
        Ok(())
    }
}

/// Resolve a key below `root`, refusing anything that could escape it
fn local_path(root: &Path, key: &str) -> Result<PathBuf> {
    let relative = Path::new(key);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!("Invalid storage key: {}", key);
    }
    Ok(root.join(relative))
}
