//! Storage locations (S3, R2, GCS, Azure, local filesystem)

use crate::config::Credentials;
use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::sync::Arc;

/// Whether a local root must already exist or may be created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocalMode {
    Open,
    Create,
}

/// A root location inside an object store, parsed from a URL
#[derive(Debug, Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: ObjectPath,
    /// Original URL scheme for logging
    scheme: String,
}

impl StorageLocation {
    /// Open an existing location for reading
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` or `s3a://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/` or `./path/` - Local filesystem (must exist)
    pub fn open(url: &str, credentials: &Credentials) -> Result<Self> {
        Self::parse(url, credentials, LocalMode::Open)
    }

    /// Open a location for writing, creating a local directory if needed
    pub fn create(url: &str, credentials: &Credentials) -> Result<Self> {
        Self::parse(url, credentials, LocalMode::Create)
    }

    /// An ephemeral in-memory location
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            prefix: ObjectPath::default(),
            scheme: "memory".to_string(),
        }
    }

    fn parse(url: &str, credentials: &Credentials, mode: LocalMode) -> Result<Self> {
        if let Some(rest) = url.strip_prefix("s3://") {
            Self::parse_s3(rest, credentials, "s3")
        } else if let Some(rest) = url.strip_prefix("s3a://") {
            Self::parse_s3(rest, credentials, "s3")
        } else if let Some(rest) = url.strip_prefix("r2://") {
            Self::parse_s3(rest, credentials, "r2")
        } else if let Some(rest) = url.strip_prefix("gs://") {
            Self::parse_gcs(rest)
        } else if let Some(rest) = url.strip_prefix("az://") {
            Self::parse_azure(rest)
        } else {
            Self::parse_local(url, mode)
        }
    }

    /// Parse S3 or R2 URL (without scheme)
    fn parse_s3(without_scheme: &str, credentials: &Credentials, scheme: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket(without_scheme);
        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in {scheme} URL")));
        }

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        if let (Some(key), Some(secret)) = (
            credentials.access_key_id.as_deref(),
            credentials.secret_access_key.as_deref(),
        ) {
            builder = builder
                .with_access_key_id(key)
                .with_secret_access_key(secret);
        }
        if let Some(region) = credentials.region.as_deref() {
            builder = builder.with_region(region);
        }

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        let endpoint = credentials.endpoint.clone().or_else(|| {
            if scheme == "r2" {
                std::env::var("R2_ENDPOINT_URL").ok()
            } else {
                None
            }
        });
        if let Some(endpoint) = endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::from(prefix),
            scheme: scheme.to_string(),
        })
    }

    /// Parse GCS URL (without scheme)
    fn parse_gcs(without_scheme: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket(without_scheme);

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::from(prefix),
            scheme: "gs".to_string(),
        })
    }

    /// Parse Azure Blob URL (without scheme)
    fn parse_azure(without_scheme: &str) -> Result<Self> {
        let (container, prefix) = split_bucket(without_scheme);

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::from(prefix),
            scheme: "az".to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str, mode: LocalMode) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        match mode {
            LocalMode::Create => std::fs::create_dir_all(path)
                .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?,
            LocalMode::Open => {
                if !std::path::Path::new(path).is_dir() {
                    return Err(Error::FileNotFound {
                        path: path.to_string(),
                    });
                }
            }
        }

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::default(),
            scheme: "file".to_string(),
        })
    }

    /// Get the scheme (s3, r2, gs, az, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Resolve path segments below the root prefix
    ///
    /// Each segment is encoded on its own, so a `/` inside a segment never
    /// creates a directory level.
    pub fn path<S: AsRef<str>>(&self, segments: &[S]) -> ObjectPath {
        segments
            .iter()
            .fold(self.prefix.clone(), |path, segment| path.child(segment.as_ref()))
    }

    /// Path of `full` relative to the root prefix, if it lies below it
    pub fn relative(&self, full: &ObjectPath) -> Option<String> {
        full.prefix_match(&self.prefix).map(|parts| {
            parts
                .map(|part| part.as_ref().to_string())
                .collect::<Vec<_>>()
                .join("/")
        })
    }

    /// Human-readable URL for logging
    pub fn display(&self, path: &ObjectPath) -> String {
        format!("{}://{path}", self.scheme)
    }

    /// List every object below `path`, ordered by location
    pub async fn list(&self, path: &ObjectPath) -> Result<Vec<ObjectMeta>> {
        let mut objects: Vec<ObjectMeta> = self.store.list(Some(path)).try_collect().await?;
        objects.sort_by(|a, b| a.location.cmp(&b.location));
        Ok(objects)
    }

    /// Read an object fully
    pub async fn get(&self, path: &ObjectPath) -> Result<Bytes> {
        let result = self
            .store
            .get(path)
            .await
            .map_err(|e| Error::storage(format!("Failed to read {}: {e}", self.display(path))))?;
        Ok(result.bytes().await?)
    }

    /// Write bytes to an object, replacing any previous content
    pub async fn put(&self, path: &ObjectPath, data: Bytes) -> Result<String> {
        self.store
            .put(path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {}: {e}", self.display(path))))?;

        Ok(self.display(path))
    }

    /// Delete every object below `path`, returning how many were removed
    pub async fn delete_all(&self, path: &ObjectPath) -> Result<usize> {
        let objects = self.list(path).await?;
        for meta in &objects {
            self.store.delete(&meta.location).await.map_err(|e| {
                Error::storage(format!(
                    "Failed to delete {}: {e}",
                    self.display(&meta.location)
                ))
            })?;
        }
        Ok(objects.len())
    }
}

/// Split `bucket/some/prefix/` into `("bucket", "some/prefix/")`
fn split_bucket(without_scheme: &str) -> (&str, &str) {
    match without_scheme.find('/') {
        Some(idx) => (&without_scheme[..idx], &without_scheme[idx + 1..]),
        None => (without_scheme, ""),
    }
}
