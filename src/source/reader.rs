//! JSON-lines record reader

use crate::decode::JsonlDecoder;
use crate::error::{Error, Result};
use crate::storage::{GlobPattern, StorageLocation};
use crate::types::{EventRecord, SongRecord};
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use object_store::path::Path as ObjectPath;
use serde::de::DeserializeOwned;

/// Reads typed records from a storage location
#[derive(Debug, Clone)]
pub struct RecordSource {
    location: StorageLocation,
    decoder: JsonlDecoder,
}

impl RecordSource {
    /// Create a source rooted at `location`
    pub fn new(location: StorageLocation) -> Self {
        Self {
            location,
            decoder: JsonlDecoder::new(),
        }
    }

    /// Get the underlying location
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Resolve a glob to matching object paths, ordered by path
    pub async fn list(&self, pattern: &str) -> Result<Vec<ObjectPath>> {
        let glob = GlobPattern::new(pattern)?;
        let base = self.location.path(glob.literal_prefix());

        let paths: Vec<ObjectPath> = self
            .location
            .list(&base)
            .await?
            .into_iter()
            .map(|meta| meta.location)
            .filter(|path| {
                self.location
                    .relative(path)
                    .is_some_and(|rel| glob.matches(&rel))
            })
            .collect();

        if paths.is_empty() {
            tracing::warn!("No objects match pattern '{}'", glob.as_str());
        } else {
            tracing::debug!("Pattern '{}' matched {} objects", glob.as_str(), paths.len());
        }

        Ok(paths)
    }

    /// Lazily decode records from `paths`, one object at a time
    ///
    /// The first malformed document ends the stream with an error.
    pub fn stream<'a, T>(
        &'a self,
        paths: Vec<ObjectPath>,
    ) -> impl Stream<Item = Result<T>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        stream::iter(paths)
            .then(move |path| async move {
                let body = self.location.get(&path).await?;
                let source = self.location.display(&path);
                self.decoder.decode_bytes::<T>(&source, &body)
            })
            .map_ok(|records| stream::iter(records.into_iter().map(Ok::<T, Error>)))
            .try_flatten()
    }

    /// Read every record matching `pattern`
    pub async fn read_all<T: DeserializeOwned>(&self, pattern: &str) -> Result<Vec<T>> {
        let paths = self.list(pattern).await?;
        let records: Vec<T> = self.stream(paths).try_collect().await?;
        Ok(records)
    }

    /// Read song catalog records
    pub async fn read_songs(&self, pattern: &str) -> Result<Vec<SongRecord>> {
        let records = self.read_all::<SongRecord>(pattern).await?;
        tracing::info!("Read {} song records", records.len());
        Ok(records)
    }

    /// Read activity log records
    pub async fn read_events(&self, pattern: &str) -> Result<Vec<EventRecord>> {
        let records = self.read_all::<EventRecord>(pattern).await?;
        tracing::info!("Read {} log events", records.len());
        Ok(records)
    }
}
