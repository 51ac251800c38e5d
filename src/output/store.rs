//! Table store
//!
//! Writes whole tables under `{root}/{table}/` and reads them back.

use super::writer::{decode_batches, encode_batch, ParquetWriterConfig};
use crate::error::{Error, Result};
use crate::partition::{restore_partition_columns, split_by_partition, PartitionKey};
use crate::storage::StorageLocation;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use serde::Serialize;

/// Name of the data file in every partition directory
pub const PART_FILE: &str = "part-00000.parquet";

/// Marker written after all files of a table
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Result of writing one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WrittenTable {
    /// Table name
    pub table: String,
    /// Rows written across all files
    pub rows: usize,
    /// Full paths of the Parquet files written
    pub files: Vec<String>,
    /// Objects removed from a previous run
    pub replaced: usize,
}

/// Parquet tables stored below a sink location
#[derive(Debug, Clone)]
pub struct TableStore {
    location: StorageLocation,
    config: ParquetWriterConfig,
}

impl TableStore {
    /// Create a store rooted at `location`
    pub fn new(location: StorageLocation, config: ParquetWriterConfig) -> Self {
        Self { location, config }
    }

    /// Get the underlying location
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Replace the table `name` with `batch`, partitioned by `partition_columns`
    ///
    /// Every object already under the table directory is deleted first.
    /// Partitioned tables get one directory per distinct key and none for
    /// an empty batch; unpartitioned tables always get one file.
    pub async fn write_table(
        &self,
        name: &str,
        batch: &RecordBatch,
        partition_columns: &[&str],
    ) -> Result<WrittenTable> {
        let table_path = self.location.path(&[name]);

        let replaced = self.location.delete_all(&table_path).await?;
        if replaced > 0 {
            tracing::debug!(
                "Removed {replaced} objects from {}",
                self.location.display(&table_path)
            );
        }

        let partitions = split_by_partition(batch, partition_columns)?;
        let mut written = WrittenTable {
            table: name.to_string(),
            replaced,
            ..WrittenTable::default()
        };

        for partition in &partitions {
            let mut segments = vec![name.to_string()];
            segments.extend(partition.key.segments());
            segments.push(PART_FILE.to_string());

            let data = encode_batch(&partition.batch, &self.config)?;
            let path = self.location.path(&segments);
            let full_path = self.location.put(&path, data).await?;

            written.rows += partition.batch.num_rows();
            written.files.push(full_path);
        }

        self.location
            .put(&self.location.path(&[name, SUCCESS_MARKER]), Bytes::new())
            .await?;

        tracing::info!(
            "Wrote {} rows to {} ({} files)",
            written.rows,
            self.location.display(&table_path),
            written.files.len()
        );

        Ok(written)
    }

    /// Read the table `name` back as one batch with the full `schema`
    ///
    /// Partition columns are restored from the directory names. A table with
    /// no data files but a success marker reads as empty.
    pub async fn read_table(&self, name: &str, schema: &SchemaRef) -> Result<RecordBatch> {
        let table_path = self.location.path(&[name]);
        let objects = self.location.list(&table_path).await?;

        let completed = objects
            .iter()
            .any(|meta| meta.location.filename() == Some(SUCCESS_MARKER));
        let files: Vec<_> = objects
            .into_iter()
            .filter(|meta| meta.location.as_ref().ends_with(".parquet"))
            .collect();
        if files.is_empty() {
            // A partitioned table written from an empty batch has only the marker
            if completed {
                return Ok(RecordBatch::new_empty(schema.clone()));
            }
            return Err(Error::FileNotFound {
                path: self.location.display(&table_path),
            });
        }

        let mut batches = Vec::new();
        for meta in files {
            let relative = self.location.relative(&meta.location).unwrap_or_default();
            let within_table = relative
                .strip_prefix(name)
                .map(|rest| rest.trim_start_matches('/'))
                .unwrap_or(relative.as_str());
            let key = PartitionKey::from_relative_path(within_table);

            let data = self.location.get(&meta.location).await?;
            for batch in decode_batches(data)? {
                batches.push(restore_partition_columns(&batch, schema, &key)?);
            }
        }

        Ok(concat_batches(schema, &batches)?)
    }
}
