//! Partition module
//!
//! Splits record batches into Hive-style partitions and restores partition
//! columns when partitioned files are read back.
//!
//! # Overview
//!
//! A partitioned table is stored as one directory level per partition
//! column, e.g. `songplays/year=2018/month=11/part-00000.parquet`. The
//! partition columns live only in the path, not in the files.

mod splitter;
mod types;

pub use splitter::{restore_partition_columns, split_by_partition};
pub use types::{PartitionKey, PartitionValue, PartitionedBatch, HIVE_DEFAULT_PARTITION};

#[cfg(test)]
mod tests;
