//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet table storage.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Arrow schemas for the five star-schema tables
//! - Converting table rows to RecordBatches and back
//! - Encoding and decoding Parquet
//! - Writing (and re-reading) partitioned tables in a storage location

mod schema;
mod store;
mod writer;

pub use schema::{
    artists_from_batch, artists_to_batch, songplays_from_batch, songplays_to_batch,
    songs_from_batch, songs_to_batch, table_schema, time_from_batch, time_to_batch,
    users_from_batch, users_to_batch,
};
pub use store::{TableStore, WrittenTable, PART_FILE, SUCCESS_MARKER};
pub use writer::{decode_batches, encode_batch, ParquetWriter, ParquetWriterConfig};
