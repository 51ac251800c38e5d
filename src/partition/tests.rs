//! Tests for partition module

use super::*;
use arrow::array::{Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn songs_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("song_id", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("artist_id", DataType::Utf8, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec!["S1", "S2", "S3", "S4"])),
            Arc::new(Int32Array::from(vec![2005, 2009, 2005, 2005])),
            Arc::new(StringArray::from(vec![Some("A1"), Some("A2"), Some("A1"), None])),
        ],
    )
    .unwrap()
}

fn song_ids(batch: &RecordBatch) -> Vec<String> {
    let column = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    (0..column.len()).map(|i| column.value(i).to_string()).collect()
}

// ============================================================================
// PartitionValue / PartitionKey Tests
// ============================================================================

#[test]
fn test_partition_value_segment() {
    assert_eq!(
        PartitionValue::new("year", Some("2018".to_string())).segment(),
        "year=2018"
    );
    assert_eq!(
        PartitionValue::new("artist_id", None).segment(),
        format!("artist_id={HIVE_DEFAULT_PARTITION}")
    );
}

#[test]
fn test_parse_segment() {
    let value = PartitionValue::parse_segment("artist_id=AC%2FDC").unwrap();
    assert_eq!(value.column, "artist_id");
    assert_eq!(value.value.as_deref(), Some("AC/DC"));

    let null = PartitionValue::parse_segment("year=__HIVE_DEFAULT_PARTITION__").unwrap();
    assert_eq!(null.value, None);

    assert!(PartitionValue::parse_segment("part-00000.parquet").is_none());
    assert!(PartitionValue::parse_segment("=x").is_none());
}

#[test]
fn test_key_from_relative_path() {
    let key = PartitionKey::from_relative_path("year=2018/month=11/part-00000.parquet");
    assert_eq!(key.segments(), vec!["year=2018", "month=11"]);
    assert_eq!(key.get("month").unwrap().value.as_deref(), Some("11"));

    assert!(PartitionKey::from_relative_path("part-00000.parquet").is_empty());
}

// ============================================================================
// Splitting
// ============================================================================

#[test]
fn test_split_unpartitioned() {
    let batch = songs_batch();
    let parts = split_by_partition(&batch, &[]).unwrap();
    assert_eq!(parts.len(), 1);
    assert!(parts[0].key.is_empty());
    assert_eq!(parts[0].batch.num_rows(), 4);
    assert_eq!(parts[0].batch.num_columns(), 3);
}

#[test]
fn test_split_by_two_columns() {
    let batch = songs_batch();
    let parts = split_by_partition(&batch, &["year", "artist_id"]).unwrap();

    let segments: Vec<Vec<String>> = parts.iter().map(|p| p.key.segments()).collect();
    assert_eq!(
        segments,
        vec![
            vec![
                "year=2005".to_string(),
                format!("artist_id={HIVE_DEFAULT_PARTITION}")
            ],
            vec!["year=2005".to_string(), "artist_id=A1".to_string()],
            vec!["year=2009".to_string(), "artist_id=A2".to_string()],
        ]
    );

    assert_eq!(song_ids(&parts[0].batch), vec!["S4"]);
    assert_eq!(song_ids(&parts[1].batch), vec!["S1", "S3"]);
    for part in &parts {
        assert_eq!(part.batch.num_columns(), 1);
        assert_eq!(part.batch.schema().field(0).name(), "song_id");
    }

    let total: usize = parts.iter().map(|p| p.batch.num_rows()).sum();
    assert_eq!(total, batch.num_rows());
}

#[test]
fn test_split_empty_batch_has_no_partitions() {
    let batch = RecordBatch::new_empty(songs_batch().schema());
    let parts = split_by_partition(&batch, &["year"]).unwrap();
    assert!(parts.is_empty());
}

#[test]
fn test_split_unknown_column() {
    let err = split_by_partition(&songs_batch(), &["month"]).unwrap_err();
    assert!(err.to_string().contains("month"));
}

// ============================================================================
// Restoring
// ============================================================================

#[test]
fn test_restore_round_trips_partitions() {
    let batch = songs_batch();
    let schema = batch.schema();
    let parts = split_by_partition(&batch, &["year", "artist_id"]).unwrap();

    let restored = restore_partition_columns(&parts[0].batch, &schema, &parts[0].key).unwrap();
    assert_eq!(restored.schema(), schema);

    let years = restored
        .column(1)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(years.value(0), 2005);
    assert!(restored.column(2).is_null(0));
}

#[test]
fn test_restore_rejects_bad_value() {
    let batch = songs_batch();
    let schema = batch.schema();
    let parts = split_by_partition(&batch, &["year"]).unwrap();
    let key = PartitionKey::new(vec![PartitionValue::new("year", Some("later".to_string()))]);

    let err = restore_partition_columns(&parts[0].batch, &schema, &key).unwrap_err();
    assert!(err.to_string().contains("later"));
}

#[test]
fn test_restore_missing_column() {
    let batch = songs_batch();
    let schema = batch.schema();
    let parts = split_by_partition(&batch, &["year"]).unwrap();

    let err =
        restore_partition_columns(&parts[0].batch, &schema, &PartitionKey::default()).unwrap_err();
    assert!(err.to_string().contains("year"));
}
