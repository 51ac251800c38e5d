//! Partition types

use arrow::record_batch::RecordBatch;

/// Directory value used for null partition values
pub const HIVE_DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// One `column=value` directory level
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionValue {
    /// Partition column name
    pub column: String,
    /// Rendered value, `None` for null
    pub value: Option<String>,
}

impl PartitionValue {
    /// Create a partition value
    pub fn new(column: impl Into<String>, value: Option<String>) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }

    /// Directory segment for this value (unencoded)
    pub fn segment(&self) -> String {
        format!(
            "{}={}",
            self.column,
            self.value.as_deref().unwrap_or(HIVE_DEFAULT_PARTITION)
        )
    }

    /// Parse a `column=value` segment as stored in an object path
    ///
    /// Percent-encoded characters are decoded.
    pub fn parse_segment(segment: &str) -> Option<Self> {
        let decoded = urlencoding::decode(segment).ok()?;
        let (column, value) = decoded.split_once('=')?;
        if column.is_empty() {
            return None;
        }
        let value = (value != HIVE_DEFAULT_PARTITION).then(|| value.to_string());
        Some(Self::new(column, value))
    }
}

/// The ordered partition values of one directory
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionKey {
    values: Vec<PartitionValue>,
}

impl PartitionKey {
    /// Create a key from ordered values
    pub fn new(values: Vec<PartitionValue>) -> Self {
        Self { values }
    }

    /// Read the key from the directory part of a table-relative path
    ///
    /// `year=2018/month=11/part-00000.parquet` yields `year`, `month`.
    pub fn from_relative_path(path: &str) -> Self {
        let mut segments: Vec<&str> = path.split('/').collect();
        segments.pop();
        Self::new(
            segments
                .into_iter()
                .filter_map(PartitionValue::parse_segment)
                .collect(),
        )
    }

    /// Look up the value for a column
    pub fn get(&self, column: &str) -> Option<&PartitionValue> {
        self.values.iter().find(|v| v.column == column)
    }

    /// Directory segments, one per value
    pub fn segments(&self) -> Vec<String> {
        self.values.iter().map(PartitionValue::segment).collect()
    }

    /// Whether this is the key of an unpartitioned table
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rows of one partition, without the partition columns
#[derive(Debug, Clone)]
pub struct PartitionedBatch {
    pub key: PartitionKey,
    pub batch: RecordBatch,
}
