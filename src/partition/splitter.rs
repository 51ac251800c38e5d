//! Batch splitting and partition column restoration

use super::types::{PartitionKey, PartitionValue, PartitionedBatch};
use crate::error::{Error, Result};
use arrow::array::{Array, ArrayRef, Int32Array, Int64Array, StringArray, UInt32Array};
use arrow::compute::take;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Split `batch` by the values of `columns`, in column order
///
/// Partitions come back ordered by key and each keeps the input row order.
/// The partition columns are removed from the returned batches. Without
/// partition columns the whole batch is returned under an empty key.
pub fn split_by_partition(batch: &RecordBatch, columns: &[&str]) -> Result<Vec<PartitionedBatch>> {
    if columns.is_empty() {
        return Ok(vec![PartitionedBatch {
            key: PartitionKey::default(),
            batch: batch.clone(),
        }]);
    }

    let schema = batch.schema();
    let partition_indices = columns
        .iter()
        .map(|column| {
            schema.index_of(column).map_err(|_| {
                Error::output(format!("Partition column '{column}' is not in the schema"))
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    let kept: Vec<usize> = (0..schema.fields().len())
        .filter(|i| !partition_indices.contains(i))
        .collect();
    let kept_schema: SchemaRef = Arc::new(Schema::new(
        kept.iter()
            .map(|&i| schema.field(i).clone())
            .collect::<Vec<Field>>(),
    ));

    let mut groups: BTreeMap<Vec<Option<String>>, Vec<u32>> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let key = partition_indices
            .iter()
            .map(|&i| render_value(batch.column(i), row))
            .collect::<Result<Vec<_>>>()?;
        groups.entry(key).or_default().push(row as u32);
    }

    groups
        .into_iter()
        .map(|(values, rows)| -> Result<PartitionedBatch> {
            let indices = UInt32Array::from(rows);
            let arrays = kept
                .iter()
                .map(|&i| take(batch.column(i).as_ref(), &indices, None))
                .collect::<std::result::Result<Vec<ArrayRef>, _>>()?;
            let key = PartitionKey::new(
                columns
                    .iter()
                    .zip(values)
                    .map(|(column, value)| PartitionValue::new(*column, value))
                    .collect(),
            );
            Ok(PartitionedBatch {
                key,
                batch: RecordBatch::try_new(kept_schema.clone(), arrays)?,
            })
        })
        .collect()
}

fn render_value(array: &ArrayRef, row: usize) -> Result<Option<String>> {
    if array.is_null(row) {
        return Ok(None);
    }
    Ok(Some(array_value_to_string(array, row)?))
}

/// Rebuild a batch with the full table `schema` from a partition file
///
/// Columns missing from `batch` are filled from `key` as constants, parsed
/// into the schema's type.
pub fn restore_partition_columns(
    batch: &RecordBatch,
    schema: &SchemaRef,
    key: &PartitionKey,
) -> Result<RecordBatch> {
    let num_rows = batch.num_rows();
    let batch_schema = batch.schema();

    let columns = schema
        .fields()
        .iter()
        .map(|field| -> Result<ArrayRef> {
            if let Ok(index) = batch_schema.index_of(field.name()) {
                return Ok(batch.column(index).clone());
            }
            let value = key.get(field.name()).ok_or_else(|| {
                Error::output(format!(
                    "Column '{}' is neither in the file nor in its partition path",
                    field.name()
                ))
            })?;
            constant_array(field, value.value.as_deref(), num_rows)
        })
        .collect::<Result<Vec<ArrayRef>>>()?;

    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}

fn constant_array(field: &Field, value: Option<&str>, len: usize) -> Result<ArrayRef> {
    let invalid = |raw: &str| {
        Error::output(format!(
            "Partition value '{raw}' is not a valid {} for column '{}'",
            field.data_type(),
            field.name()
        ))
    };

    let array: ArrayRef = match field.data_type() {
        DataType::Utf8 => Arc::new(StringArray::from(vec![value; len])),
        DataType::Int32 => {
            let parsed = value
                .map(|raw| raw.parse::<i32>().map_err(|_| invalid(raw)))
                .transpose()?;
            Arc::new(Int32Array::from(vec![parsed; len]))
        }
        DataType::Int64 => {
            let parsed = value
                .map(|raw| raw.parse::<i64>().map_err(|_| invalid(raw)))
                .transpose()?;
            Arc::new(Int64Array::from(vec![parsed; len]))
        }
        other => {
            return Err(Error::output(format!(
                "Unsupported partition column type {other} for '{}'",
                field.name()
            )))
        }
    };
    Ok(array)
}
