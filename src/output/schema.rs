//! Arrow schemas of the star schema tables
//!
//! Converts table rows to Arrow RecordBatches and back.

use crate::error::{Error, Result};
use crate::transform::timestamp_from_millis;
use crate::types::{ArtistRow, SongRow, SongplayRow, Table, TimeRow, UserRow};
use arrow::array::{
    Array, ArrayRef, Float64Array, Int32Array, Int64Array, StringArray,
    TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

const UTC: &str = "UTC";

// ============================================================================
// Schema Definitions
// ============================================================================

fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Millisecond, Some(UTC.into()))
}

fn songs_schema() -> Schema {
    Schema::new(vec![
        Field::new("song_id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("artist_name", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("duration", DataType::Float64, false),
    ])
}

fn artists_schema() -> Schema {
    Schema::new(vec![
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("location", DataType::Utf8, true),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
    ])
}

fn users_schema() -> Schema {
    Schema::new(vec![
        Field::new("user_id", DataType::Utf8, false),
        Field::new("first_name", DataType::Utf8, true),
        Field::new("last_name", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
    ])
}

fn time_schema() -> Schema {
    Schema::new(vec![
        Field::new("start_time", timestamp_type(), false),
        Field::new("hour", DataType::Int32, false),
        Field::new("day", DataType::Int32, false),
        Field::new("week", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("year", DataType::Int32, false),
        Field::new("weekday", DataType::Int32, false),
    ])
}

fn songplays_schema() -> Schema {
    Schema::new(vec![
        Field::new("songplay_id", DataType::Int64, false),
        Field::new("start_time", timestamp_type(), false),
        Field::new("user_id", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
        Field::new("song_id", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("session_id", DataType::Int64, false),
        Field::new("location", DataType::Utf8, true),
        Field::new("user_agent", DataType::Utf8, true),
        Field::new("year", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
    ])
}

/// Full schema of a table, partition columns included
pub fn table_schema(table: Table) -> SchemaRef {
    Arc::new(match table {
        Table::Songs => songs_schema(),
        Table::Artists => artists_schema(),
        Table::Users => users_schema(),
        Table::Time => time_schema(),
        Table::Songplays => songplays_schema(),
    })
}

// ============================================================================
// Rows -> RecordBatch
// ============================================================================

fn batch(table: Table, columns: Vec<ArrayRef>) -> Result<RecordBatch> {
    RecordBatch::try_new(table_schema(table), columns).map_err(|e| Error::Output {
        message: format!("Failed to create {table} RecordBatch: {e}"),
    })
}

fn timestamps(values: Vec<i64>) -> ArrayRef {
    Arc::new(TimestampMillisecondArray::from(values).with_timezone(UTC))
}

/// Build the `songs` batch
pub fn songs_to_batch(rows: &[SongRow]) -> Result<RecordBatch> {
    batch(
        Table::Songs,
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.song_id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.title))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.artist_id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.artist_name))),
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.duration))),
        ],
    )
}

/// Build the `artists` batch
pub fn artists_to_batch(rows: &[ArtistRow]) -> Result<RecordBatch> {
    batch(
        Table::Artists,
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.artist_id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.name))),
            Arc::new(rows.iter().map(|r| r.location.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.latitude).collect::<Float64Array>()),
            Arc::new(rows.iter().map(|r| r.longitude).collect::<Float64Array>()),
        ],
    )
}

/// Build the `users` batch
pub fn users_to_batch(rows: &[UserRow]) -> Result<RecordBatch> {
    batch(
        Table::Users,
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.user_id))),
            Arc::new(rows.iter().map(|r| r.first_name.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.last_name.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.gender.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.level.as_deref()).collect::<StringArray>()),
        ],
    )
}

/// Build the `time` batch
pub fn time_to_batch(rows: &[TimeRow]) -> Result<RecordBatch> {
    let int = |f: fn(&TimeRow) -> i32| -> ArrayRef {
        Arc::new(Int32Array::from_iter_values(rows.iter().map(f)))
    };
    batch(
        Table::Time,
        vec![
            timestamps(rows.iter().map(|r| r.start_time.timestamp_millis()).collect()),
            int(|r| r.hour),
            int(|r| r.day),
            int(|r| r.week),
            int(|r| r.month),
            int(|r| r.year),
            int(|r| r.weekday),
        ],
    )
}

/// Build the `songplays` batch
pub fn songplays_to_batch(rows: &[SongplayRow]) -> Result<RecordBatch> {
    batch(
        Table::Songplays,
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.songplay_id))),
            timestamps(rows.iter().map(|r| r.start_time.timestamp_millis()).collect()),
            Arc::new(rows.iter().map(|r| r.user_id.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.level.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.song_id.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.artist_id.as_deref()).collect::<StringArray>()),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.session_id))),
            Arc::new(rows.iter().map(|r| r.location.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.user_agent.as_deref()).collect::<StringArray>()),
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.month))),
        ],
    )
}

// ============================================================================
// RecordBatch -> Rows
// ============================================================================

/// Downcast a named column
fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    let index = batch
        .schema()
        .index_of(name)
        .map_err(|_| Error::output(format!("Missing column '{name}'")))?;
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::output(format!("Column '{name}' has an unexpected type")))
}

fn opt_string(array: &StringArray, row: usize) -> Option<String> {
    array.is_valid(row).then(|| array.value(row).to_string())
}

fn opt_f64(array: &Float64Array, row: usize) -> Option<f64> {
    array.is_valid(row).then(|| array.value(row))
}

/// Read `songs` rows from a full-schema batch
pub fn songs_from_batch(batch: &RecordBatch) -> Result<Vec<SongRow>> {
    let song_id = column::<StringArray>(batch, "song_id")?;
    let title = column::<StringArray>(batch, "title")?;
    let artist_id = column::<StringArray>(batch, "artist_id")?;
    let artist_name = column::<StringArray>(batch, "artist_name")?;
    let year = column::<Int32Array>(batch, "year")?;
    let duration = column::<Float64Array>(batch, "duration")?;

    Ok((0..batch.num_rows())
        .map(|i| SongRow {
            song_id: song_id.value(i).to_string(),
            title: title.value(i).to_string(),
            artist_id: artist_id.value(i).to_string(),
            artist_name: artist_name.value(i).to_string(),
            year: year.value(i),
            duration: duration.value(i),
        })
        .collect())
}

/// Read `artists` rows from a batch
pub fn artists_from_batch(batch: &RecordBatch) -> Result<Vec<ArtistRow>> {
    let artist_id = column::<StringArray>(batch, "artist_id")?;
    let name = column::<StringArray>(batch, "name")?;
    let location = column::<StringArray>(batch, "location")?;
    let latitude = column::<Float64Array>(batch, "latitude")?;
    let longitude = column::<Float64Array>(batch, "longitude")?;

    Ok((0..batch.num_rows())
        .map(|i| ArtistRow {
            artist_id: artist_id.value(i).to_string(),
            name: name.value(i).to_string(),
            location: opt_string(location, i),
            latitude: opt_f64(latitude, i),
            longitude: opt_f64(longitude, i),
        })
        .collect())
}

/// Read `users` rows from a batch
pub fn users_from_batch(batch: &RecordBatch) -> Result<Vec<UserRow>> {
    let user_id = column::<StringArray>(batch, "user_id")?;
    let first_name = column::<StringArray>(batch, "first_name")?;
    let last_name = column::<StringArray>(batch, "last_name")?;
    let gender = column::<StringArray>(batch, "gender")?;
    let level = column::<StringArray>(batch, "level")?;

    Ok((0..batch.num_rows())
        .map(|i| UserRow {
            user_id: user_id.value(i).to_string(),
            first_name: opt_string(first_name, i),
            last_name: opt_string(last_name, i),
            gender: opt_string(gender, i),
            level: opt_string(level, i),
        })
        .collect())
}

/// Read `time` rows from a full-schema batch
pub fn time_from_batch(batch: &RecordBatch) -> Result<Vec<TimeRow>> {
    let start_time = column::<TimestampMillisecondArray>(batch, "start_time")?;
    let hour = column::<Int32Array>(batch, "hour")?;
    let day = column::<Int32Array>(batch, "day")?;
    let week = column::<Int32Array>(batch, "week")?;
    let month = column::<Int32Array>(batch, "month")?;
    let year = column::<Int32Array>(batch, "year")?;
    let weekday = column::<Int32Array>(batch, "weekday")?;

    (0..batch.num_rows())
        .map(|i| -> Result<TimeRow> {
            Ok(TimeRow {
                start_time: timestamp_from_millis(start_time.value(i))?,
                hour: hour.value(i),
                day: day.value(i),
                week: week.value(i),
                month: month.value(i),
                year: year.value(i),
                weekday: weekday.value(i),
            })
        })
        .collect()
}

/// Read `songplays` rows from a full-schema batch
pub fn songplays_from_batch(batch: &RecordBatch) -> Result<Vec<SongplayRow>> {
    let songplay_id = column::<Int64Array>(batch, "songplay_id")?;
    let start_time = column::<TimestampMillisecondArray>(batch, "start_time")?;
    let user_id = column::<StringArray>(batch, "user_id")?;
    let level = column::<StringArray>(batch, "level")?;
    let song_id = column::<StringArray>(batch, "song_id")?;
    let artist_id = column::<StringArray>(batch, "artist_id")?;
    let session_id = column::<Int64Array>(batch, "session_id")?;
    let location = column::<StringArray>(batch, "location")?;
    let user_agent = column::<StringArray>(batch, "user_agent")?;
    let year = column::<Int32Array>(batch, "year")?;
    let month = column::<Int32Array>(batch, "month")?;

    (0..batch.num_rows())
        .map(|i| -> Result<SongplayRow> {
            Ok(SongplayRow {
                songplay_id: songplay_id.value(i),
                start_time: timestamp_from_millis(start_time.value(i))?,
                user_id: opt_string(user_id, i),
                level: opt_string(level, i),
                song_id: opt_string(song_id, i),
                artist_id: opt_string(artist_id, i),
                session_id: session_id.value(i),
                location: opt_string(location, i),
                user_agent: opt_string(user_agent, i),
                year: year.value(i),
                month: month.value(i),
            })
        })
        .collect()
}
