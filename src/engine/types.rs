//! Engine types
//!
//! Phase selection, in-memory table sets and run statistics.

use crate::output::WrittenTable;
use crate::transform::CatalogIndex;
use crate::types::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use serde::Serialize;

/// Which part of the pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Song data then log data
    All,
    /// Song catalog only (`songs`, `artists`)
    SongData,
    /// Activity logs only (`users`, `time`, `songplays`)
    LogData,
}

impl Phase {
    /// Whether the song catalog is read
    pub fn includes_song_data(self) -> bool {
        matches!(self, Self::All | Self::SongData)
    }

    /// Whether the activity logs are read
    pub fn includes_log_data(self) -> bool {
        matches!(self, Self::All | Self::LogData)
    }
}

/// The `songs` and `artists` dimensions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub songs: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
}

impl Catalog {
    /// Build the lookup used to match log events
    pub fn index(&self) -> CatalogIndex {
        CatalogIndex::build(&self.songs, &self.artists)
    }
}

/// Tables derived from the activity logs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogTables {
    pub users: Vec<UserRow>,
    pub time: Vec<TimeRow>,
    pub songplays: Vec<SongplayRow>,
}

impl LogTables {
    /// Songplays that matched a catalog entry
    pub fn matched_songplays(&self) -> usize {
        self.songplays.iter().filter(|r| r.song_id.is_some()).count()
    }
}

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Song catalog records read
    pub song_records: usize,
    /// Log events read (all pages)
    pub log_events: usize,
    /// Songplays matched against the catalog
    pub matched_songplays: usize,
    /// Tables written, in write order
    pub tables: Vec<WrittenTable>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a written table
    pub fn add_table(&mut self, table: WrittenTable) {
        self.tables.push(table);
    }

    /// Rows written to `table`, if it was written
    pub fn rows_written(&self, table: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|written| written.table == table)
            .map(|written| written.rows)
    }

    /// Total Parquet files written
    pub fn files_written(&self) -> usize {
        self.tables.iter().map(|written| written.files.len()).sum()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
