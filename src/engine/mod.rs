//! Execution engine module
//!
//! Runs the two phases of a load against a source and a sink.
//!
//! # Overview
//!
//! - [`Pipeline`] - reads the sources, derives the tables and writes them
//! - [`build_catalog`] / [`build_log_tables`] - the pure table derivations
//! - [`RunStats`] - counters reported at the end of a run
//!
//! The song phase writes `songs` and `artists`. The log phase writes
//! `users`, `time` and `songplays`; run on its own it loads the catalog back
//! from the sink.

mod types;

pub use types::{Catalog, LogTables, Phase, RunStats};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::{
    artists_from_batch, artists_to_batch, songplays_to_batch, songs_from_batch, songs_to_batch,
    table_schema, time_to_batch, users_to_batch, ParquetWriterConfig, TableStore,
};
use crate::source::RecordSource;
use crate::storage::StorageLocation;
use crate::transform::{
    compose_songplays, derive_time_table, extract_artists, extract_songs, extract_users,
};
use crate::types::{EventRecord, SongRecord, Table};
use arrow::record_batch::RecordBatch;
use std::time::Instant;

/// Derive the catalog dimensions from song records
pub fn build_catalog(records: &[SongRecord]) -> Catalog {
    Catalog {
        songs: extract_songs(records),
        artists: extract_artists(records),
    }
}

/// Derive the log tables from events, matching song plays against `catalog`
pub fn build_log_tables(events: &[EventRecord], catalog: &Catalog) -> Result<LogTables> {
    let index = catalog.index();
    if index.is_empty() {
        tracing::warn!("Catalog is empty, no songplay will match a song");
    } else {
        tracing::debug!("Catalog index holds {} match keys", index.len());
    }

    let songplays = compose_songplays(events, &index)?;
    let time = derive_time_table(songplays.iter().map(|row| row.start_time));

    Ok(LogTables {
        users: extract_users(events),
        time,
        songplays,
    })
}

/// ETL pipeline from a JSON source to a Parquet sink
pub struct Pipeline {
    config: PipelineConfig,
    source: RecordSource,
    sink: TableStore,
}

impl Pipeline {
    /// Create a pipeline over existing source and sink
    pub fn new(config: PipelineConfig, source: RecordSource, sink: TableStore) -> Self {
        Self {
            config,
            source,
            sink,
        }
    }

    /// Validate `config` and open its source and sink locations
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let source = StorageLocation::open(&config.source.root, &config.credentials)?;
        let sink = StorageLocation::create(&config.sink.root, &config.credentials)?;
        let writer_config = ParquetWriterConfig::from(&config.sink);

        tracing::debug!(
            "Source {} ({}), sink {} ({})",
            config.source.root,
            source.scheme(),
            config.sink.root,
            sink.scheme()
        );

        Ok(Self::new(
            config,
            RecordSource::new(source),
            TableStore::new(sink, writer_config),
        ))
    }

    /// Get the table store
    pub fn sink(&self) -> &TableStore {
        &self.sink
    }

    /// Run both phases
    pub async fn run(&self) -> Result<RunStats> {
        self.run_phase(Phase::All).await
    }

    /// Run the selected phases and report statistics
    pub async fn run_phase(&self, phase: Phase) -> Result<RunStats> {
        let start = Instant::now();
        let mut stats = RunStats::new();

        let catalog = if phase.includes_song_data() {
            Some(self.run_song_data(&mut stats).await?)
        } else {
            None
        };

        if phase.includes_log_data() {
            self.run_log_data(catalog, &mut stats).await?;
        }

        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);

        tracing::info!(
            "Run complete: {} tables, {} files in {}ms",
            stats.tables.len(),
            stats.files_written(),
            stats.duration_ms
        );

        Ok(stats)
    }

    /// Read the song catalog and write `songs` and `artists`
    pub async fn run_song_data(&self, stats: &mut RunStats) -> Result<Catalog> {
        let records = self.source.read_songs(&self.config.source.song_pattern).await?;
        stats.song_records = records.len();

        let catalog = build_catalog(&records);
        tracing::info!(
            "Extracted {} songs and {} artists",
            catalog.songs.len(),
            catalog.artists.len()
        );

        self.write(Table::Songs, &songs_to_batch(&catalog.songs)?, stats)
            .await?;
        self.write(Table::Artists, &artists_to_batch(&catalog.artists)?, stats)
            .await?;

        Ok(catalog)
    }

    /// Read the activity logs and write `users`, `time` and `songplays`
    ///
    /// Without a `catalog` the dimensions are read back from the sink.
    pub async fn run_log_data(&self, catalog: Option<Catalog>, stats: &mut RunStats) -> Result<()> {
        let catalog = match catalog {
            Some(catalog) => catalog,
            None => self.load_catalog().await?,
        };

        let events = self.source.read_events(&self.config.source.log_pattern).await?;
        stats.log_events = events.len();

        let tables = build_log_tables(&events, &catalog)?;
        stats.matched_songplays = tables.matched_songplays();
        tracing::info!(
            "Composed {} songplays ({} matched), {} users, {} time rows",
            tables.songplays.len(),
            stats.matched_songplays,
            tables.users.len(),
            tables.time.len()
        );

        self.write(Table::Users, &users_to_batch(&tables.users)?, stats)
            .await?;
        self.write(Table::Time, &time_to_batch(&tables.time)?, stats)
            .await?;
        self.write(Table::Songplays, &songplays_to_batch(&tables.songplays)?, stats)
            .await?;

        Ok(())
    }

    /// Load `songs` and `artists` from a previous song phase
    pub async fn load_catalog(&self) -> Result<Catalog> {
        let songs = self
            .sink
            .read_table(Table::Songs.name(), &table_schema(Table::Songs))
            .await?;
        let artists = self
            .sink
            .read_table(Table::Artists.name(), &table_schema(Table::Artists))
            .await?;

        let catalog = Catalog {
            songs: songs_from_batch(&songs)?,
            artists: artists_from_batch(&artists)?,
        };
        tracing::info!(
            "Loaded catalog from sink: {} songs, {} artists",
            catalog.songs.len(),
            catalog.artists.len()
        );

        Ok(catalog)
    }

    async fn write(&self, table: Table, batch: &RecordBatch, stats: &mut RunStats) -> Result<()> {
        let written = self
            .sink
            .write_table(table.name(), batch, table.partition_columns())
            .await?;
        stats.add_table(written);
        Ok(())
    }
}
