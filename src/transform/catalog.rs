//! Song and artist dimensions

use crate::types::{ArtistRow, SongRecord, SongRow};
use std::collections::BTreeMap;

/// Project catalog records into the `songs` dimension
///
/// A repeated `song_id` keeps the first record seen.
pub fn extract_songs(records: &[SongRecord]) -> Vec<SongRow> {
    let mut songs: BTreeMap<&str, SongRow> = BTreeMap::new();

    for record in records {
        songs
            .entry(record.song_id.as_str())
            .or_insert_with(|| SongRow {
                song_id: record.song_id.clone(),
                title: record.title.clone(),
                artist_id: record.artist_id.clone(),
                artist_name: record.artist_name.clone(),
                year: record.year,
                duration: record.duration,
            });
    }

    songs.into_values().collect()
}

/// Project catalog records into the `artists` dimension
///
/// A repeated `artist_id` keeps the first record seen. Blank locations
/// are stored as null.
pub fn extract_artists(records: &[SongRecord]) -> Vec<ArtistRow> {
    let mut artists: BTreeMap<&str, ArtistRow> = BTreeMap::new();

    for record in records {
        artists
            .entry(record.artist_id.as_str())
            .or_insert_with(|| ArtistRow {
                artist_id: record.artist_id.clone(),
                name: record.artist_name.clone(),
                location: record
                    .artist_location
                    .clone()
                    .filter(|location| !location.trim().is_empty()),
                latitude: record.artist_latitude,
                longitude: record.artist_longitude,
            });
    }

    artists.into_values().collect()
}
