//! Songplays fact table

use super::time::timestamp_from_millis;
use crate::error::Result;
use crate::types::{ArtistRow, EventRecord, SongRow, SongplayRow};
use chrono::Datelike;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Durations are compared in units of 1/`DURATION_SCALE` seconds
///
/// Catalog durations carry five decimal places; two values that round to
/// the same unit are equal.
pub const DURATION_SCALE: f64 = 100_000.0;

/// Integer join key for a duration in seconds
pub fn duration_key(duration: f64) -> i64 {
    (duration * DURATION_SCALE).round() as i64
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MatchKey {
    title: String,
    artist_name: String,
    duration: i64,
}

impl MatchKey {
    fn new(title: &str, artist_name: &str, duration: f64) -> Self {
        Self {
            title: title.to_string(),
            artist_name: artist_name.to_string(),
            duration: duration_key(duration),
        }
    }
}

/// Catalog keys attached to a matched songplay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    pub song_id: String,
    pub artist_id: String,
}

/// Lookup from (title, artist name, duration) to catalog keys
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: HashMap<MatchKey, CatalogMatch>,
}

impl CatalogIndex {
    /// Index the songs dimension joined with artists on `artist_id`
    ///
    /// Each song is keyed under its own `artist_name` and, when it differs,
    /// under the name the artists dimension holds for its `artist_id`. When
    /// several songs share a key the smallest `song_id` wins.
    pub fn build(songs: &[SongRow], artists: &[ArtistRow]) -> Self {
        let names: HashMap<&str, &str> = artists
            .iter()
            .map(|artist| (artist.artist_id.as_str(), artist.name.as_str()))
            .collect();

        let mut entries: HashMap<MatchKey, CatalogMatch> = HashMap::new();
        for song in songs {
            let mut artist_names = vec![song.artist_name.as_str()];
            if let Some(&name) = names.get(song.artist_id.as_str()) {
                if name != song.artist_name {
                    artist_names.push(name);
                }
            }

            for artist_name in artist_names {
                let key = MatchKey::new(&song.title, artist_name, song.duration);
                let candidate = CatalogMatch {
                    song_id: song.song_id.clone(),
                    artist_id: song.artist_id.clone(),
                };

                match entries.entry(key) {
                    Entry::Vacant(entry) => {
                        entry.insert(candidate);
                    }
                    Entry::Occupied(mut entry) => {
                        if candidate.song_id < entry.get().song_id {
                            entry.insert(candidate);
                        }
                    }
                }
            }
        }

        Self { entries }
    }

    /// Find the catalog entry for a played song
    pub fn lookup(&self, title: &str, artist_name: &str, duration: f64) -> Option<&CatalogMatch> {
        self.entries
            .get(&MatchKey::new(title, artist_name, duration))
    }

    /// Number of distinct match keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn match_event(&self, event: &EventRecord) -> Option<&CatalogMatch> {
        match (&event.song, &event.artist, event.length) {
            (Some(title), Some(artist), Some(length)) => self.lookup(title, artist, length),
            _ => None,
        }
    }
}

/// Build the `songplays` fact table
///
/// Exactly one row per `NextSong` event, in input order, with surrogate ids
/// counting from 1. Events without a catalog match keep null song and
/// artist ids.
pub fn compose_songplays(events: &[EventRecord], catalog: &CatalogIndex) -> Result<Vec<SongplayRow>> {
    let mut rows = Vec::new();
    let mut matched = 0usize;

    for event in events.iter().filter(|e| e.is_song_play()) {
        let start_time = timestamp_from_millis(event.ts)?;
        let catalog_match = catalog.match_event(event);
        if catalog_match.is_some() {
            matched += 1;
        }

        rows.push(SongplayRow {
            songplay_id: rows.len() as i64 + 1,
            start_time,
            user_id: Some(event.user_id.clone()).filter(|id| !id.trim().is_empty()),
            level: event.level.clone(),
            song_id: catalog_match.map(|m| m.song_id.clone()),
            artist_id: catalog_match.map(|m| m.artist_id.clone()),
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
            year: start_time.year(),
            month: start_time.month() as i32,
        });
    }

    tracing::debug!(
        "Composed {} songplays, {} matched the catalog",
        rows.len(),
        matched
    );

    Ok(rows)
}
