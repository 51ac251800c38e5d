//! Common types used throughout Sparkify Lake
//!
//! Input record shapes (what the JSON sources must look like) and the
//! row types of the five star-schema tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `page` value marking a song-play event in the activity log
pub const SONG_PLAY_PAGE: &str = "NextSong";

// ============================================================================
// Input Records
// ============================================================================

/// One song catalog document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    pub duration: f64,
    pub year: i32,
    pub num_songs: Option<i64>,
}

/// One user-activity log document
///
/// `userId` is an empty string for events of logged-out users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub page: String,
    /// Epoch milliseconds
    pub ts: i64,
    pub user_id: String,
    pub session_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub auth: Option<String>,
    pub method: Option<String>,
    pub status: Option<i64>,
    pub item_in_session: Option<i64>,
    pub registration: Option<f64>,
}

impl EventRecord {
    /// Whether this event is a song play
    pub fn is_song_play(&self) -> bool {
        self.page == SONG_PLAY_PAGE
    }
}

// ============================================================================
// Star Schema Rows
// ============================================================================

/// Row of the `songs` dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: String,
    pub year: i32,
    pub duration: f64,
}

/// Row of the `artists` dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Row of the `users` dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Row of the `time` dimension
///
/// `weekday` counts from Sunday (0) to Saturday (6); `week` is the ISO-8601
/// week number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRow {
    pub start_time: DateTime<Utc>,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub month: i32,
    pub year: i32,
    pub weekday: i32,
}

/// Row of the `songplays` fact table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongplayRow {
    pub songplay_id: i64,
    pub start_time: DateTime<Utc>,
    pub user_id: Option<String>,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub year: i32,
    pub month: i32,
}

// ============================================================================
// Tables
// ============================================================================

/// The five output tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Songs,
    Artists,
    Users,
    Time,
    Songplays,
}

impl Table {
    /// All tables in write order
    pub const ALL: [Table; 5] = [
        Table::Songs,
        Table::Artists,
        Table::Users,
        Table::Time,
        Table::Songplays,
    ];

    /// Directory name under the sink root
    pub fn name(self) -> &'static str {
        match self {
            Table::Songs => "songs",
            Table::Artists => "artists",
            Table::Users => "users",
            Table::Time => "time",
            Table::Songplays => "songplays",
        }
    }

    /// Ordered partition columns; empty for unpartitioned tables
    pub fn partition_columns(self) -> &'static [&'static str] {
        match self {
            Table::Songs => &["year", "artist_id"],
            Table::Time | Table::Songplays => &["year", "month"],
            Table::Artists | Table::Users => &[],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_record_camel_case() {
        let event: EventRecord = serde_json::from_value(json!({
            "artist": "Coldplay",
            "auth": "Logged In",
            "firstName": "Sylvie",
            "gender": "F",
            "itemInSession": 0,
            "lastName": "Cruz",
            "length": 294.0,
            "level": "paid",
            "location": "Washington-Arlington-Alexandria, DC-VA-MD-WV",
            "method": "PUT",
            "page": "NextSong",
            "registration": 1540266185796.0,
            "sessionId": 345,
            "song": "Fix You",
            "status": 200,
            "ts": 1541990000000_i64,
            "userAgent": "Mozilla/5.0",
            "userId": "10"
        }))
        .unwrap();

        assert_eq!(event.user_id, "10");
        assert_eq!(event.session_id, 345);
        assert_eq!(event.first_name.as_deref(), Some("Sylvie"));
        assert!(event.is_song_play());
    }

    #[test]
    fn test_event_record_nullable_fields() {
        let event: EventRecord = serde_json::from_value(json!({
            "artist": null,
            "page": "Home",
            "sessionId": 7,
            "song": null,
            "length": null,
            "ts": 1541990000000_i64,
            "userId": ""
        }))
        .unwrap();

        assert!(event.song.is_none());
        assert!(event.length.is_none());
        assert!(!event.is_song_play());
    }

    #[test]
    fn test_event_record_rejects_wrong_types() {
        let result = serde_json::from_value::<EventRecord>(json!({
            "page": "NextSong",
            "sessionId": 7,
            "ts": "yesterday",
            "userId": "10"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_song_record_requires_song_id() {
        let result = serde_json::from_value::<SongRecord>(json!({
            "title": "Fix You",
            "artist_id": "A1",
            "artist_name": "Coldplay",
            "duration": 294.0,
            "year": 2005
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_table_partition_columns() {
        assert_eq!(Table::Songs.partition_columns(), &["year", "artist_id"]);
        assert_eq!(Table::Songplays.partition_columns(), &["year", "month"]);
        assert_eq!(Table::Time.partition_columns(), &["year", "month"]);
        assert!(Table::Users.partition_columns().is_empty());
        assert!(Table::Artists.partition_columns().is_empty());
        assert_eq!(Table::Songplays.to_string(), "songplays");
    }
}
