//! Tests for transform module

use super::*;
use crate::error::Error;
use crate::types::{EventRecord, SongRecord, SongplayRow};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use test_case::test_case;

fn song(song_id: &str, title: &str, artist_id: &str, artist_name: &str, duration: f64) -> SongRecord {
    SongRecord {
        song_id: song_id.to_string(),
        title: title.to_string(),
        artist_id: artist_id.to_string(),
        artist_name: artist_name.to_string(),
        artist_location: None,
        artist_latitude: None,
        artist_longitude: None,
        duration,
        year: 2005,
        num_songs: Some(1),
    }
}

fn event(page: &str, user_id: &str, ts: i64) -> EventRecord {
    EventRecord {
        page: page.to_string(),
        ts,
        user_id: user_id.to_string(),
        session_id: 1,
        first_name: Some("Sylvie".to_string()),
        last_name: Some("Cruz".to_string()),
        gender: Some("F".to_string()),
        level: Some("free".to_string()),
        song: None,
        artist: None,
        length: None,
        location: Some("Washington-Arlington-Alexandria, DC-VA-MD-WV".to_string()),
        user_agent: Some("Mozilla/5.0".to_string()),
        auth: Some("Logged In".to_string()),
        method: Some("PUT".to_string()),
        status: Some(200),
        item_in_session: Some(0),
        registration: None,
    }
}

fn play(user_id: &str, ts: i64, song: &str, artist: &str, length: f64) -> EventRecord {
    EventRecord {
        song: Some(song.to_string()),
        artist: Some(artist.to_string()),
        length: Some(length),
        level: Some("paid".to_string()),
        ..event("NextSong", user_id, ts)
    }
}

fn catalog(records: &[SongRecord]) -> CatalogIndex {
    CatalogIndex::build(&extract_songs(records), &extract_artists(records))
}

// ============================================================================
// Song / Artist Extraction
// ============================================================================

#[test]
fn test_extract_songs_projects_columns() {
    let records = vec![song("S1", "Fix You", "A1", "Coldplay", 294.0)];
    let songs = extract_songs(&records);

    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].song_id, "S1");
    assert_eq!(songs[0].title, "Fix You");
    assert_eq!(songs[0].artist_id, "A1");
    assert_eq!(songs[0].artist_name, "Coldplay");
    assert_eq!(songs[0].year, 2005);
    assert_eq!(songs[0].duration, 294.0);
}

#[test]
fn test_extract_songs_dedups_keeping_first() {
    let records = vec![
        song("S2", "Uprising", "A2", "Muse", 305.0),
        song("S1", "Fix You", "A1", "Coldplay", 294.0),
        song("S1", "Fix You (Live)", "A1", "Coldplay", 301.0),
    ];
    let songs = extract_songs(&records);

    let ids: Vec<&str> = songs.iter().map(|s| s.song_id.as_str()).collect();
    assert_eq!(ids, vec!["S1", "S2"]);
    assert_eq!(songs[0].title, "Fix You");
}

#[test]
fn test_extract_artists_renames_and_dedups() {
    let mut first = song("S1", "Fix You", "A1", "Coldplay", 294.0);
    first.artist_location = Some("London, England".to_string());
    first.artist_latitude = Some(51.5);
    first.artist_longitude = Some(-0.12);
    let second = song("S3", "Yellow", "A1", "Coldplay", 266.0);
    let mut third = song("S2", "Uprising", "A2", "Muse", 305.0);
    third.artist_location = Some(String::new());

    let artists = extract_artists(&[first, second, third]);

    assert_eq!(artists.len(), 2);
    assert_eq!(artists[0].artist_id, "A1");
    assert_eq!(artists[0].name, "Coldplay");
    assert_eq!(artists[0].location.as_deref(), Some("London, England"));
    assert_eq!(artists[0].latitude, Some(51.5));
    assert_eq!(artists[0].longitude, Some(-0.12));
    assert_eq!(artists[1].location, None);
}

// ============================================================================
// User Extraction
// ============================================================================

#[test]
fn test_users_latest_level_wins() {
    let mut free = event("NextSong", "10", 1_541_990_000_000);
    free.level = Some("free".to_string());
    let mut paid = event("Home", "10", 1_541_990_100_000);
    paid.level = Some("paid".to_string());

    let users = extract_users(&[free, paid]);
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_id, "10");
    assert_eq!(users[0].level.as_deref(), Some("paid"));
}

#[test]
fn test_users_order_of_input_does_not_hide_latest() {
    let mut paid = event("NextSong", "10", 1_541_990_100_000);
    paid.level = Some("paid".to_string());
    let mut free = event("NextSong", "10", 1_541_990_000_000);
    free.level = Some("free".to_string());

    let users = extract_users(&[paid, free]);
    assert_eq!(users[0].level.as_deref(), Some("paid"));
}

#[test]
fn test_users_tie_later_input_wins() {
    let mut first = event("NextSong", "10", 1_541_990_000_000);
    first.level = Some("free".to_string());
    let mut second = event("NextSong", "10", 1_541_990_000_000);
    second.level = Some("paid".to_string());

    let users = extract_users(&[first, second]);
    assert_eq!(users[0].level.as_deref(), Some("paid"));
}

#[test]
fn test_users_skip_blank_ids() {
    let users = extract_users(&[
        event("Home", "", 1),
        event("Home", "  ", 2),
        event("NextSong", "7", 3),
        event("NextSong", "12", 4),
    ]);

    let ids: Vec<&str> = users.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(ids, vec!["12", "7"]);
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}

// ============================================================================
// Time Derivation
// ============================================================================

#[test_case(1_541_990_000_000, 2, 12, 46, 11, 2018, 1 ; "monday afternoon UTC")]
#[test_case(1_541_894_400_000, 0, 11, 45, 11, 2018, 0 ; "sunday midnight")]
#[test_case(1_543_622_400_000, 0, 1, 48, 12, 2018, 6 ; "saturday first of month")]
#[test_case(1_546_214_400_000, 0, 31, 1, 12, 2018, 1 ; "iso week one of next year")]
#[test_case(1_546_214_399_999, 23, 30, 52, 12, 2018, 0 ; "last sunday of the year")]
fn test_derive_time_row(
    ts: i64,
    hour: i32,
    day: i32,
    week: i32,
    month: i32,
    year: i32,
    weekday: i32,
) {
    let row = derive_time_row(timestamp_from_millis(ts).unwrap());
    assert_eq!(
        (row.hour, row.day, row.week, row.month, row.year, row.weekday),
        (hour, day, week, month, year, weekday)
    );
}

#[test]
fn test_time_table_distinct_and_ranged() {
    let times = [
        1_541_990_000_000,
        1_541_990_000_000,
        1_541_894_400_000,
        1_543_622_400_000,
    ]
    .into_iter()
    .map(|ts| timestamp_from_millis(ts).unwrap());

    let table = derive_time_table(times);
    assert_eq!(table.len(), 3);
    assert!(table.windows(2).all(|w| w[0].start_time < w[1].start_time));
    for row in &table {
        assert!((0..=23).contains(&row.hour));
        assert!((0..=6).contains(&row.weekday));
        assert!((1..=12).contains(&row.month));
    }
}

#[test]
fn test_time_keeps_milliseconds() {
    let start = timestamp_from_millis(1_541_990_000_999).unwrap();
    assert_eq!(start.timestamp_millis(), 1_541_990_000_999);
    assert_eq!(
        start,
        Utc.with_ymd_and_hms(2018, 11, 12, 2, 33, 20).unwrap()
            + chrono::Duration::milliseconds(999)
    );
}

#[test]
fn test_timestamp_out_of_range() {
    let err = timestamp_from_millis(i64::MAX).unwrap_err();
    assert!(matches!(err, Error::InvalidTimestamp { .. }));
}

// ============================================================================
// Catalog Index
// ============================================================================

#[test]
fn test_duration_key_tolerance() {
    assert_eq!(duration_key(218.93179), duration_key(218.931_790_000_1));
    assert_ne!(duration_key(218.93179), duration_key(218.93180));
    assert_eq!(duration_key(294.0), 29_400_000);
}

#[test]
fn test_catalog_tie_smallest_song_id_wins() {
    let index = catalog(&[
        song("S9", "Fix You", "A1", "Coldplay", 294.0),
        song("S3", "Fix You", "A2", "Coldplay", 294.0),
    ]);

    assert_eq!(index.len(), 1);
    let hit = index.lookup("Fix You", "Coldplay", 294.0).unwrap();
    assert_eq!(hit.song_id, "S3");
    assert_eq!(hit.artist_id, "A2");
}

#[test]
fn test_catalog_requires_all_three_fields() {
    let index = catalog(&[song("S1", "Fix You", "A1", "Coldplay", 294.0)]);

    assert!(index.lookup("Fix You", "Coldplay", 294.0).is_some());
    assert!(index.lookup("Fix You", "Muse", 294.0).is_none());
    assert!(index.lookup("Fix You", "Coldplay", 295.0).is_none());
    assert!(index.lookup("fix you", "Coldplay", 294.0).is_none());
}

#[test]
fn test_catalog_matches_each_artist_name_variant() {
    let index = catalog(&[
        song("S1", "Viva la Vida", "A1", "Coldplay", 242.0),
        song("S2", "Princess of China", "A1", "Coldplay featuring Rihanna", 239.0),
    ]);

    let featured = index
        .lookup("Princess of China", "Coldplay featuring Rihanna", 239.0)
        .unwrap();
    assert_eq!(featured.song_id, "S2");
    assert_eq!(featured.artist_id, "A1");

    // The artists dimension keeps the first name seen for A1
    let canonical = index.lookup("Princess of China", "Coldplay", 239.0).unwrap();
    assert_eq!(canonical.song_id, "S2");
    assert_eq!(index.len(), 3);
}

#[test]
fn test_catalog_empty() {
    let index = CatalogIndex::build(&[], &[]);
    assert!(index.is_empty());
}

// ============================================================================
// Songplays
// ============================================================================

#[test]
fn test_songplay_matches_catalog() {
    let index = catalog(&[song("S1", "Fix You", "A1", "Coldplay", 294.0)]);
    let events = vec![play("10", 1_541_990_000_000, "Fix You", "Coldplay", 294.0)];

    let rows = compose_songplays(&events, &index).unwrap();
    assert_eq!(rows.len(), 1);
    let row: &SongplayRow = &rows[0];
    assert_eq!(row.song_id.as_deref(), Some("S1"));
    assert_eq!(row.artist_id.as_deref(), Some("A1"));
    assert_eq!(row.user_id.as_deref(), Some("10"));
    assert_eq!(row.level.as_deref(), Some("paid"));
    assert_eq!(row.year, 2018);
    assert_eq!(row.month, 11);
    assert_eq!(row.start_time.timestamp_millis(), 1_541_990_000_000);
}

#[test]
fn test_songplay_without_match_is_kept() {
    let index = catalog(&[]);
    let events = vec![play("10", 1_541_990_000_000, "Fix You", "Coldplay", 294.0)];

    let rows = compose_songplays(&events, &index).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].song_id, None);
    assert_eq!(rows[0].artist_id, None);
}

#[test]
fn test_songplays_only_next_song_events() {
    let index = catalog(&[song("S1", "Fix You", "A1", "Coldplay", 294.0)]);
    let events = vec![
        event("Home", "10", 1),
        play("10", 1_541_990_000_000, "Fix You", "Coldplay", 294.0),
        event("Logout", "10", 2),
        play("11", 1_541_990_100_000, "Unknown", "Nobody", 1.0),
        event("NextSong", "12", 1_541_990_200_000),
    ];

    let rows = compose_songplays(&events, &index).unwrap();
    let expected = events.iter().filter(|e| e.page == "NextSong").count();
    assert_eq!(rows.len(), expected);

    let ids: Vec<i64> = rows.iter().map(|r| r.songplay_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_songplay_blank_user_becomes_null() {
    let index = catalog(&[]);
    let events = vec![play("", 1_541_990_000_000, "Fix You", "Coldplay", 294.0)];

    let rows = compose_songplays(&events, &index).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, None);
    assert!(extract_users(&events).is_empty());
}

#[test]
fn test_songplay_invalid_timestamp_fails() {
    let index = catalog(&[]);
    let events = vec![play("10", i64::MIN, "Fix You", "Coldplay", 294.0)];

    let err = compose_songplays(&events, &index).unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn test_time_table_from_songplays() {
    let index = catalog(&[]);
    let events = vec![
        play("10", 1_541_990_000_000, "A", "B", 1.0),
        play("11", 1_541_990_000_000, "C", "D", 2.0),
        event("Home", "10", 1_400_000_000_000),
    ];

    let rows = compose_songplays(&events, &index).unwrap();
    let time = derive_time_table(rows.iter().map(|r| r.start_time));
    assert_eq!(time.len(), 1);
    assert_eq!(time[0].start_time, rows[0].start_time);
}
