//! Transformation module
//!
//! Pure functions that turn input records into the star schema.
//!
//! # Overview
//!
//! - [`extract_songs`] / [`extract_artists`] - catalog dimensions
//! - [`extract_users`] - latest attributes per user
//! - [`compose_songplays`] - fact table, matched against a [`CatalogIndex`]
//! - [`derive_time_table`] - calendar parts of every songplay start time
//!
//! All outputs are sorted by their key (or surrogate id), so the same input
//! always produces the same rows.

mod catalog;
mod songplays;
mod time;
mod users;

pub use catalog::{extract_artists, extract_songs};
pub use songplays::{compose_songplays, duration_key, CatalogIndex, CatalogMatch, DURATION_SCALE};
pub use time::{derive_time_row, derive_time_table, timestamp_from_millis};
pub use users::extract_users;

#[cfg(test)]
mod tests;
