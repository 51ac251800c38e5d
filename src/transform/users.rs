//! User dimension

use crate::types::{EventRecord, UserRow};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Latest known attributes of every signed-in user
///
/// The event with the greatest `ts` wins; on a tie the later event in input
/// order wins. Events without a user id are ignored.
pub fn extract_users(events: &[EventRecord]) -> Vec<UserRow> {
    let mut latest: BTreeMap<&str, &EventRecord> = BTreeMap::new();

    for event in events.iter().filter(|e| !e.user_id.trim().is_empty()) {
        match latest.entry(event.user_id.as_str()) {
            Entry::Vacant(entry) => {
                entry.insert(event);
            }
            Entry::Occupied(mut entry) => {
                if event.ts >= entry.get().ts {
                    entry.insert(event);
                }
            }
        }
    }

    latest
        .into_iter()
        .map(|(user_id, event)| UserRow {
            user_id: user_id.to_string(),
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            gender: event.gender.clone(),
            level: event.level.clone(),
        })
        .collect()
}
