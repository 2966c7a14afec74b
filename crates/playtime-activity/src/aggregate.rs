use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::types::{EventKind, Log, PlayerDurations};

/// Milliseconds between two instants, never negative.
fn millis_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_milliseconds().max(0)
}

/// Connected seconds per player within a single log.
///
/// Joins are paired with the next disconnect for the same player. A second
/// join while one is still open replaces it, and the earlier interval earns
/// nothing. Disconnects without an open join are ignored. Players still
/// connected after the last event are credited up to `end_timestamp`; when
/// the log has no end timestamp they receive no additional time.
pub fn compute_log_durations(log: &Log) -> PlayerDurations {
    let mut durations = PlayerDurations::new();
    let mut open_joins: HashMap<&str, NaiveDateTime> = HashMap::new();

    for event in &log.events {
        match event.kind {
            EventKind::Join => {
                open_joins.insert(event.player.as_str(), event.timestamp);
            }
            EventKind::Disconnect => {
                if let Some(joined_at) = open_joins.remove(event.player.as_str()) {
                    durations.add_millis(&event.player, millis_between(joined_at, event.timestamp));
                }
            }
        }
    }

    if open_joins.is_empty() {
        return durations;
    }

    match log.end_timestamp {
        Some(end) => {
            for (player, joined_at) in open_joins {
                durations.add_millis(player, millis_between(joined_at, end));
            }
        }
        None => {
            tracing::warn!(
                source = ?log.source,
                open = open_joins.len(),
                "Log has no end timestamp; open sessions credited with zero time"
            );
            for player in open_joins.into_keys() {
                durations.add_millis(player, 0);
            }
        }
    }

    durations
}

/// Sum per-log durations across every log.
pub fn compute_total_durations<'a, I>(logs: I) -> PlayerDurations
where
    I: IntoIterator<Item = &'a Log>,
{
    let mut total = PlayerDurations::new();
    for log in logs {
        total.merge(&compute_log_durations(log));
    }
    total
}
