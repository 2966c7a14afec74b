use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Whether a player arrived or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Join,
    Disconnect,
}

/// A single player state change observed in a log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEvent {
    pub kind: EventKind,
    pub player: String,
    pub timestamp: NaiveDateTime,
}

impl PlayerEvent {
    pub fn join(player: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            kind: EventKind::Join,
            player: player.into(),
            timestamp,
        }
    }

    pub fn disconnect(player: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            kind: EventKind::Disconnect,
            player: player.into(),
            timestamp,
        }
    }
}

/// Events extracted from one log file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub events: Vec<PlayerEvent>,
    /// Timestamp of the file's last line, if it carried one.
    pub end_timestamp: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl Log {
    pub fn new(events: Vec<PlayerEvent>, end_timestamp: Option<NaiveDateTime>) -> Self {
        Self {
            events,
            end_timestamp,
            source: None,
        }
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }
}

/// Connected time per player.
///
/// Totals are kept as whole milliseconds so that summing is exact and
/// independent of order; values are read out as `f64` seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct PlayerDurations(BTreeMap<String, i64>);

fn millis_to_seconds(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

fn seconds_to_millis(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

impl PlayerDurations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `millis` to the player's running total, creating the entry if needed.
    pub fn add_millis(&mut self, player: &str, millis: i64) {
        match self.0.get_mut(player) {
            Some(total) => *total += millis,
            None => {
                self.0.insert(player.to_string(), millis);
            }
        }
    }

    /// Add `seconds`, rounded to the nearest millisecond.
    pub fn add(&mut self, player: &str, seconds: f64) {
        self.add_millis(player, seconds_to_millis(seconds));
    }

    /// Fold another mapping into this one by per-player summation.
    pub fn merge(&mut self, other: &PlayerDurations) {
        for (player, millis) in &other.0 {
            self.add_millis(player, *millis);
        }
    }

    pub fn get(&self, player: &str) -> Option<f64> {
        self.get_millis(player).map(millis_to_seconds)
    }

    pub fn get_millis(&self, player: &str) -> Option<i64> {
        self.0.get(player).copied()
    }

    pub fn contains(&self, player: &str) -> bool {
        self.0.contains_key(player)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in player-name order, yielding seconds.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0
            .iter()
            .map(|(player, millis)| (player.as_str(), millis_to_seconds(*millis)))
    }

    pub fn total_seconds(&self) -> f64 {
        millis_to_seconds(self.0.values().sum())
    }

    /// Rows ordered by ascending duration, ties broken by player name.
    pub fn into_sorted_by_duration(self) -> Vec<(String, f64)> {
        let mut rows: Vec<(String, i64)> = self.0.into_iter().collect();
        rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        rows.into_iter()
            .map(|(player, millis)| (player, millis_to_seconds(millis)))
            .collect()
    }
}

impl From<BTreeMap<String, f64>> for PlayerDurations {
    fn from(seconds: BTreeMap<String, f64>) -> Self {
        seconds.into_iter().collect()
    }
}

impl From<PlayerDurations> for BTreeMap<String, f64> {
    fn from(durations: PlayerDurations) -> Self {
        durations
            .0
            .into_iter()
            .map(|(player, millis)| (player, millis_to_seconds(millis)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PlayerDurations {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut durations = PlayerDurations::new();
        durations.extend(iter);
        durations
    }
}

impl<S: Into<String>> Extend<(S, f64)> for PlayerDurations {
    fn extend<I: IntoIterator<Item = (S, f64)>>(&mut self, iter: I) {
        for (player, seconds) in iter {
            let player: String = player.into();
            self.add(&player, seconds);
        }
    }
}

/// What to do when a single log file cannot be read during a batch scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop and return the first failure (in path order).
    Abort,
    /// Log a warning for the failed file and keep going.
    #[default]
    Skip,
}

/// Literal phrases and sentinels recognized in log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventMarkers {
    pub join: String,
    pub disconnect: String,
    pub unknown_player: String,
    pub log_extension: String,
}

pub const DEFAULT_JOIN_MARKER: &str = "Join succeeded";
pub const DEFAULT_DISCONNECT_MARKER: &str = "Player disconnected";
pub const DEFAULT_UNKNOWN_PLAYER: &str = "Unknown";
pub const DEFAULT_LOG_EXTENSION: &str = "log";

impl Default for EventMarkers {
    fn default() -> Self {
        Self {
            join: DEFAULT_JOIN_MARKER.to_string(),
            disconnect: DEFAULT_DISCONNECT_MARKER.to_string(),
            unknown_player: DEFAULT_UNKNOWN_PLAYER.to_string(),
            log_extension: DEFAULT_LOG_EXTENSION.to_string(),
        }
    }
}
