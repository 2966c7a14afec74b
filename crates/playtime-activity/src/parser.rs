use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ActivityError, Result};
use crate::types::{EventKind, EventMarkers, Log, PlayerEvent};

lazy_static! {
    /// `[YYYY.MM.DD-HH.MM.SS:mmm]` at the very start of a trimmed line.
    static ref TIMESTAMP_RE: Regex =
        Regex::new(r"^\[(\d{4})\.(\d{2})\.(\d{2})-(\d{2})\.(\d{2})\.(\d{2}):(\d{3})\]")
            .expect("timestamp pattern is valid");
}

/// Parse the bracketed timestamp prefix of a log line.
///
/// Returns `None` when the prefix is missing or names an impossible
/// calendar date or time.
pub fn parse_timestamp(line: &str) -> Option<NaiveDateTime> {
    let caps = TIMESTAMP_RE.captures(line.trim())?;
    let field = |i: usize| caps[i].parse::<u32>().ok();

    let year = caps[1].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?.and_hms_milli_opt(
        field(4)?,
        field(5)?,
        field(6)?,
        field(7)?,
    )
}

/// The player name is the last whitespace-delimited token of the line.
pub fn parse_player(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}

/// Turns log lines into player events.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    markers: EventMarkers,
}

impl Extractor {
    pub fn new(markers: EventMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &EventMarkers {
        &self.markers
    }

    /// Classify a line, or `None` if it carries neither marker.
    pub fn classify(&self, line: &str) -> Option<EventKind> {
        if line.contains(&self.markers.join) {
            Some(EventKind::Join)
        } else if line.contains(&self.markers.disconnect) {
            Some(EventKind::Disconnect)
        } else {
            None
        }
    }

    /// Build the event for a single line, if it is a trackable event line.
    ///
    /// Lines for the unknown-player sentinel and lines without a parseable
    /// timestamp yield `None`.
    pub fn parse_line(&self, line: &str) -> Option<PlayerEvent> {
        let kind = self.classify(line)?;

        let player = parse_player(line)?;
        if player == self.markers.unknown_player {
            return None;
        }

        let Some(timestamp) = parse_timestamp(line) else {
            tracing::debug!(player, "Dropping event line without timestamp");
            return None;
        };

        Some(PlayerEvent {
            kind,
            player: player.to_string(),
            timestamp,
        })
    }

    /// Read every line from `reader` into a [`Log`].
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than failing the read.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> std::io::Result<Log> {
        let mut events = Vec::new();
        let mut last_line: Option<String> = None;

        for chunk in reader.split(b'\n') {
            let line = String::from_utf8_lossy(&chunk?).into_owned();

            if let Some(event) = self.parse_line(&line) {
                events.push(event);
            }

            last_line = Some(line);
        }

        let end_timestamp = last_line.as_deref().and_then(parse_timestamp);

        Ok(Log::new(events, end_timestamp))
    }

    /// Parse a single log file.
    pub fn parse_file(&self, path: &Path) -> Result<Log> {
        let file = File::open(path).map_err(|e| ActivityError::io(path, e))?;
        let log = self
            .parse_reader(BufReader::new(file))
            .map_err(|e| ActivityError::io(path, e))?;

        tracing::debug!(
            path = %path.display(),
            events = log.events.len(),
            has_end = log.end_timestamp.is_some(),
            "Parsed log file"
        );

        Ok(log.with_source(path.to_path_buf()))
    }
}

/// Parse a log file with the default markers.
pub fn parse_log(path: &Path) -> Result<Log> {
    Extractor::default().parse_file(path)
}
