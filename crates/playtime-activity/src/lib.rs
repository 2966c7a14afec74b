//! # playtime-activity
//!
//! Player session durations derived from game server logs.
//!
//! Log files are scanned for join and disconnect lines, each file is reduced
//! to per-player connected seconds, and the per-file results are summed into
//! one mapping.
//!
//! ## Key Types
//!
//! - [`Extractor`] - Turns log lines into [`PlayerEvent`]s
//! - [`Log`] - Events and end timestamp of one file
//! - [`PlayerDurations`] - Player to connected seconds
//! - [`ActivityStore`] - Batch scan over a directory tree

pub mod aggregate;
pub mod discovery;
pub mod error;
pub mod parser;
pub mod store;
pub mod types;

pub use aggregate::{compute_log_durations, compute_total_durations};
pub use discovery::{discover_log_files, discover_log_files_with_extension, filter_log_files};
pub use error::ActivityError;
pub use parser::{parse_log, parse_player, parse_timestamp, Extractor};
pub use store::{ActivityConfig, ActivityStore};
pub use types::{ErrorPolicy, EventKind, EventMarkers, Log, PlayerDurations, PlayerEvent};
