use colored::Colorize;
use serde::Serialize;

use playtime_activity::PlayerDurations;

/// One player's line in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub player: String,
    pub time: String,
    pub seconds: f64,
    pub below_threshold: bool,
}

/// Per-invocation presentation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub threshold_hours: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            threshold_hours: DEFAULT_THRESHOLD_HOURS,
        }
    }
}

pub const DEFAULT_THRESHOLD_HOURS: f64 = 8.0;

/// Rows ordered from least to most time played.
pub fn build_report(durations: PlayerDurations, options: ReportOptions) -> Vec<ReportRow> {
    let threshold_secs = options.threshold_hours * 3600.0;

    durations
        .into_sorted_by_duration()
        .into_iter()
        .map(|(player, seconds)| ReportRow {
            time: format_duration(seconds),
            below_threshold: seconds < threshold_secs,
            player,
            seconds,
        })
        .collect()
}

/// Render whole seconds as e.g. `2 hours, 1 minute, 5 seconds`.
///
/// Zero components are left out, except that an all-zero duration still
/// prints `0 seconds`.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(plural(minutes, "minute"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(plural(seconds, "second"));
    }

    parts.join(", ")
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

pub fn print_report_table(rows: &[ReportRow], options: ReportOptions) {
    println!(
        "{:<24} {:<36} {}",
        "PLAYER".dimmed(),
        "TIME PLAYED".dimmed(),
        "SECONDS".dimmed(),
    );

    for row in rows {
        let time = if row.below_threshold {
            row.time.bright_yellow().to_string()
        } else {
            row.time.bright_green().to_string()
        };
        println!("{:<24} {:<36} {:.0}", row.player, time, row.seconds);
    }

    let below = rows.iter().filter(|r| r.below_threshold).count();
    println!();
    println!(
        "{}  {} players, {} under {} hours",
        "Total:".dimmed(),
        rows.len(),
        below,
        options.threshold_hours
    );
}
