mod config;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use playtime_activity::{ActivityStore, ErrorPolicy};
use playtime_logging::{init_tracing, LogFormat};

use config::AppConfig;
use report::{build_report, print_report_table, ReportOptions};

#[derive(Parser, Debug)]
#[command(
    name = "playtime",
    about = "Total connected time per player, from game server logs",
    version,
    author
)]
struct Cli {
    /// Log directory to scan (default: db_path from config)
    dir: Option<PathBuf>,

    /// Path to config file (default: ./playtime.toml, then user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flag players with fewer hours than this
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Output rows as JSON
    #[arg(long)]
    json: bool,

    /// Fail on the first unreadable log instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatChoice,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_format.into());

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = AppConfig::resolve(cli.config.as_deref(), &working_dir)?;

    let root = cli
        .dir
        .clone()
        .or_else(|| config.db_path.clone())
        .context("No log directory given. Pass DIR or set db_path in playtime.toml")?;

    if !root.exists() {
        anyhow::bail!("Log directory does not exist: {}", root.display());
    }

    let options = ReportOptions {
        threshold_hours: cli
            .threshold
            .or(config.threshold_hours)
            .unwrap_or(report::DEFAULT_THRESHOLD_HOURS),
    };

    let policy = if cli.strict {
        ErrorPolicy::Abort
    } else {
        ErrorPolicy::Skip
    };

    let store = ActivityStore::new(root, config.activity_config());
    let durations = store
        .total_durations(policy)
        .with_context(|| format!("Failed to scan {}", store.root().display()))?;

    let rows = build_report(durations, options);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("{}", "No player sessions found.".dimmed());
    } else {
        print_report_table(&rows, options);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_choice_maps_each_variant() {
        assert_eq!(LogFormat::from(LogFormatChoice::Pretty), LogFormat::Pretty);
        assert_eq!(LogFormat::from(LogFormatChoice::Json), LogFormat::Json);
        assert_eq!(LogFormat::from(LogFormatChoice::Compact), LogFormat::Compact);
    }

    #[test]
    fn test_cli_parses_log_format_and_defaults() {
        let cli = Cli::try_parse_from(["playtime", "logs", "--log-format", "json"]).unwrap();
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Json);
        assert_eq!(cli.dir, Some(PathBuf::from("logs")));
        assert_eq!(cli.log_level, "warn");
        assert!(!cli.strict);

        assert!(Cli::try_parse_from(["playtime", "--log-format", "xml"]).is_err());
    }
}
