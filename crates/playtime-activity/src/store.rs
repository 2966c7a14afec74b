use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::aggregate::compute_log_durations;
use crate::discovery::discover_log_files_with_extension;
use crate::error::Result;
use crate::parser::Extractor;
use crate::types::{ErrorPolicy, EventMarkers, Log, PlayerDurations};

/// Settings handed to the store on each construction.
#[derive(Debug, Clone, Default)]
pub struct ActivityConfig {
    pub markers: EventMarkers,
}

/// Read-only view over a directory tree of server logs.
pub struct ActivityStore {
    root: PathBuf,
    extractor: Extractor,
}

impl ActivityStore {
    pub fn new(root: PathBuf, config: ActivityConfig) -> Self {
        Self {
            root,
            extractor: Extractor::new(config.markers),
        }
    }

    /// Create a store with default markers (useful for testing).
    pub fn with_dir(root: PathBuf) -> Self {
        Self::new(root, ActivityConfig::default())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every log file under the root, sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        discover_log_files_with_extension(&self.root, &self.extractor.markers().log_extension)
    }

    /// Parse every discovered log file, in path order.
    ///
    /// Files are parsed in parallel; the result order does not depend on
    /// scheduling.
    pub fn scan(&self, policy: ErrorPolicy) -> Result<Vec<Log>> {
        let logs = self.map_files(policy, |log| log)?;
        tracing::info!(root = %self.root.display(), logs = logs.len(), "Scanned logs");
        Ok(logs)
    }

    /// Total connected seconds per player across every log under the root.
    ///
    /// Each log is reduced to its own durations as soon as it is parsed, so
    /// only one file's events are held per worker.
    pub fn total_durations(&self, policy: ErrorPolicy) -> Result<PlayerDurations> {
        let per_file = self.map_files(policy, |log| compute_log_durations(&log))?;

        let mut total = PlayerDurations::new();
        for durations in &per_file {
            total.merge(durations);
        }

        tracing::info!(
            root = %self.root.display(),
            logs = per_file.len(),
            players = total.len(),
            "Computed durations"
        );
        Ok(total)
    }

    /// Parse each discovered file in parallel and apply `reduce` to it.
    /// Results come back in path order with `policy` applied to failures.
    fn map_files<T, F>(&self, policy: ErrorPolicy, reduce: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(Log) -> T + Sync,
    {
        let files = self.discover()?;

        let results: Vec<(PathBuf, Result<T>)> = files
            .into_par_iter()
            .map(|path| {
                let result = self.extractor.parse_file(&path).map(&reduce);
                (path, result)
            })
            .collect();

        let mut values = Vec::with_capacity(results.len());
        for (path, result) in results {
            match result {
                Ok(value) => values.push(value),
                Err(e) => match policy {
                    ErrorPolicy::Abort => return Err(e),
                    ErrorPolicy::Skip => {
                        tracing::warn!("Skipping log {:?}: {}", path, e);
                    }
                },
            }
        }

        Ok(values)
    }
}
