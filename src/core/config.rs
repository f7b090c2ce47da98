use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;

use crate::error::{Result, VizError};

pub const DEFAULT_WAITING_SEC: f64 = 1.0;
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Runtime configuration of one visualizer session
#[derive(Debug, Clone)]
pub struct VisualizerConfig {
    /// Topic given with `-t`; `None` means discover and pick one.
    pub topic: Option<String>,
    /// Bounded wait for topic discovery
    pub waiting: Duration,
    pub source_dir: PathBuf,
    /// Refresh loop tick
    pub tick_interval: Duration,
    pub track_total: bool,
    /// Identifier of this session in logs and the status line
    pub instance_name: String,
    pub log_file: Option<PathBuf>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            topic: None,
            waiting: Duration::from_secs_f64(DEFAULT_WAITING_SEC),
            source_dir: PathBuf::from("."),
            tick_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            track_total: true,
            instance_name: default_instance_name(),
            log_file: None,
        }
    }
}

/// Default session name, stable for the lifetime of the process.
pub fn default_instance_name() -> String {
    format!("processing_time_visualizer_{}", std::process::id())
}

impl VisualizerConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Self::from_matches_with(matches, default_instance_name)
    }

    /// Like [`from_matches`](Self::from_matches); `name_generator` is called
    /// once, only when `--node-name` is absent.
    pub fn from_matches_with<F>(matches: &ArgMatches, name_generator: F) -> Result<Self>
    where
        F: FnOnce() -> String,
    {
        let waiting_sec = matches
            .get_one::<f64>("waiting-sec")
            .copied()
            .unwrap_or(DEFAULT_WAITING_SEC);
        if !waiting_sec.is_finite() || waiting_sec < 0.0 {
            return Err(VizError::config(format!(
                "waiting time must be a non-negative number of seconds, got {}",
                waiting_sec
            )));
        }

        let interval_ms = matches
            .get_one::<u64>("interval-ms")
            .copied()
            .unwrap_or(DEFAULT_INTERVAL_MS);
        if interval_ms == 0 {
            return Err(VizError::config("refresh interval must be at least 1 ms"));
        }

        let instance_name = match matches.get_one::<String>("node-name") {
            Some(name) if !name.trim().is_empty() => name.clone(),
            Some(_) => return Err(VizError::config("node name must not be empty")),
            None => name_generator(),
        };

        Ok(Self {
            topic: matches.get_one::<String>("topic").cloned(),
            waiting: Duration::from_secs_f64(waiting_sec),
            source_dir: matches
                .get_one::<PathBuf>("source-dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
            tick_interval: Duration::from_millis(interval_ms),
            track_total: !matches.get_flag("no-total"),
            instance_name,
            log_file: matches.get_one::<PathBuf>("log-file").cloned(),
        })
    }
}
