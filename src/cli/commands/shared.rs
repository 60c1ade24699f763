//! Shared components for CLI commands
//!
//! This module contains the run report type, logging setup, configuration
//! loading, and input/output helpers used by every command.

use crate::app::services::event_processor::RunStats;
use crate::cli::args::{ProcessArgs, is_stdio};
use crate::config::ProcessorConfig;
use crate::constants::{LOG_TARGET, PROGRESS_TICK_MS};
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, BufWriter};
use tracing::{debug, info};

/// Boxed input source for a command
pub type InputReader = Box<dyn AsyncBufRead + Unpin + Send>;

/// Boxed output sink for a command
pub type OutputWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// Outcome of a processing run, for reporting across commands
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Processor counters
    pub stats: RunStats,
    /// Records written to the sink
    pub records_written: usize,
    /// True when the run stopped at the output record limit
    pub stopped_at_limit: bool,
    /// Total processing time
    #[serde(with = "duration_millis")]
    pub processing_time: Duration,
}

impl RunReport {
    /// Events consumed per second of processing time
    pub fn events_per_second(&self) -> f64 {
        let seconds = self.processing_time.as_secs_f64();
        if seconds == 0.0 {
            0.0
        } else {
            self.stats.events_consumed as f64 / seconds
        }
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

/// Set up structured logging on stderr so stdout carries only records
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    // A subscriber installed earlier in the process keeps priority
    if result.is_err() {
        debug!("Logging already initialized");
    } else {
        debug!("Logging initialized at level: {}", log_level);
    }
    Ok(())
}

/// Load configuration using layered approach (file -> args)
pub fn load_configuration(args: &ProcessArgs) -> Result<ProcessorConfig> {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No config file given, using defaults"),
    }

    let config = ProcessorConfig::load(args.config_file.as_deref())?;

    // Apply CLI argument overrides
    let config = args.apply_overrides(config);

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Open an input file, or standard input for "-"
pub async fn open_input(path: &Path) -> Result<InputReader> {
    if is_stdio(path) {
        debug!("Reading events from stdin");
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let file = File::open(path)
        .await
        .map_err(|e| Error::io(format!("Failed to open input file {}", path.display()), e))?;
    debug!("Reading events from {}", path.display());
    Ok(Box::new(BufReader::new(file)))
}

/// Create an output file, or use standard output for "-"
pub async fn open_output(path: &Path) -> Result<OutputWriter> {
    if is_stdio(path) {
        return Ok(Box::new(BufWriter::new(tokio::io::stdout())));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            Error::io(
                format!("Failed to create output directory {}", parent.display()),
                e,
            )
        })?;
    }

    let file = File::create(path)
        .await
        .map_err(|e| Error::io(format!("Failed to create output file {}", path.display()), e))?;
    debug!("Writing records to {}", path.display());
    Ok(Box::new(BufWriter::new(file)))
}

/// Create a spinner for streams of unknown length
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

    #[test]
    fn test_run_report_default() {
        let report = RunReport::default();
        assert_eq!(report.records_written, 0);
        assert!(!report.stopped_at_limit);
        assert_eq!(report.events_per_second(), 0.0);
    }

    #[test]
    fn test_events_per_second() {
        let report = RunReport {
            stats: RunStats {
                events_consumed: 500,
                ..Default::default()
            },
            processing_time: Duration::from_millis(250),
            ..Default::default()
        };
        assert_eq!(report.events_per_second(), 2000.0);
    }

    #[test]
    fn test_run_report_serializes_millis() {
        let report = RunReport {
            records_written: 2,
            processing_time: Duration::from_millis(1500),
            ..Default::default()
        };
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["processing_time"], serde_json::json!(1500));
        assert_eq!(value["records_written"], serde_json::json!(2));
        assert_eq!(value["stats"]["samples"], serde_json::json!(0));
    }

    #[test]
    fn test_load_configuration_layers_args_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"max_output_records": 9, "flush_each_record": false}"#)
            .unwrap();

        let args = ProcessArgs {
            input_path: PathBuf::from("-"),
            output_path: PathBuf::from("-"),
            pretty: true,
            limit: Some(3),
            buffered: false,
            strict_lines: false,
            config_file: Some(config_path),
            verbose: 0,
            quiet: false,
        };
        let config = load_configuration(&args).unwrap();

        assert_eq!(config.max_output_records, Some(3));
        assert!(!config.flush_each_record);
        assert_eq!(config.output_style, crate::config::OutputStyle::Pretty);
    }

    #[tokio::test]
    async fn test_open_output_creates_parent_and_input_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.ndjson");

        let mut writer = open_output(&path).await.unwrap();
        writer.write_all(b"{\"a\":1}\n").await.unwrap();
        writer.flush().await.unwrap();
        drop(writer);

        let reader = open_input(&path).await.unwrap();
        let mut lines = reader.lines();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "{\"a\":1}");
        assert!(lines.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let result = open_input(&temp_dir.path().join("missing.ndjson")).await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
