//! Validate command implementation for the weather event processor CLI
//!
//! Runs an event stream through a fresh processor without writing any records,
//! reporting either the run statistics or the first error and where it occurred.

use super::shared::{RunReport, open_input, setup_logging};
use crate::app::services::event_processor::RunStats;
use crate::app::services::event_stream::process_stream;
use crate::app::services::ndjson::read_values;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::{Error, Result};
use colored::*;
use futures::StreamExt;
use serde_json::json;
use std::time::Instant;
use tokio::io::AsyncBufRead;
use tracing::{debug, info};

/// Result of checking an event stream
#[derive(Debug)]
pub struct ValidationReport {
    /// Counters up to the end of input or the first error
    pub stats: RunStats,
    /// First error encountered, if any
    pub error: Option<Error>,
}

impl ValidationReport {
    /// True when the whole stream was processed without error
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// 1-based index of the event that failed, if any
    pub fn failed_event(&self) -> Option<usize> {
        // Unreadable lines never reach the processor's counter
        self.error.as_ref().map(|error| match error {
            Error::InvalidJson { .. } | Error::Io { .. } => self.stats.events_consumed + 1,
            _ => self.stats.events_consumed,
        })
    }

    /// Machine-readable form of the report
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "valid": self.is_valid(),
            "stats": self.stats,
            "error": self.error.as_ref().map(|e| e.to_string()),
            "failed_event": self.failed_event(),
        })
    }
}

/// Validate command runner
pub async fn run_validate(args: ValidateArgs) -> Result<RunReport> {
    let start_time = Instant::now();

    // Set up logging
    setup_logging(args.get_log_level(), false)?;

    info!("Starting event stream validation");
    debug!("Validation arguments: {:?}", args);

    // Validate arguments
    args.validate()?;

    let input = open_input(&args.input_path).await?;
    let report = validate_reader(input, !args.strict_lines).await;

    match args.output_format {
        OutputFormat::Human => print_human_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.to_json())?),
    }

    if let Some(error) = report.error {
        return Err(error);
    }

    Ok(RunReport {
        stats: report.stats,
        records_written: 0,
        stopped_at_limit: false,
        processing_time: start_time.elapsed(),
    })
}

/// Run every event from `reader` through a fresh processor, discarding records
pub async fn validate_reader<R>(reader: R, skip_blank_lines: bool) -> ValidationReport
where
    R: AsyncBufRead + Unpin,
{
    let mut records = process_stream(Box::pin(read_values(reader, skip_blank_lines)));
    let mut error = None;

    while let Some(result) = records.next().await {
        if let Err(e) = result {
            error = Some(e);
            break;
        }
    }

    ValidationReport {
        stats: records.stats().clone(),
        error,
    }
}

fn print_human_report(report: &ValidationReport) {
    let stats = &report.stats;

    match &report.error {
        None => println!("{}", "Event stream is valid".bright_green().bold()),
        Some(error) => {
            println!("{}", "Event stream is invalid".bright_red().bold());
            println!(
                "  {} event {}",
                "Failed at:".bright_cyan(),
                report.failed_event().unwrap_or_default()
            );
            println!("  {} {}", "Error:".bright_cyan(), error);
        }
    }

    println!(
        "  {} {} ({} samples, {} controls)",
        "Events checked:".bright_cyan(),
        stats.events_consumed,
        stats.samples,
        stats.controls()
    );
    println!(
        "  {} {} snapshots, {} resets, {} ignored",
        "Control outcomes:".bright_cyan(),
        stats.snapshots_emitted,
        stats.resets_emitted,
        stats.controls_ignored
    );
}
