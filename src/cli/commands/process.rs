//! Process command implementation for the weather event processor CLI
//!
//! This module contains the streaming workflow: configuration loading, reading
//! NDJSON events, driving the processor, writing records, and reporting.

use super::shared::{
    RunReport, create_spinner, load_configuration, open_input, open_output, setup_logging,
};
use crate::app::services::event_stream::process_stream;
use crate::app::services::ndjson::{encode_record, read_values};
use crate::cli::args::{ProcessArgs, is_stdio};
use crate::config::ProcessorConfig;
use crate::{Error, Result};
use colored::*;
use futures::StreamExt;
use indicatif::{HumanDuration, ProgressBar};
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Process command runner
///
/// This function orchestrates the processing workflow:
/// 1. Set up logging and configuration
/// 2. Open the input and output
/// 3. Stream events through the processor, writing each record as produced
/// 4. Report run statistics
pub async fn run_process(
    args: ProcessArgs,
    cancellation_token: CancellationToken,
) -> Result<RunReport> {
    // Set up logging
    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting weather event processor");
    debug!("Command line arguments: {:?}", args);

    // Validate arguments
    args.validate()?;

    // Load configuration with layered approach
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let input = open_input(&args.input_path).await?;
    let output = open_output(&args.output_path).await?;

    // Spinner only when stdout is not carrying the records
    let progress = if args.show_progress() && !is_stdio(&args.output_path) {
        Some(create_spinner("Processing events..."))
    } else {
        None
    };

    let result = process_to_writer(
        input,
        output,
        &config,
        &cancellation_token,
        progress.as_ref(),
    )
    .await;

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let report = result?;

    info!(
        "Processing completed in {:.2}s: {}",
        report.processing_time.as_secs_f64(),
        report.stats.summary()
    );

    if args.show_progress() {
        print_summary(&report);
    }

    Ok(report)
}

/// Stream NDJSON events from `reader` through a fresh processor into `writer`
///
/// Records already written stay written when the run fails: the writer is
/// flushed before any error is returned.
pub async fn process_to_writer<R, W>(
    reader: R,
    mut writer: W,
    config: &ProcessorConfig,
    cancellation_token: &CancellationToken,
    progress: Option<&ProgressBar>,
) -> Result<RunReport>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let start_time = Instant::now();
    let mut records = process_stream(Box::pin(read_values(reader, config.skip_blank_lines)));
    let mut records_written = 0usize;
    let mut stopped_at_limit = false;

    loop {
        if config
            .max_output_records
            .is_some_and(|limit| records_written >= limit)
        {
            info!("Reached output limit of {} records", records_written);
            stopped_at_limit = true;
            break;
        }

        let next = tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => {
                warn!("Cancellation requested after {} records", records_written);
                writer.flush().await?;
                return Err(Error::processing_interrupted("Processing cancelled by user"));
            }
            next = records.next() => next,
        };

        let record = match next {
            Some(Ok(record)) => record,
            Some(Err(error)) => {
                writer.flush().await?;
                return Err(error);
            }
            None => break,
        };

        let line = encode_record(&record, config.output_style)?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        if config.flush_each_record {
            writer.flush().await?;
        }
        records_written += 1;

        if let Some(pb) = progress {
            let stats = records.stats();
            pb.set_message(format!(
                "{} events, {} records written",
                stats.events_consumed, records_written
            ));
        }
    }

    writer.flush().await?;

    Ok(RunReport {
        stats: records.stats().clone(),
        records_written,
        stopped_at_limit,
        processing_time: start_time.elapsed(),
    })
}

/// Print the human-readable run summary to stderr
fn print_summary(report: &RunReport) {
    let stats = &report.stats;

    eprintln!("\n{}", "Run Summary".bright_green().bold());
    eprintln!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(report.processing_time).to_string().bright_white()
    );
    eprintln!(
        "  {} {} ({} samples)",
        "Events read:".bright_cyan(),
        stats.events_consumed.to_string().bright_white().bold(),
        stats.samples
    );
    eprintln!(
        "  {} {} snapshots, {} resets",
        "Records written:".bright_cyan(),
        stats.snapshots_emitted.to_string().bright_white(),
        stats.resets_emitted.to_string().bright_white()
    );
    if stats.controls_ignored > 0 {
        eprintln!(
            "  {} {}",
            "Ignored controls:".bright_yellow(),
            stats.controls_ignored
        );
    }
    if report.stopped_at_limit {
        eprintln!(
            "  {} after {} records",
            "Stopped at limit".bright_yellow(),
            report.records_written
        );
    }
}
