//! Command implementations for the weather event processor CLI
//!
//! This module contains the command execution logic. Each command is
//! implemented in its own module.

pub mod process;
pub mod shared;
pub mod validate;

pub use shared::RunReport;

use crate::Result;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Main command runner
///
/// Dispatches to the appropriate subcommand handler:
/// - `process`: stream events through the processor and write records
/// - `validate`: check an event stream without writing records
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<RunReport> {
    match args.command {
        Some(Commands::Process(process_args)) => {
            process::run_process(process_args, cancellation_token).await
        }
        Some(Commands::Validate(validate_args)) => validate::run_validate(validate_args).await,
        None => Ok(RunReport::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_without_command_does_nothing() {
        let args = Args { command: None };
        let report = run(args, CancellationToken::new()).await.unwrap();
        assert_eq!(report.records_written, 0);
    }
}
