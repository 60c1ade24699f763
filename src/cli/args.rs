//! Command-line argument definitions for the weather event processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::ProcessorConfig;
use crate::constants::STDIO_PATH;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// CLI arguments for the weather event processor
///
/// Streams sample and control events through the station extremes processor
/// and writes the resulting snapshot and reset records.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "weather-events",
    version,
    about = "Track per-station temperature extremes over a stream of weather events",
    long_about = "Reads newline-delimited JSON sample and control events, tracks the highest and \
                  lowest temperature per station since the last reset, and writes a snapshot or \
                  reset record each time a control command is honored."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process an event stream and write output records
    Process(ProcessArgs),
    /// Check an event stream without writing output records
    Validate(ValidateArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// NDJSON event file to read ("-" for standard input)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        default_value = STDIO_PATH,
        help = "NDJSON event file to read (\"-\" for stdin)"
    )]
    pub input_path: PathBuf,

    /// File to write output records to ("-" for standard output)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = STDIO_PATH,
        help = "File to write output records to (\"-\" for stdout)"
    )]
    pub output_path: PathBuf,

    /// Write indented JSON instead of one record per line
    #[arg(long = "pretty", help = "Write indented JSON records")]
    pub pretty: bool,

    /// Stop after this many output records
    #[arg(
        long = "limit",
        value_name = "N",
        help = "Stop after N output records"
    )]
    pub limit: Option<usize>,

    /// Let the sink buffer records instead of flushing after each one
    #[arg(long = "buffered", help = "Buffer output instead of flushing every record")]
    pub buffered: bool,

    /// Treat blank lines as invalid JSON
    #[arg(long = "strict-lines", help = "Treat blank lines as invalid JSON")]
    pub strict_lines: bool,

    /// JSON configuration file
    ///
    /// Values from the file are applied first; command-line flags override them.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "JSON configuration file"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress the run summary and all logging except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// NDJSON event file to check ("-" for standard input)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        default_value = STDIO_PATH,
        help = "NDJSON event file to check (\"-\" for stdin)"
    )]
    pub input_path: PathBuf,

    /// Treat blank lines as invalid JSON
    #[arg(long = "strict-lines", help = "Treat blank lines as invalid JSON")]
    pub strict_lines: bool,

    /// Report format
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Report format"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// Machine-readable JSON
    Json,
}

/// True when `path` names standard input or output
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !is_stdio(&self.input_path) && !self.input_path.is_file() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.input_path.display()
            )));
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if self.limit == Some(0) {
            return Err(Error::configuration(
                "Output record limit must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, mut config: ProcessorConfig) -> ProcessorConfig {
        if self.pretty {
            config = config.with_pretty_output();
        }
        if let Some(limit) = self.limit {
            config = config.with_max_output_records(limit);
        }
        if self.buffered {
            config = config.with_buffered_output();
        }
        if self.strict_lines {
            config = config.with_strict_lines();
        }
        config
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            log_level_for(self.verbose)
        }
    }

    /// Check if we should show progress and the run summary (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ValidateArgs {
    /// Validate the validate command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !is_stdio(&self.input_path) && !self.input_path.is_file() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.input_path.display()
            )));
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose)
    }
}

fn log_level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputStyle;
    use std::fs;
    use tempfile::TempDir;

    fn process_args(input_path: PathBuf) -> ProcessArgs {
        ProcessArgs {
            input_path,
            output_path: PathBuf::from(STDIO_PATH),
            pretty: false,
            limit: None,
            buffered: false,
            strict_lines: false,
            config_file: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_parse_process_defaults() {
        let args = Args::try_parse_from(["weather-events", "process"]).unwrap();

        match args.command {
            Some(Commands::Process(process)) => {
                assert!(is_stdio(&process.input_path));
                assert!(is_stdio(&process.output_path));
                assert!(!process.pretty);
                assert_eq!(process.limit, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_process_flags() {
        let args = Args::try_parse_from([
            "weather-events",
            "process",
            "-i",
            "events.ndjson",
            "-o",
            "out.ndjson",
            "--pretty",
            "--limit",
            "4",
            "-vv",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Process(process)) => {
                assert_eq!(process.input_path, PathBuf::from("events.ndjson"));
                assert_eq!(process.output_path, PathBuf::from("out.ndjson"));
                assert!(process.pretty);
                assert_eq!(process.limit, Some(4));
                assert_eq!(process.get_log_level(), "debug");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["weather-events", "process", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_parse_validate() {
        let args =
            Args::try_parse_from(["weather-events", "validate", "--format", "json"]).unwrap();

        match args.command {
            Some(Commands::Validate(validate)) => {
                assert_eq!(validate.output_format, OutputFormat::Json);
                assert!(!validate.strict_lines);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_process_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("events.ndjson");
        fs::write(&input, "").unwrap();

        let args = process_args(input.clone());
        assert!(args.validate().is_ok());
        assert!(process_args(PathBuf::from(STDIO_PATH)).validate().is_ok());

        let missing = process_args(temp_dir.path().join("missing.ndjson"));
        assert!(missing.validate().is_err());

        let mut zero_limit = args.clone();
        zero_limit.limit = Some(0);
        assert!(zero_limit.validate().is_err());

        let mut missing_config = args.clone();
        missing_config.config_file = Some(temp_dir.path().join("nope.json"));
        assert!(missing_config.validate().is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut args = process_args(PathBuf::from(STDIO_PATH));
        let config = ProcessorConfig::default().with_max_output_records(10);

        let config = args.apply_overrides(config);
        assert_eq!(config.output_style, OutputStyle::Compact);
        assert_eq!(config.max_output_records, Some(10));
        assert!(config.flush_each_record);
        assert!(config.skip_blank_lines);

        args.pretty = true;
        args.limit = Some(2);
        args.buffered = true;
        args.strict_lines = true;
        let config = args.apply_overrides(config);
        assert_eq!(config.output_style, OutputStyle::Pretty);
        assert_eq!(config.max_output_records, Some(2));
        assert!(!config.flush_each_record);
        assert!(!config.skip_blank_lines);
    }

    #[test]
    fn test_parse_output_flags() {
        let args = Args::try_parse_from([
            "weather-events",
            "process",
            "--buffered",
            "--strict-lines",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Process(process)) => {
                assert!(process.buffered);
                assert!(process.strict_lines);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_log_level() {
        let mut args = process_args(PathBuf::from(STDIO_PATH));
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 5;
        assert_eq!(args.get_log_level(), "trace");

        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }
}
