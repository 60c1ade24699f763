//! Configuration management and validation.
//!
//! Provides the settings that shape how a processing run reads its input and
//! delivers records to the sink, with layered loading from an optional JSON
//! file followed by command-line overrides.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Formatting of emitted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// One record per line (NDJSON)
    #[default]
    Compact,
    /// Indented JSON for reading by eye
    Pretty,
}

/// Settings for a processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// How emitted records are formatted
    pub output_style: OutputStyle,

    /// Flush the sink after every record so consumers see records as produced
    pub flush_each_record: bool,

    /// Stop after this many output records (None = run to end of input)
    pub max_output_records: Option<usize>,

    /// Ignore blank input lines instead of treating them as invalid JSON
    pub skip_blank_lines: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_style: OutputStyle::Compact,
            flush_each_record: true,
            max_output_records: None,
            skip_blank_lines: true,
        }
    }
}

impl ProcessorConfig {
    /// Load configuration from a JSON file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        let config: Self = serde_json::from_str(&text).map_err(|e| {
            Error::configuration(format!("Invalid config file {}: {}", path.display(), e))
        })?;

        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load from an optional file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Check settings for consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_output_records == Some(0) {
            return Err(Error::configuration(
                "Output record limit must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Emit indented JSON
    pub fn with_pretty_output(mut self) -> Self {
        self.output_style = OutputStyle::Pretty;
        self
    }

    /// Stop after `limit` output records
    pub fn with_max_output_records(mut self, limit: usize) -> Self {
        self.max_output_records = Some(limit);
        self
    }

    /// Let the sink buffer records between flushes
    pub fn with_buffered_output(mut self) -> Self {
        self.flush_each_record = false;
        self
    }

    /// Treat blank input lines as invalid JSON
    pub fn with_strict_lines(mut self) -> Self {
        self.skip_blank_lines = false;
        self
    }
}
