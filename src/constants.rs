//! Application constants for the weather event processor
//!
//! This module contains the wire-format field names, discriminator values,
//! and default settings used throughout the application.

// =============================================================================
// Input Record Format
// =============================================================================

/// Discriminator field present on every input record
pub const FIELD_TYPE: &str = "type";

/// Sample record fields
pub const FIELD_STATION_NAME: &str = "stationName";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_TEMPERATURE: &str = "temperature";

/// Control record field
pub const FIELD_COMMAND: &str = "command";

/// Required fields of a sample record, in the order they are reported
pub const SAMPLE_FIELDS: &[&str] = &[FIELD_STATION_NAME, FIELD_TIMESTAMP, FIELD_TEMPERATURE];

/// Values accepted in the `type` field
pub mod message_types {
    /// Temperature reading for a single station
    pub const SAMPLE: &str = "sample";

    /// Snapshot or reset instruction
    pub const CONTROL: &str = "control";
}

/// Values accepted in the `command` field of a control record
pub mod commands {
    pub const SNAPSHOT: &str = "snapshot";
    pub const RESET: &str = "reset";
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Fixed trailer closing every caller-input error message.
///
/// Callers may match on this suffix to tell bad input apart from system faults.
pub const VERIFY_INPUT: &str = "Please verify input.";

// =============================================================================
// CLI Defaults
// =============================================================================

/// Path argument meaning standard input or standard output
pub const STDIO_PATH: &str = "-";

/// Log filter target for this crate
pub const LOG_TARGET: &str = "weather_events";

/// Progress spinner refresh interval in milliseconds
pub const PROGRESS_TICK_MS: u64 = 100;
