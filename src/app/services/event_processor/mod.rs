//! Event processing module for weather station streams
//!
//! This module turns an ordered stream of sample and control events into the
//! snapshot and reset records those controls ask for. It owns all per-run state
//! and is the only place that decides when a control command is honored.
//!
//! # Architecture
//!
//! The module is organized into logical components:
//! - [`state`] - Station extremes table and the `NoData`/`HasData` state machine
//! - [`processor`] - `EventProcessor` and the lazy `ProcessEvents` iterator
//! - [`stats`] - Counters describing what a run consumed and emitted
//!
//! # Control Semantics
//!
//! A `snapshot` or `reset` is honored only when at least one sample has arrived
//! since the stream started or since the last honored reset. Otherwise it is a
//! silent no-op, which is not an error. Malformed records are errors and end
//! the run.
//!
//! # Example Usage
//!
//! ```rust
//! use serde_json::json;
//! use weather_events::process_events;
//!
//! let events = vec![
//!     json!({"type": "sample", "stationName": "A", "timestamp": 100, "temperature": 5.0}),
//!     json!({"type": "control", "command": "snapshot"}),
//! ];
//!
//! let records: Vec<_> = process_events(&events).collect::<Result<_, _>>().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].as_of(), 100);
//! ```

pub mod processor;
pub mod state;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use processor::{EventProcessor, EventRecord, ProcessEvents, process_events};
pub use state::{Phase, ProcessorState};
pub use stats::RunStats;
