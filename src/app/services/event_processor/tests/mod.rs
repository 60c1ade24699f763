//! Tests for the event processor module
//!
//! This module provides unit tests for the state machine, the lazy iterator,
//! and run statistics.


// Test helper functions and fixtures
use serde_json::{Value, json};

/// Create a raw sample record
pub fn sample(station: &str, timestamp: i64, temperature: f64) -> Value {
    json!({
        "type": "sample",
        "stationName": station,
        "timestamp": timestamp,
        "temperature": temperature,
    })
}

/// Create a raw snapshot control record
pub fn snapshot() -> Value {
    json!({"type": "control", "command": "snapshot"})
}

/// Create a raw reset control record
pub fn reset() -> Value {
    json!({"type": "control", "command": "reset"})
}

/// Run a full stream and serialize every emitted record
pub fn run_to_values(events: &[Value]) -> crate::Result<Vec<Value>> {
    super::process_events(events)
        .map(|record| record.map(|r| serde_json::to_value(r).unwrap()))
        .collect()
}
