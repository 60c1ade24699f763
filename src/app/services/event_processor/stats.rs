//! Run statistics for the event processor
//!
//! Tracks how many events a run consumed and how many records each control
//! command produced, for logging and CLI reports.

use crate::app::models::OutputRecord;
use serde::{Deserialize, Serialize};

/// Counters for a single processing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Total events consumed, including the one that failed, if any
    pub events_consumed: usize,
    /// Sample events folded into the station table
    pub samples: usize,
    /// Snapshot records emitted
    pub snapshots_emitted: usize,
    /// Reset records emitted
    pub resets_emitted: usize,
    /// Control commands ignored because no sample had arrived since the last reset
    pub controls_ignored: usize,
    /// Number of stations in the most recent snapshot
    pub stations_in_last_snapshot: usize,
}

impl RunStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the outcome of a control command
    pub fn record_control(&mut self, output: Option<&OutputRecord>) {
        match output {
            Some(OutputRecord::Snapshot(snapshot)) => {
                self.snapshots_emitted += 1;
                self.stations_in_last_snapshot = snapshot.stations.len();
            }
            Some(OutputRecord::Reset(_)) => self.resets_emitted += 1,
            None => self.controls_ignored += 1,
        }
    }

    /// Total records emitted
    pub fn records_emitted(&self) -> usize {
        self.snapshots_emitted + self.resets_emitted
    }

    /// Total control commands seen, honored or not
    pub fn controls(&self) -> usize {
        self.records_emitted() + self.controls_ignored
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "Run Summary: {} events ({} samples, {} controls) | \
             Snapshots: {} | Resets: {} | Ignored controls: {}",
            self.events_consumed,
            self.samples,
            self.controls(),
            self.snapshots_emitted,
            self.resets_emitted,
            self.controls_ignored
        )
    }
}
