//! Per-run processor state and control-command rules
//!
//! Holds the station extremes table together with the two pieces of bookkeeping
//! that decide whether a control command produces output.

use crate::app::models::{
    Numeric, OutputRecord, ResetRecord, Sample, SnapshotRecord, StationStats, StationTable,
};

/// Whether any sample has arrived since the stream started or was last reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No sample since start or since the last honored reset
    NoData,
    /// At least one sample since start or since the last honored reset
    HasData,
}

/// State owned by a single processing run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessorState {
    /// Extremes for stations seen since the last reset
    stations: StationTable,
    /// Set by any sample, cleared by an honored reset
    saw_sample_since_reset: bool,
    /// Greatest timestamp over every sample in the run; survives resets
    latest_timestamp: Option<Numeric>,
}

impl ProcessorState {
    /// Create empty state in the `NoData` phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase of the control state machine
    pub fn phase(&self) -> Phase {
        if self.saw_sample_since_reset {
            Phase::HasData
        } else {
            Phase::NoData
        }
    }

    /// True once a sample has arrived since the last honored reset
    pub fn has_data(&self) -> bool {
        self.saw_sample_since_reset
    }

    /// Station extremes accumulated since the last reset
    pub fn stations(&self) -> &StationTable {
        &self.stations
    }

    /// Greatest sample timestamp seen in this run, if any
    pub fn latest_timestamp(&self) -> Option<Numeric> {
        self.latest_timestamp
    }

    /// Fold a sample into the table and move to `HasData`
    pub fn record_sample(&mut self, sample: &Sample) {
        self.latest_timestamp = Some(match self.latest_timestamp {
            Some(latest) => latest.max(sample.timestamp),
            None => sample.timestamp,
        });

        match self.stations.get_mut(&sample.station_name) {
            Some(stats) => stats.record(sample.temperature),
            None => {
                self.stations.insert(
                    sample.station_name.clone(),
                    StationStats::new(sample.temperature),
                );
            }
        }

        self.saw_sample_since_reset = true;
    }

    /// Copy of the current extremes, or `None` while in `NoData`
    pub fn snapshot(&self) -> Option<OutputRecord> {
        if !self.has_data() {
            return None;
        }
        let as_of = self.latest_timestamp?;

        Some(OutputRecord::Snapshot(SnapshotRecord {
            as_of,
            stations: self.stations.clone(),
        }))
    }

    /// Clear the extremes and return to `NoData`, or `None` while already in `NoData`
    ///
    /// The returned record's `asOf` is taken before anything is cleared, and
    /// `latest_timestamp` itself is kept.
    pub fn reset(&mut self) -> Option<OutputRecord> {
        if !self.has_data() {
            return None;
        }
        let record = OutputRecord::Reset(ResetRecord {
            as_of: self.latest_timestamp?,
        });

        self.stations.clear();
        self.saw_sample_since_reset = false;

        Some(record)
    }
}
