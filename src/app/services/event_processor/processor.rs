//! Main event processor implementation
//!
//! This module contains the `EventProcessor`, which applies one event at a time
//! to its owned state, and `ProcessEvents`, the lazy iterator that drives a
//! processor over an input sequence.

use crate::Result;
use crate::app::models::{ControlCommand, Event, OutputRecord};
use serde_json::Value;
use std::borrow::Cow;
use std::iter::FusedIterator;
use tracing::{debug, trace, warn};

use super::{state::ProcessorState, stats::RunStats};

/// Input item the processor can consume
///
/// Implemented for raw JSON records, which are decoded and checked, and for
/// already-typed [`Event`]s, which are used as-is.
pub trait EventRecord {
    /// Decode the item into an event
    fn to_event(&self) -> Result<Cow<'_, Event>>;
}

impl EventRecord for Value {
    fn to_event(&self) -> Result<Cow<'_, Event>> {
        Event::from_value(self).map(Cow::Owned)
    }
}

impl EventRecord for Event {
    fn to_event(&self) -> Result<Cow<'_, Event>> {
        Ok(Cow::Borrowed(self))
    }
}

impl<T: EventRecord + ?Sized> EventRecord for &T {
    fn to_event(&self) -> Result<Cow<'_, Event>> {
        (**self).to_event()
    }
}

/// Stateful processor for one stream of weather events
///
/// Each instance owns the station table for exactly one run. Processing a new
/// stream from a clean slate requires a new instance.
///
/// # Example
///
/// ```rust
/// use weather_events::{Event, EventProcessor};
///
/// let mut processor = EventProcessor::new();
/// assert!(processor.apply(&Event::snapshot()).is_none());
///
/// processor.apply(&Event::sample("A", 100, 5.0));
/// let record = processor.apply(&Event::reset()).unwrap();
/// assert_eq!(record.as_of(), 100);
/// ```
#[derive(Debug, Default)]
pub struct EventProcessor {
    /// Station extremes and control bookkeeping
    state: ProcessorState,
    /// Counters for this run
    stats: RunStats,
}

impl EventProcessor {
    /// Create a processor with empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a typed event, returning the record it produces, if any
    pub fn apply(&mut self, event: &Event) -> Option<OutputRecord> {
        self.stats.events_consumed += 1;

        match event {
            Event::Sample(sample) => {
                trace!(
                    station = %sample.station_name,
                    timestamp = %sample.timestamp,
                    temperature = %sample.temperature,
                    "Recording sample"
                );
                self.state.record_sample(sample);
                self.stats.samples += 1;
                None
            }
            Event::Control { command } => {
                let output = match command {
                    ControlCommand::Snapshot => self.state.snapshot(),
                    ControlCommand::Reset => self.state.reset(),
                };

                match &output {
                    Some(record) => debug!(
                        command = %command,
                        as_of = %record.as_of(),
                        "Control command honored"
                    ),
                    None => debug!(
                        command = %command,
                        "Control command ignored: no sample since last reset"
                    ),
                }

                self.stats.record_control(output.as_ref());
                output
            }
        }
    }

    /// Decode and apply one input item
    ///
    /// A record that fails to decode still counts as consumed.
    pub fn apply_record<R: EventRecord + ?Sized>(
        &mut self,
        record: &R,
    ) -> Result<Option<OutputRecord>> {
        match record.to_event() {
            Ok(event) => Ok(self.apply(&event)),
            Err(error) => {
                self.stats.events_consumed += 1;
                warn!(
                    event_index = self.stats.events_consumed,
                    "Rejecting malformed event: {}", error
                );
                Err(error)
            }
        }
    }

    /// Drive this processor lazily over an input sequence
    pub fn process<I>(self, events: I) -> ProcessEvents<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: EventRecord,
    {
        ProcessEvents {
            events: events.into_iter(),
            processor: self,
            finished: false,
        }
    }

    /// Current state
    pub fn state(&self) -> &ProcessorState {
        &self.state
    }

    /// Counters for the run so far
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }
}

/// Process an input sequence with a fresh processor
///
/// Returns a lazy, single-pass iterator: each call to `next` pulls input only
/// until the next record is produced. The iterator yields `Err` once for the
/// first malformed event and then ends.
pub fn process_events<I>(events: I) -> ProcessEvents<I::IntoIter>
where
    I: IntoIterator,
    I::Item: EventRecord,
{
    EventProcessor::new().process(events)
}

/// Lazy iterator of output records over an input sequence
#[derive(Debug)]
pub struct ProcessEvents<I> {
    events: I,
    processor: EventProcessor,
    finished: bool,
}

impl<I> ProcessEvents<I> {
    /// The processor driving this iterator
    pub fn processor(&self) -> &EventProcessor {
        &self.processor
    }

    /// Counters for the events pulled so far
    pub fn stats(&self) -> &RunStats {
        self.processor.stats()
    }

    /// Stop iterating and take back the processor
    pub fn into_processor(self) -> EventProcessor {
        self.processor
    }
}

impl<I> Iterator for ProcessEvents<I>
where
    I: Iterator,
    I::Item: EventRecord,
{
    type Item = Result<OutputRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        for record in self.events.by_ref() {
            match self.processor.apply_record(&record) {
                Ok(Some(output)) => return Some(Ok(output)),
                Ok(None) => continue,
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }

        self.finished = true;
        None
    }
}

impl<I> FusedIterator for ProcessEvents<I>
where
    I: Iterator,
    I::Item: EventRecord,
{
}
