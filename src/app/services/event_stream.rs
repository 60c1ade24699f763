//! Async stream adapter for the event processor
//!
//! Wraps a `futures::Stream` of decoded input records and drives an
//! [`EventProcessor`] over it, yielding output records as they are produced.
//! The adapter polls its input only while the consumer is waiting for the
//! next record, so a consumer that stops early leaves the rest unread.

use crate::Result;
use crate::app::models::OutputRecord;
use crate::app::services::event_processor::{EventProcessor, EventRecord, RunStats};
use futures::stream::{FusedStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream of output records driven by an upstream stream of input records
///
/// Upstream errors (unreadable input, invalid JSON) are passed through and end
/// the stream exactly like a malformed event does.
#[derive(Debug)]
pub struct EventStream<S> {
    inner: S,
    processor: EventProcessor,
    finished: bool,
}

impl<S> EventStream<S> {
    /// Wrap `inner` with a given processor
    pub fn new(inner: S, processor: EventProcessor) -> Self {
        Self {
            inner,
            processor,
            finished: false,
        }
    }

    /// The processor driving this stream
    pub fn processor(&self) -> &EventProcessor {
        &self.processor
    }

    /// Counters for the records pulled so far
    pub fn stats(&self) -> &RunStats {
        self.processor.stats()
    }

    /// Stop streaming and take back the processor
    pub fn into_processor(self) -> EventProcessor {
        self.processor
    }
}

/// Process an input stream with a fresh processor
pub fn process_stream<S, R>(events: S) -> EventStream<S>
where
    S: Stream<Item = Result<R>> + Unpin,
    R: EventRecord,
{
    EventStream::new(events, EventProcessor::new())
}

impl<S, R> Stream for EventStream<S>
where
    S: Stream<Item = Result<R>> + Unpin,
    R: EventRecord,
{
    type Item = Result<OutputRecord>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        while !this.finished {
            let record = match this.inner.poll_next_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => break,
                Poll::Ready(Some(record)) => record,
            };

            let outcome = record.and_then(|record| this.processor.apply_record(&record));
            match outcome {
                Ok(Some(output)) => return Poll::Ready(Some(Ok(output))),
                Ok(None) => continue,
                Err(error) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(error)));
                }
            }
        }

        this.finished = true;
        Poll::Ready(None)
    }
}

impl<S, R> FusedStream for EventStream<S>
where
    S: Stream<Item = Result<R>> + Unpin,
    R: EventRecord,
{
    fn is_terminated(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::app::models::Event;
    use crate::app::services::ndjson::read_values;
    use futures::stream;
    use serde_json::{Value, json};

    fn ok_values(values: Vec<Value>) -> impl Stream<Item = Result<Value>> + Unpin {
        stream::iter(values.into_iter().map(Ok))
    }

    #[tokio::test]
    async fn test_stream_scenario() {
        let events = ok_values(vec![
            json!({"type": "sample", "stationName": "A", "timestamp": 100, "temperature": 5.0}),
            json!({"type": "control", "command": "reset"}),
            json!({"type": "control", "command": "snapshot"}),
            json!({"type": "sample", "stationName": "B", "timestamp": 200, "temperature": 10.0}),
            json!({"type": "control", "command": "snapshot"}),
        ]);

        let records: Vec<_> = process_stream(events)
            .map(|record| serde_json::to_value(record.unwrap()).unwrap())
            .collect()
            .await;

        assert_eq!(
            records,
            vec![
                json!({"type": "reset", "asOf": 100}),
                json!({"type": "snapshot", "asOf": 200, "stations": {"B": {"high": 10.0, "low": 10.0}}}),
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_halts_on_upstream_error() {
        let input: &[u8] = b"{\"type\":\"sample\",\"stationName\":\"A\",\"timestamp\":1,\"temperature\":2.0}\n\
                             {\"type\":\"control\",\"command\":\"snapshot\"}\n\
                             oops\n\
                             {\"type\":\"control\",\"command\":\"snapshot\"}\n";

        let mut stream = process_stream(Box::pin(read_values(input, true)));

        assert!(stream.next().await.unwrap().is_ok());
        match stream.next().await {
            Some(Err(Error::InvalidJson { line, .. })) => assert_eq!(line, 3),
            other => panic!("expected invalid JSON, got {other:?}"),
        }
        assert!(stream.is_terminated());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_halts_on_malformed_event() {
        let events = ok_values(vec![
            json!({"type": "sample", "stationName": "A", "timestamp": 1, "temperature": 2.0}),
            json!({"type": "bogus"}),
            json!({"type": "control", "command": "snapshot"}),
        ]);

        let results: Vec<_> = process_stream(events).collect().await;

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::UnknownType { .. })));
    }

    #[tokio::test]
    async fn test_stream_of_typed_events() {
        let events = stream::iter(vec![
            Ok(Event::sample("A", 10, 1.0)),
            Ok(Event::sample("A", 20, 3.0)),
            Ok(Event::snapshot()),
        ]);

        let mut stream = process_stream(events);
        let record = stream.next().await.unwrap().unwrap();

        assert_eq!(record.as_of(), 20);
        assert!(stream.next().await.is_none());
        assert_eq!(stream.stats().samples, 2);
        assert_eq!(stream.into_processor().stats().snapshots_emitted, 1);
    }
}
