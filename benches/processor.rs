//! Benchmarks for event processing throughput
//!
//! Run with: cargo bench --bench processor

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::Value;
use weather_events::{Event, process_events};

/// Samples spread over `stations` stations with a snapshot every 100 events
fn build_events(count: usize, stations: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            if i % 100 == 99 {
                Event::snapshot()
            } else {
                let temperature = ((i * 37) % 400) as f64 / 10.0 - 20.0;
                Event::sample(format!("station-{}", i % stations), i as i64, temperature)
            }
        })
        .collect()
}

fn bench_typed_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_events");

    for stations in [1, 16, 256].iter() {
        let events = build_events(10_000, *stations);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(stations),
            &events,
            |b, events| {
                b.iter(|| {
                    let emitted = process_events(black_box(events))
                        .filter(|record| record.is_ok())
                        .count();
                    black_box(emitted)
                });
            },
        );
    }
    group.finish();
}

fn bench_json_records(c: &mut Criterion) {
    let events: Vec<Value> = build_events(10_000, 16)
        .iter()
        .map(Event::to_value)
        .collect::<Result<_, _>>()
        .unwrap();

    let mut group = c.benchmark_group("json_records");
    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("decode_and_process", |b| {
        b.iter(|| {
            let emitted = process_events(black_box(&events))
                .filter(|record| record.is_ok())
                .count();
            black_box(emitted)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_typed_events, bench_json_records);
criterion_main!(benches);
