//! Benchmarks for scheduler wakes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_seq::voices::Drums;
use saavy_seq::{ManualClock, Note, RecordingBackend, Scheduler, StepPattern, TrackId, TransportConfig};

use crate::TRACK_COUNTS;

fn scheduler(tracks: usize, clock: &ManualClock) -> Scheduler<RecordingBackend> {
    let backend = RecordingBackend::with_clock(clock.clone());
    let mut seq = Scheduler::with_config(backend, TransportConfig::default()).unwrap();
    let kick: Note = "C4".parse().unwrap();

    for i in 0..tracks {
        let id = if i == 0 { TrackId::MAIN } else { seq.create_track() };
        let drums = Drums::new(seq.backend_mut());
        seq.add_plugin(id, drums).unwrap();
        seq.add_track_sequence(id, StepPattern::new().every(2, 0, kick)).unwrap();
    }
    seq
}

pub fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencer/scheduler");

    for &tracks in TRACK_COUNTS {
        // Steady playback: one poll interval of new time per wake
        let clock = ManualClock::new();
        let mut seq = scheduler(tracks, &clock);
        seq.play().unwrap();
        group.bench_with_input(BenchmarkId::new("steady_wake", tracks), &tracks, |b, _| {
            b.iter(|| {
                clock.advance(0.025);
                let report = seq.wake();
                seq.backend_mut().take_ops();
                black_box(report)
            })
        });

        // Two-second stall: 16 overdue beats per wake
        let clock = ManualClock::new();
        let mut seq = scheduler(tracks, &clock);
        seq.play().unwrap();
        group.bench_with_input(BenchmarkId::new("stall_burst", tracks), &tracks, |b, _| {
            b.iter(|| {
                clock.advance(2.0);
                let report = seq.wake();
                seq.backend_mut().take_ops();
                black_box(report)
            })
        });
    }

    group.finish();
}
