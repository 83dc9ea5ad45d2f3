//! Benchmarks for envelope breakpoints.

use std::hint::black_box;

use criterion::Criterion;
use saavy_seq::io::{NodeKind, ParamKind};
use saavy_seq::{compute_envelope, AudioBackend, EnvelopeSpec, RecordingBackend};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencer/envelope");

    let percussive = EnvelopeSpec::attack_decay(0.0, 0.0, 1.0, 1000.0, 10.0);
    group.bench_function("attack_decay", |b| {
        b.iter(|| compute_envelope(black_box(&percussive)))
    });

    let adsr = EnvelopeSpec::attack_decay(0.0, 0.0, 1.0, 100.0, 10.0).with_sustain(0.3, 3.0, 10.0);
    group.bench_function("four_stage", |b| b.iter(|| compute_envelope(black_box(&adsr))));

    // compute + commit, as a voice does per note
    let mut backend = RecordingBackend::new();
    let gain = backend.create_node(NodeKind::Gain, &[]).param(ParamKind::Gain);
    group.bench_function("apply", |b| {
        b.iter(|| {
            if let Ok(env) = compute_envelope(black_box(&adsr)) {
                env.apply(&mut backend, gain);
            }
            backend.take_ops();
        })
    });

    group.finish();
}
