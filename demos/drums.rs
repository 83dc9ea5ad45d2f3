//! Kick and snare groove over six patterns.
//!
//! Run with: RUST_LOG=debug cargo run --example drums

use saavy_seq::engine::{SleepTimer, TrackId};
use saavy_seq::voices::Drums;
use saavy_seq::{Note, RecordingBackend, Scheduler, StepPattern, SystemClock, TransportConfig};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let backend = RecordingBackend::with_clock(SystemClock::new());
    let mut seq = Scheduler::with_config(backend, TransportConfig::new().looping(false))?;

    let drums = Drums::new(seq.backend_mut());
    seq.add_plugin(TrackId::MAIN, drums)?;

    let kick: Note = "C4".parse()?;
    let snare: Note = "D4".parse()?;

    // Kick on every quarter
    let basic = StepPattern::new().every(4, 0, kick);
    // Snare on the backbeat
    let backbeat = basic.clone().every(8, 4, snare);
    // Extra snares leading into the loop
    let fill = backbeat.clone().hit(14, snare).hit(15, snare);

    seq.add_sequence(basic.clone());
    seq.add_sequence(basic);
    seq.add_sequence(backbeat.clone());
    seq.add_sequence(backbeat.clone());
    seq.add_sequence(backbeat);
    seq.add_sequence(fill);

    let first = seq.play()?.beats.len();
    let beats = first + seq.run(&mut SleepTimer);

    println!(
        "{beats} beats over {} patterns, {} backend nodes",
        seq.pattern_count(),
        seq.backend().node_count()
    );
    Ok(())
}
