//! Frère Jacques on the sawtooth synth.
//!
//! Run with: RUST_LOG=info cargo run --example keyboard

use saavy_seq::engine::{SleepTimer, TrackId};
use saavy_seq::voices::Synth;
use saavy_seq::{Note, RecordingBackend, Scheduler, StepPattern, SystemClock, TransportConfig};

/// One bar of melody. The synth holds a single note, so each note is released
/// three steps after it starts or one step before the next, whichever is first.
fn bar(notes: &[(u8, &str)]) -> color_eyre::Result<StepPattern> {
    let mut pattern = StepPattern::new();
    for (i, &(step, name)) in notes.iter().enumerate() {
        let note: Note = name.parse()?;
        let next = notes.get(i + 1).map_or(16, |&(s, _)| s);
        let off = (step + 3).min(next - 1).min(15);
        pattern = pattern.hit(step, note).release(off, note);
    }
    Ok(pattern)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let backend = RecordingBackend::with_clock(SystemClock::new());
    let config = TransportConfig::new().bpm(100.0).looping(false);
    let mut seq = Scheduler::with_config(backend, config)?;

    let synth = Synth::new(seq.backend_mut());
    seq.add_plugin(TrackId::MAIN, synth)?;

    let bars = [
        bar(&[(0, "C4"), (4, "D4"), (8, "E4"), (12, "C4")])?,
        bar(&[(0, "E4"), (4, "F4"), (8, "G4")])?,
        bar(&[(0, "G4"), (2, "A4"), (4, "G4"), (6, "F4"), (8, "E4"), (12, "C4")])?,
        bar(&[(0, "C4"), (4, "G3"), (8, "C4")])?,
    ];
    for pattern in bars {
        seq.add_sequence(pattern.clone());
        seq.add_sequence(pattern);
    }

    seq.play()?;
    seq.run(&mut SleepTimer);

    println!("played {} bars", seq.pattern_count());
    Ok(())
}
