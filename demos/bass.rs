//! Electric synth bass alternating C2 and D2.
//!
//! Plays one pattern against the recording backend in real time and prints
//! what would have been sent to an audio engine.
//!
//! Run with: RUST_LOG=debug cargo run --example bass

use saavy_seq::engine::{SleepTimer, TrackId};
use saavy_seq::voices::Bass;
use saavy_seq::{Note, RecordingBackend, Scheduler, SystemClock, TransportConfig};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let backend = RecordingBackend::with_clock(SystemClock::new());
    let mut seq = Scheduler::with_config(backend, TransportConfig::new().looping(false))?;

    let bass = Bass::new(seq.backend_mut());
    seq.add_plugin(TrackId::MAIN, bass)?;

    let c2: Note = "C2".parse()?;
    let d2: Note = "D2".parse()?;
    seq.add_sequence(move |_time: f64, beat: u8| match beat % 8 {
        0 => vec![c2],
        4 => vec![d2],
        _ => vec![],
    });

    let first = seq.play()?.beats.len();
    let beats = first + seq.run(&mut SleepTimer);

    println!("{beats} beats, {} backend calls", seq.backend().ops().len());
    Ok(())
}
