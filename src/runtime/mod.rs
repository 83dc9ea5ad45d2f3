//! Tracks: plugin chains that play sequences.
//!
//! # Example
//!
//! ```ignore
//! use saavy_seq::{voices::Bass, Note, RecordingBackend, Track};
//!
//! let mut backend = RecordingBackend::new();
//! let mut track = Track::new(&mut backend);
//! let bass = Bass::new(&mut backend);
//! track.add_plugin(&mut backend, bass);
//! track.add_sequence(|_t: f64, beat: u8| (beat % 8 == 0).then(|| "C2".parse::<Note>()).transpose());
//! ```

mod track;

pub use track::Track;
