//! Ready-made instruments.
//!
//! Each voice is a [`Plugin`](crate::graph::Plugin) that also implements
//! [`Voice`](crate::graph::Voice): it builds its node network on the backend
//! when constructed and turns note events into envelopes.
//!
//! # Example
//!
//! ```ignore
//! use saavy_seq::{voices, RecordingBackend, Scheduler};
//!
//! let mut seq = Scheduler::new(RecordingBackend::new());
//! let drums = voices::Drums::new(seq.backend_mut());
//! let track = seq.create_track();
//! seq.add_plugin(track, drums)?;
//! ```

mod bass;
mod drums;
mod keys;
mod synth;

pub use bass::Bass;
pub use drums::{DrumBody, Drums, KICK, SNARE};
pub use keys::{Keys, KEYS_SUSTAIN};
pub use synth::Synth;
