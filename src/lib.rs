pub mod automation; // Envelope breakpoints
pub mod config;
pub mod engine; // Transport and look-ahead scheduling
pub mod error;
pub mod graph; // Plugin chain building blocks
pub mod io; // Audio backend and clocks
pub mod runtime;
pub mod sequencing; // Notes, sequences and step patterns
pub mod voices;

pub use automation::{compute_envelope, Envelope, EnvelopeSpec};
pub use config::TransportConfig;
pub use engine::{PlayState, Route, Scheduler, TrackId, TransportState, WakeReport};
pub use error::{Error, Result};
pub use graph::{NodePlugin, Plugin, Voice};
pub use io::{AudioBackend, Clock, ManualClock, RecordingBackend, SystemClock};
pub use runtime::Track;
pub use sequencing::{frequency_of, Note, NoteEvent, NoteTable, Sequence, StepPattern};
