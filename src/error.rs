use thiserror::Error;

/// Boxed error returned by a failing sequence callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Note identifier is not one of the 96 entries in the note table.
    #[error("unknown note `{0}` (expected C0..B7, sharps written as `s`, e.g. Cs4)")]
    UnknownNote(String),

    #[error("octave {0} is outside the note table (0..=7)")]
    InvalidOctave(u8),

    #[error("invalid envelope: decay rate must be positive, got {decay_rate}")]
    InvalidEnvelope { decay_rate: f64 },

    /// `play()` was called with no sequences on any track.
    #[error("need at least one sequence to play")]
    EmptySequence,

    #[error("invalid tempo {0} bpm: must be a positive, finite number")]
    InvalidTempo(f64),

    #[error("invalid look-ahead {0}s: must be a finite number of seconds")]
    InvalidLookAhead(f64),

    #[error("poll interval must be longer than zero")]
    InvalidPollInterval,

    #[error("no track with id {0}")]
    UnknownTrack(usize),

    #[error("track {track} sequence {sequence} failed at beat {beat}: {source}")]
    SequenceFault {
        track: usize,
        sequence: usize,
        beat: u8,
        #[source]
        source: BoxError,
    },
}
