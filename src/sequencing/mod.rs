pub mod notes;
pub mod pattern;
pub mod sequence;

pub use notes::{frequency_of, Note, NoteTable, PitchClass};
pub use pattern::StepPattern;
pub use sequence::{IntoNoteEvents, NoteEvent, Sequence, BEATS_PER_PATTERN};
