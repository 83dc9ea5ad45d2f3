//! Sequences: what happens on each beat of a pattern.
//!
//! A sequence is called once per beat with the absolute time the beat will
//! sound at and the beat index within the pattern (0..16). It answers with
//! the note events to trigger at that time. Sequences never see transport
//! state; they may close over their own data.

use crate::error::BoxError;
use crate::sequencing::notes::Note;

/// Beats in one pattern (sixteenth-note resolution over one 4/4 bar).
pub const BEATS_PER_PATTERN: u8 = 16;

/// A single note event produced by a sequence.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    On(Note),
    Off(Note),
}

impl NoteEvent {
    pub fn note(&self) -> Note {
        match self {
            NoteEvent::On(note) | NoteEvent::Off(note) => *note,
        }
    }
}

/// Core trait for beat sequences.
pub trait Sequence: Send {
    /// Events to trigger at `time` for beat `beat` (0..16) of this pattern.
    fn events(&self, time: f64, beat: u8) -> Result<Vec<NoteEvent>, BoxError>;
}

/// Conversion from whatever a sequence closure returns into note events.
pub trait IntoNoteEvents {
    fn into_note_events(self) -> Result<Vec<NoteEvent>, BoxError>;
}

impl IntoNoteEvents for Vec<NoteEvent> {
    fn into_note_events(self) -> Result<Vec<NoteEvent>, BoxError> {
        Ok(self)
    }
}

/// A plain list of notes means "note on" for each of them.
impl IntoNoteEvents for Vec<Note> {
    fn into_note_events(self) -> Result<Vec<NoteEvent>, BoxError> {
        Ok(self.into_iter().map(NoteEvent::On).collect())
    }
}

impl IntoNoteEvents for Option<Note> {
    fn into_note_events(self) -> Result<Vec<NoteEvent>, BoxError> {
        Ok(self.into_iter().map(NoteEvent::On).collect())
    }
}

impl<T, E> IntoNoteEvents for Result<T, E>
where
    T: IntoNoteEvents,
    E: Into<BoxError>,
{
    fn into_note_events(self) -> Result<Vec<NoteEvent>, BoxError> {
        self.map_err(Into::into)?.into_note_events()
    }
}

/// Closures `|time: f64, beat: u8| ...` are sequences.
impl<F, R> Sequence for F
where
    F: Fn(f64, u8) -> R + Send,
    R: IntoNoteEvents,
{
    fn events(&self, time: f64, beat: u8) -> Result<Vec<NoteEvent>, BoxError> {
        self(time, beat).into_note_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn c4() -> Note {
        "C4".parse().unwrap()
    }

    #[test]
    fn closure_returning_notes_is_note_on() {
        let seq = |_time: f64, beat: u8| {
            if beat % 4 == 0 {
                vec![c4()]
            } else {
                vec![]
            }
        };

        assert_eq!(seq.events(0.0, 0).unwrap(), vec![NoteEvent::On(c4())]);
        assert!(seq.events(0.0, 1).unwrap().is_empty());
    }

    #[test]
    fn closure_can_mix_on_and_off() {
        let seq = |_time: f64, beat: u8| match beat {
            0 => vec![NoteEvent::On(c4())],
            8 => vec![NoteEvent::Off(c4())],
            _ => vec![],
        };

        assert_eq!(seq.events(1.0, 8).unwrap(), vec![NoteEvent::Off(c4())]);
    }

    #[test]
    fn fallible_closure_propagates_errors() {
        let seq = |_time: f64, _beat: u8| -> Result<Vec<Note>, Error> {
            Ok(vec!["H9".parse()?])
        };

        let err = seq.events(0.0, 0).unwrap_err();
        assert!(err.to_string().contains("H9"));
    }

    #[test]
    fn boxed_sequences_dispatch_dynamically() {
        let boxed: Box<dyn Sequence> = Box::new(|_time: f64, _beat: u8| Some(c4()));
        assert_eq!(boxed.events(0.0, 3).unwrap(), vec![NoteEvent::On(c4())]);
    }
}
