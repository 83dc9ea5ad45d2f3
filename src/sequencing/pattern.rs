/*
Step Patterns
=============

A grid alternative to writing a sequence closure. One pattern is sixteen
steps; each step holds the note events to fire on that beat.

    step:  0 1 2 3 4 5 6 7 8 9 A B C D E F
    kick:  x . . . x . . . x . . . x . . .
    snare: . . . . x . . . . . . . x . . .

    let kick = StepPattern::new().every(4, 0, c4);
    let snare = StepPattern::new().hit(4, d4).hit(12, d4);

Because the grid is data, a step pattern does not depend on the beat time;
it answers the same events every cycle.
*/

use crate::error::BoxError;
use crate::sequencing::notes::Note;
use crate::sequencing::sequence::{NoteEvent, Sequence, BEATS_PER_PATTERN};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepPattern {
    steps: [Vec<NoteEvent>; BEATS_PER_PATTERN as usize],
}

impl StepPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from one optional note per step (note-on only).
    pub fn from_steps(steps: [Option<Note>; BEATS_PER_PATTERN as usize]) -> Self {
        let mut pattern = Self::new();
        for (step, note) in steps.into_iter().enumerate() {
            if let Some(note) = note {
                pattern.steps[step].push(NoteEvent::On(note));
            }
        }
        pattern
    }

    /// Trigger `note` on `step`.
    pub fn hit(self, step: u8, note: Note) -> Self {
        self.push(step, NoteEvent::On(note))
    }

    /// Release `note` on `step`.
    pub fn release(self, step: u8, note: Note) -> Self {
        self.push(step, NoteEvent::Off(note))
    }

    /// Trigger `note` every `interval` steps starting at `offset`.
    pub fn every(mut self, interval: u8, offset: u8, note: Note) -> Self {
        if interval == 0 {
            log::warn!("ignoring step interval of zero for {note}");
            return self;
        }
        let mut step = offset;
        while step < BEATS_PER_PATTERN {
            self = self.push(step, NoteEvent::On(note));
            step = step.saturating_add(interval);
        }
        self
    }

    pub fn step(&self, step: u8) -> &[NoteEvent] {
        self.steps
            .get(step as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.steps.iter().all(Vec::is_empty)
    }

    fn push(mut self, step: u8, event: NoteEvent) -> Self {
        match self.steps.get_mut(step as usize) {
            Some(slot) => slot.push(event),
            None => log::warn!(
                "step {step} is outside the {BEATS_PER_PATTERN}-step pattern, dropping {event:?}"
            ),
        }
        self
    }
}

impl Sequence for StepPattern {
    fn events(&self, _time: f64, beat: u8) -> Result<Vec<NoteEvent>, BoxError> {
        Ok(self.step(beat).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str) -> Note {
        id.parse().unwrap()
    }

    #[test]
    fn every_fills_the_grid() {
        let kick = StepPattern::new().every(4, 0, note("C4"));

        for beat in 0..BEATS_PER_PATTERN {
            let expected = if beat % 4 == 0 {
                vec![NoteEvent::On(note("C4"))]
            } else {
                vec![]
            };
            assert_eq!(kick.events(0.0, beat).unwrap(), expected, "beat {beat}");
        }
    }

    #[test]
    fn hits_and_releases_share_a_step() {
        let pattern = StepPattern::new()
            .hit(8, note("E4"))
            .release(8, note("C4"));

        assert_eq!(
            pattern.step(8),
            &[NoteEvent::On(note("E4")), NoteEvent::Off(note("C4"))]
        );
    }

    #[test]
    fn out_of_range_steps_are_dropped() {
        let pattern = StepPattern::new().hit(16, note("C4")).hit(200, note("C4"));
        assert!(pattern.is_empty());
        assert!(pattern.step(16).is_empty());
    }

    #[test]
    fn from_steps_matches_builder() {
        let mut steps = [None; 16];
        steps[0] = Some(note("C2"));
        steps[8] = Some(note("D2"));

        let built = StepPattern::new().hit(0, note("C2")).hit(8, note("D2"));
        assert_eq!(StepPattern::from_steps(steps), built);
    }

    #[test]
    fn zero_interval_is_ignored() {
        assert!(StepPattern::new().every(0, 0, note("C4")).is_empty());
    }
}
