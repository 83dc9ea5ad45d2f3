/*
Transport State
===============

The transport walks a virtual cursor over (sequence index, beat index):

  sequence 0: beat 0 1 2 ... 15 │ sequence 1: beat 0 1 ... 15 │ ... │ wrap
                                ↑
                        beat index wraps, sequence index moves on

Each beat is a sixteenth note, so at `bpm` one beat lasts

  beat_duration = 0.25 * 60 / bpm        (120 bpm → 0.125 s)

Beat Times
----------

The time of the next beat is not accumulated. Adding 0.125 to a running
total again and again drifts after a few thousand beats; instead the state
keeps an anchor time and a beat count since the anchor:

  next_beat_time = anchor + beats_since_anchor * beat_duration

A tempo change re-anchors at the next beat time, so the beat already due
keeps its time and the new tempo applies from the following beat. Changing
tempo is therefore eventually visible, never mid-beat.

End Of Song
-----------

When the sequence index reaches the pattern count it wraps to 0. With
looping off the transport then stops, leaving the cursor at 0/0 so a later
play starts the song from the top.
*/

use crate::error::{Error, Result};
use crate::sequencing::BEATS_PER_PATTERN;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
}

/// One dispatched beat.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    pub time: f64,
    pub sequence_index: usize,
    pub beat_index: u8,
}

pub const DEFAULT_BPM: f64 = 120.0;

/// Seconds per beat (sixteenth note) at `bpm`.
pub fn beat_duration(bpm: f64) -> f64 {
    0.25 * 60.0 / bpm
}

pub(crate) fn validate_bpm(bpm: f64) -> Result<f64> {
    if bpm > 0.0 && bpm.is_finite() {
        Ok(bpm)
    } else {
        Err(Error::InvalidTempo(bpm))
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportState {
    play_state: PlayState,
    bpm: f64,
    sequence_index: usize,
    beat_index: u8,
    anchor_time: f64,
    beats_since_anchor: u64,
    looping: bool,
}

impl Default for TransportState {
    /// Stopped at 0/0, 120 bpm, looping.
    fn default() -> Self {
        Self {
            play_state: PlayState::Stopped,
            bpm: DEFAULT_BPM,
            sequence_index: 0,
            beat_index: 0,
            anchor_time: 0.0,
            beats_since_anchor: 0,
            looping: true,
        }
    }
}

impl TransportState {
    pub fn new(bpm: f64, looping: bool) -> Result<Self> {
        Ok(Self {
            bpm: validate_bpm(bpm)?,
            looping,
            ..Self::default()
        })
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn is_playing(&self) -> bool {
        self.play_state == PlayState::Playing
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn beat_duration(&self) -> f64 {
        beat_duration(self.bpm)
    }

    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn beat_index(&self) -> u8 {
        self.beat_index
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn next_beat_time(&self) -> f64 {
        self.anchor_time + self.beats_since_anchor as f64 * self.beat_duration()
    }

    /// The beat the cursor points at.
    pub fn current_beat(&self) -> Beat {
        Beat {
            time: self.next_beat_time(),
            sequence_index: self.sequence_index,
            beat_index: self.beat_index,
        }
    }

    /// Start playing with the next beat at `time`. The cursor is kept.
    pub fn start_at(&mut self, time: f64) {
        self.play_state = PlayState::Playing;
        self.anchor_time = time;
        self.beats_since_anchor = 0;
    }

    pub fn stop(&mut self) {
        self.play_state = PlayState::Stopped;
    }

    /// Zero both cursors.
    pub fn rewind(&mut self) {
        self.sequence_index = 0;
        self.beat_index = 0;
    }

    /// Change tempo from the next beat on. Invalid tempos leave the state
    /// untouched.
    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        let bpm = validate_bpm(bpm)?;
        self.anchor_time = self.next_beat_time();
        self.beats_since_anchor = 0;
        self.bpm = bpm;
        Ok(())
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Move the cursor one beat forward. Returns `true` when the song ran
    /// out with looping off and the transport stopped.
    pub fn advance(&mut self, pattern_count: usize) -> bool {
        self.beats_since_anchor += 1;
        self.beat_index += 1;

        if self.beat_index < BEATS_PER_PATTERN {
            return false;
        }
        self.beat_index = 0;
        self.sequence_index += 1;

        if self.sequence_index < pattern_count {
            return false;
        }
        self.sequence_index = 0;

        if self.looping {
            false
        } else {
            self.stop();
            true
        }
    }
}
