/*
Note Table
==========

Eight octaves (C0..B7) of the equal tempered scale, tuned to A4 = 440 Hz.

Naming Convention:
- Natural notes: C4, D4, E4, etc.
- Sharps use a lower-case `s`: Cs4 (C#4), Fs2 (F#2), etc.
- No flats. Every pitch has exactly one identifier, so the table has
  12 symbols x 8 octaves = 96 entries.

The formula:

    f(n) = 440 * 2^(n / 12)

where n is the number of semitones from A4:

    n = (octave - 4) * 12 + (symbol_index - 9)

    C3 is 21 steps below A4 (-12 - 9 + 0)
    C4 is  9 steps below A4 (  0 - 9 + 0)
    C5 is  3 steps above A4 ( 12 - 9 + 0)

We evaluate this as `440 * 2^((symbol_index - 9) / 12) * 2^(octave - 4)`.
Mathematically identical, but multiplying by a power of two is exact in
floating point, so an octave up is exactly double the frequency and A4 is
exactly 440.0.
*/

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};

/// Number of octaves in the table (C0..B7).
pub const OCTAVES: u8 = 8;

/// Semitones per octave.
pub const SEMITONES: u8 = 12;

const A4_HZ: f32 = 440.0;

/// Pitch class within one octave, C first.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Semitones above C in the same octave.
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "Cs",
            PitchClass::D => "D",
            PitchClass::Ds => "Ds",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "Fs",
            PitchClass::G => "G",
            PitchClass::Gs => "Gs",
            PitchClass::A => "A",
            PitchClass::As => "As",
            PitchClass::B => "B",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pc| pc.symbol() == symbol)
    }
}

/// A note in the table: pitch class plus octave 0..=7.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Note {
    octave: u8,
    pitch: PitchClass,
}

impl Note {
    pub fn new(pitch: PitchClass, octave: u8) -> Result<Self> {
        if octave >= OCTAVES {
            return Err(Error::InvalidOctave(octave));
        }
        Ok(Self { octave, pitch })
    }

    pub fn pitch(&self) -> PitchClass {
        self.pitch
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    /// Signed semitone distance from A4.
    pub fn semitones_from_a4(&self) -> i32 {
        (self.octave as i32 - 4) * SEMITONES as i32 + self.pitch.index() as i32 - 9
    }

    /// Frequency in hertz, read from the process-wide table.
    pub fn frequency(&self) -> f32 {
        NoteTable::global().frequency(*self)
    }

    fn table_index(&self) -> usize {
        self.octave as usize * SEMITONES as usize + self.pitch.index() as usize
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch.symbol(), self.octave)
    }
}

impl FromStr for Note {
    type Err = Error;

    /// Parses identifiers such as `A4` or `Cs2`.
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || Error::UnknownNote(s.to_string());

        let split = s
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit())
            .map(|(i, _)| i)
            .ok_or_else(unknown)?;
        let (symbol, octave) = s.split_at(split);

        let pitch = PitchClass::from_symbol(symbol).ok_or_else(unknown)?;
        if octave.len() != 1 {
            return Err(unknown());
        }
        let octave: u8 = octave.parse().map_err(|_| unknown())?;

        Note::new(pitch, octave).map_err(|_| unknown())
    }
}

impl TryFrom<&str> for Note {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

/// Precomputed frequencies for every note, C0 first.
#[derive(Debug, Clone)]
pub struct NoteTable {
    frequencies: [f32; OCTAVES as usize * SEMITONES as usize],
}

static GLOBAL: Lazy<NoteTable> = Lazy::new(NoteTable::build);

impl NoteTable {
    /// The shared table, built on first access and immutable afterwards.
    pub fn global() -> &'static NoteTable {
        &GLOBAL
    }

    fn build() -> Self {
        let mut frequencies = [0.0; OCTAVES as usize * SEMITONES as usize];

        for octave in 0..OCTAVES {
            let octave_scale = 2.0_f32.powi(octave as i32 - 4);
            for pitch in PitchClass::ALL {
                // Offset from A within octave 4, then shifted by whole octaves
                let within = (pitch.index() as f32 - 9.0) / SEMITONES as f32;
                let note = Note { octave, pitch };
                frequencies[note.table_index()] = A4_HZ * 2.0_f32.powf(within) * octave_scale;
            }
        }

        Self { frequencies }
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn frequency(&self, note: Note) -> f32 {
        self.frequencies[note.table_index()]
    }

    /// Look up a note by identifier, e.g. `"C4"`.
    pub fn frequency_of(&self, identifier: &str) -> Result<f32> {
        let note: Note = identifier.parse()?;
        Ok(self.frequency(note))
    }

    /// Iterate all entries in ascending pitch order.
    pub fn iter(&self) -> impl Iterator<Item = (Note, f32)> + '_ {
        (0..OCTAVES).flat_map(move |octave| {
            PitchClass::ALL.into_iter().map(move |pitch| {
                let note = Note { octave, pitch };
                (note, self.frequency(note))
            })
        })
    }
}

/// Shorthand for `NoteTable::global().frequency_of(identifier)`.
pub fn frequency_of(identifier: &str) -> Result<f32> {
    NoteTable::global().frequency_of(identifier)
}
