//! Simple drum kit voice.
//!
//! C4 plays a kick, every other note plays a snare. Each hit creates fresh
//! backend nodes, starts them at the hit time and stops them once the last
//! envelope has come to rest, so overlapping hits never interfere.
//!
//! # Drum Body
//!
//! Both drums share the same body: a sine whose frequency drops from a start
//! pitch to an end pitch while its gain falls from full to silent.
//!
//! ```text
//! sine ─→ gain ─→ output
//! ```
//!
//! The frequency envelope has zero attack so the pitch snaps to the start
//! frequency and sweeps down. The gain envelope has a very short attack to
//! avoid a click.
//!
//! # Snare
//!
//! The snare adds filtered white noise on top of a higher, slower body:
//!
//! ```text
//! noise ─→ lowpass 4kHz (Q 5) ─→ gain ─→ output
//! ```

use crate::automation::EnvelopeSpec;
use crate::error::Result;
use crate::graph::node::{AttachPoint, Plugin, Voice};
use crate::io::backend::{AudioBackend, FilterType, NodeId, NodeKind, ParamKind, Waveform};
use crate::sequencing::{Note, PitchClass};

/// Pitch sweep and decay rates of one drum body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumBody {
    pub start_frequency: f32,
    pub end_frequency: f32,
    pub frequency_decay: f64,
    pub gain_decay: f64,
}

pub const KICK: DrumBody = DrumBody {
    start_frequency: 150.0,
    end_frequency: 100.0,
    frequency_decay: 60.0,
    gain_decay: 10.0,
};

const SNARE_DECAY: f64 = 3.0;

pub const SNARE: DrumBody = DrumBody {
    start_frequency: 400.0,
    end_frequency: 100.0,
    frequency_decay: SNARE_DECAY,
    gain_decay: SNARE_DECAY,
};

pub struct Drums {
    input: NodeId,
    output: NodeId,
}

impl Drums {
    pub fn new(backend: &mut dyn AudioBackend) -> Self {
        Self {
            input: backend.create_node(NodeKind::Gain, &[]),
            output: backend.create_node(NodeKind::Gain, &[]),
        }
    }

    fn is_kick(note: Note) -> bool {
        note.pitch() == PitchClass::C && note.octave() == 4
    }

    /// Play one drum body into `dest`. Returns the time the sine stops.
    pub fn body(
        backend: &mut dyn AudioBackend,
        time: f64,
        dest: NodeId,
        body: DrumBody,
    ) -> Result<f64> {
        let sine = backend.create_node(NodeKind::Oscillator(Waveform::Sine), &[]);
        let gain = backend.create_node(NodeKind::Gain, &[]);
        backend.connect(sine, gain.into());
        backend.connect(gain, dest.into());

        let sweep = EnvelopeSpec::attack_decay(
            time,
            body.end_frequency,
            body.start_frequency,
            0.0,
            body.frequency_decay,
        )
        .compute()?;
        let level = EnvelopeSpec::attack_decay(time, 0.0, 1.0, 1000.0, body.gain_decay).compute()?;

        let frequency_end = sweep.apply(backend, sine.param(ParamKind::Frequency));
        let gain_end = level.apply(backend, gain.param(ParamKind::Gain));
        let end = frequency_end.max(gain_end);

        backend.start(sine, time);
        backend.stop(sine, end);
        Ok(end)
    }

    fn kick(&self, backend: &mut dyn AudioBackend, time: f64) -> Result<f64> {
        Self::body(backend, time, self.output, KICK)
    }

    fn snare(&self, backend: &mut dyn AudioBackend, time: f64) -> Result<f64> {
        let gain = backend.create_node(NodeKind::Gain, &[]);
        backend.connect(gain, self.output.into());
        let end = EnvelopeSpec::attack_decay(time, 0.0, 1.0, 0.0, SNARE_DECAY)
            .compute()?
            .apply(backend, gain.param(ParamKind::Gain));

        let noise = backend.create_node(NodeKind::Noise, &[]);
        let filter = backend.create_node(
            NodeKind::Filter(FilterType::Lowpass),
            &[(ParamKind::Frequency, 4000.0), (ParamKind::Q, 5.0)],
        );
        backend.connect(noise, filter.into());
        backend.connect(filter, gain.into());
        backend.start(noise, time);
        backend.stop(noise, end);

        let body_end = Self::body(backend, time, self.output, SNARE)?;
        Ok(end.max(body_end))
    }
}

impl Plugin for Drums {
    fn name(&self) -> &str {
        "drums"
    }

    fn input(&self) -> AttachPoint {
        self.input.into()
    }

    fn output(&self) -> AttachPoint {
        self.output.into()
    }

    fn as_voice_mut(&mut self) -> Option<&mut dyn Voice> {
        Some(self)
    }
}

impl Voice for Drums {
    fn note_on(&mut self, backend: &mut dyn AudioBackend, time: f64, note: Note) -> Result<()> {
        if Self::is_kick(note) {
            self.kick(backend, time)?;
        } else {
            self.snare(backend, time)?;
        }
        Ok(())
    }

    fn note_off(&mut self, _backend: &mut dyn AudioBackend, _time: f64, _note: Note) -> Result<()> {
        Ok(())
    }
}
