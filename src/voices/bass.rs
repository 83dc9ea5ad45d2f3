//! Electric synth bass voice.
//!
//! Two slightly detuned sawtooth oscillators into a resonant low-pass
//! filter. Both the amplitude and the filter cutoff follow four-stage
//! envelopes, which gives the "wow" of a classic synth bass.
//!
//! # Node Network
//!
//! ```text
//! saw1 ─┐
//!       ├─→ lowpass (Q 5) ─→ output gain (muted until a note)
//! saw2 ─┘
//! ```
//!
//! The oscillators run continuously from construction; silence between notes
//! comes from the output gain envelope returning to zero.
//!
//! Notes have a fixed length set by the envelopes. `note_off` does nothing.

use crate::automation::EnvelopeSpec;
use crate::error::Result;
use crate::graph::node::{AttachPoint, Plugin, Voice};
use crate::io::backend::{AudioBackend, FilterType, NodeId, NodeKind, ParamKind, Waveform};
use crate::sequencing::Note;

/// Detune of each oscillator, in cents, away from the played pitch.
pub fn detune_cents() -> f32 {
    2f32.powf(1.0 / 12.0) * 7.0
}

pub struct Bass {
    input: NodeId,
    output: NodeId,
    saws: [NodeId; 2],
    filter: NodeId,
}

impl Bass {
    pub fn new(backend: &mut dyn AudioBackend) -> Self {
        let input = backend.create_node(NodeKind::Gain, &[]);
        let output = backend.create_node(NodeKind::Gain, &[(ParamKind::Gain, 0.0)]);

        let detune = detune_cents();
        let saws = [-detune, detune].map(|cents| {
            backend.create_node(
                NodeKind::Oscillator(Waveform::Sawtooth),
                &[(ParamKind::Detune, cents)],
            )
        });

        let filter = backend.create_node(NodeKind::Filter(FilterType::Lowpass), &[(ParamKind::Q, 5.0)]);

        for saw in saws {
            backend.connect(saw, filter.into());
        }
        backend.connect(filter, output.into());

        let now = backend.now();
        for saw in saws {
            backend.start(saw, now);
        }

        Self {
            input,
            output,
            saws,
            filter,
        }
    }

    pub fn oscillators(&self) -> [NodeId; 2] {
        self.saws
    }

    pub fn filter(&self) -> NodeId {
        self.filter
    }

    fn gain_envelope(time: f64) -> EnvelopeSpec {
        // 0 -> 1 -> 0.3 -> 0
        EnvelopeSpec::attack_decay(time, 0.0, 1.0, 100.0, 10.0).with_sustain(0.3, 3.0, 10.0)
    }

    fn filter_envelope(time: f64) -> EnvelopeSpec {
        // 100Hz -> 4kHz -> 1kHz -> 100Hz
        EnvelopeSpec::attack_decay(time, 100.0, 4000.0, 100.0, 10.0).with_sustain(1000.0, 5.0, 10.0)
    }
}

impl Plugin for Bass {
    fn name(&self) -> &str {
        "bass"
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

impl Voice for Bass {
    fn note_on(&mut self, backend: &mut dyn AudioBackend, time: f64, note: Note) -> Result<()> {
        let frequency = note.frequency();
        for saw in self.saws {
            backend.set_value_at(saw.param(ParamKind::Frequency), time, frequency);
        }

        let gain = Self::gain_envelope(time).compute()?;
        let filter = Self::filter_envelope(time).compute()?;
        gain.apply(backend, self.output.param(ParamKind::Gain));
        filter.apply(backend, self.filter.param(ParamKind::Frequency));
        Ok(())
    }

    fn note_off(&mut self, _backend: &mut dyn AudioBackend, _time: f64, _note: Note) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Automation, RecordingBackend};
    use float_cmp::approx_eq;

    #[test]
    fn oscillators_are_detuned_symmetrically() {
        let mut backend = RecordingBackend::new();
        let bass = Bass::new(&mut backend);

        assert_eq!(backend.signal_path(bass.oscillators()[0]), vec![
            bass.oscillators()[0],
            bass.filter(),
            bass.output().node(),
        ]);
        assert!(approx_eq!(f32, detune_cents(), 7.416, epsilon = 1e-3));
    }

    #[test]
    fn note_on_snaps_pitch_and_runs_both_envelopes() {
        let mut backend = RecordingBackend::new();
        let mut bass = Bass::new(&mut backend);
        let note: Note = "A2".parse().unwrap();

        bass.note_on(&mut backend, 1.0, note).unwrap();

        for saw in bass.oscillators() {
            assert_eq!(
                backend.automation(saw.param(ParamKind::Frequency)),
                vec![Automation::Set { time: 1.0, value: 110.0 }]
            );
        }

        let gain = backend.automation(bass.output().node().param(ParamKind::Gain));
        assert_eq!(gain.len(), 4);
        assert_eq!(gain[2].value(), 0.3);

        let cutoff = backend.automation(bass.filter().param(ParamKind::Frequency));
        let peak = cutoff.iter().map(|a| a.value()).fold(0.0, f32::max);
        assert_eq!(peak, 4000.0);
        assert_eq!(cutoff.last().map(|a| a.value()), Some(100.0));
    }

    #[test]
    fn note_off_is_silent() {
        let mut backend = RecordingBackend::new();
        let mut bass = Bass::new(&mut backend);
        let before = backend.ops().len();

        bass.note_off(&mut backend, 0.5, "C2".parse().unwrap()).unwrap();
        assert_eq!(backend.ops().len(), before);
    }
}
