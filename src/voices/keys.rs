//! Single-oscillator key voice.
//!
//! Every hit builds its own short network and tears it down when the
//! envelope ends:
//!
//! ```text
//! oscillator (fixed pitch) ─→ gain ─→ output
//! ```
//!
//! The gain follows a fast strike into a held 0.6 level that fades out, so
//! notes ring on their own and `note_off` has nothing to do. The waveform
//! picks the flavour: [`Keys::saw`], [`Keys::piano`] (sine) or
//! [`Keys::retro`] (square).

use crate::automation::EnvelopeSpec;
use crate::error::Result;
use crate::graph::node::{AttachPoint, Plugin, Voice};
use crate::io::backend::{AudioBackend, NodeId, NodeKind, ParamKind, Waveform};
use crate::sequencing::Note;

/// Level the strike settles on before fading out.
pub const KEYS_SUSTAIN: f32 = 0.6;

pub struct Keys {
    waveform: Waveform,
    input: NodeId,
    output: NodeId,
}

impl Keys {
    pub fn new(backend: &mut dyn AudioBackend, waveform: Waveform) -> Self {
        Self {
            waveform,
            input: backend.create_node(NodeKind::Gain, &[]),
            output: backend.create_node(NodeKind::Gain, &[]),
        }
    }

    pub fn saw(backend: &mut dyn AudioBackend) -> Self {
        Self::new(backend, Waveform::Sawtooth)
    }

    pub fn piano(backend: &mut dyn AudioBackend) -> Self {
        Self::new(backend, Waveform::Sine)
    }

    pub fn retro(backend: &mut dyn AudioBackend) -> Self {
        Self::new(backend, Waveform::Square)
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    fn strike(time: f64) -> EnvelopeSpec {
        EnvelopeSpec::attack_decay(time, 0.0, 1.0, 1000.0, 1000.0).with_sustain(KEYS_SUSTAIN, 3.0, 10.0)
    }

    /// Play `note` at `time`. Returns the time the oscillator stops.
    pub fn hit(&self, backend: &mut dyn AudioBackend, time: f64, note: Note) -> Result<f64> {
        let envelope = Self::strike(time).compute()?;

        let osc = backend.create_node(
            NodeKind::Oscillator(self.waveform),
            &[(ParamKind::Frequency, note.frequency())],
        );
        let gain = backend.create_node(NodeKind::Gain, &[]);
        backend.connect(osc, gain.into());
        backend.connect(gain, self.output.into());

        let end = envelope.apply(backend, gain.param(ParamKind::Gain));
        backend.start(osc, time);
        backend.stop(osc, end);
        Ok(end)
    }
}

impl Plugin for Keys {
    fn name(&self) -> &str {
        match self.waveform {
            Waveform::Sawtooth => "saw keys",
            Waveform::Sine => "piano",
            Waveform::Square => "retro keys",
            Waveform::Triangle => "keys",
        }
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

impl Voice for Keys {
    fn note_on(&mut self, backend: &mut dyn AudioBackend, time: f64, note: Note) -> Result<()> {
        self.hit(backend, time, note)?;
        Ok(())
    }

    fn note_off(&mut self, _backend: &mut dyn AudioBackend, _time: f64, _note: Note) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BackendOp, RecordingBackend};
    use float_cmp::approx_eq;

    fn created(backend: &RecordingBackend, kind: NodeKind) -> Vec<NodeId> {
        backend
            .ops()
            .iter()
            .filter_map(|op| match op {
                BackendOp::Create { node, kind: k, .. } if *k == kind => Some(*node),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn oscillator_stops_when_the_envelope_ends() {
        let mut backend = RecordingBackend::new();
        let keys = Keys::piano(&mut backend);

        let end = keys.hit(&mut backend, 1.0, "A4".parse().unwrap()).unwrap();

        let expected = 1.0 + 0.001 + 0.001 + 1.0 / 3.0 + 0.1;
        assert!(approx_eq!(f64, end, expected, epsilon = 1e-9));

        let osc = created(&backend, NodeKind::Oscillator(Waveform::Sine));
        assert_eq!(osc.len(), 1);
        let stop = backend.ops().iter().find_map(|op| match op {
            BackendOp::Stop { node, time } if *node == osc[0] => Some(*time),
            _ => None,
        });
        assert_eq!(stop, Some(end));
    }

    #[test]
    fn strike_holds_at_sustain_level() {
        let mut backend = RecordingBackend::new();
        let mut keys = Keys::retro(&mut backend);
        keys.note_on(&mut backend, 0.0, "C4".parse().unwrap()).unwrap();

        let gains = created(&backend, NodeKind::Gain);
        // input, output, then the per-hit gain
        let hit_gain = gains[2];
        let values: Vec<f32> = backend
            .automation(hit_gain.param(ParamKind::Gain))
            .iter()
            .map(|a| a.value())
            .collect();
        assert_eq!(values, vec![0.0, 1.0, KEYS_SUSTAIN, 0.0]);

        let osc = created(&backend, NodeKind::Oscillator(Waveform::Square))[0];
        assert_eq!(backend.signal_path(osc), vec![osc, hit_gain, keys.output().node()]);
    }

    #[test]
    fn each_hit_gets_its_own_oscillator() {
        let mut backend = RecordingBackend::new();
        let mut keys = Keys::saw(&mut backend);
        keys.note_on(&mut backend, 0.0, "C4".parse().unwrap()).unwrap();
        keys.note_on(&mut backend, 0.1, "E4".parse().unwrap()).unwrap();
        keys.note_off(&mut backend, 0.2, "C4".parse().unwrap()).unwrap();

        assert_eq!(created(&backend, NodeKind::Oscillator(Waveform::Sawtooth)).len(), 2);
        assert_eq!(keys.name(), "saw keys");
    }
}
