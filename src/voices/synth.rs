//! Simple sawtooth synth with vibrato.
//!
//! ```text
//! saw ─→ lowpass ─→ output gain
//!  ↑
//! LFO 6Hz ─→ gain ×10 ─→ saw.frequency
//! ```
//!
//! Unlike the bass, this voice holds its note: `note_on` fades the output in
//! and `note_off` fades it out, each over 100ms.

use crate::error::Result;
use crate::graph::node::{AttachPoint, Plugin, Voice};
use crate::io::backend::{AudioBackend, FilterType, NodeId, NodeKind, ParamKind, Waveform};
use crate::sequencing::Note;

/// Fade in/out time.
pub const FADE: f64 = 0.1;

pub struct Synth {
    input: NodeId,
    output: NodeId,
    saw: NodeId,
    lfo: NodeId,
}

impl Synth {
    pub fn new(backend: &mut dyn AudioBackend) -> Self {
        let input = backend.create_node(NodeKind::Gain, &[]);
        let saw = backend.create_node(NodeKind::Oscillator(Waveform::Sawtooth), &[]);
        let lfo = backend.create_node(
            NodeKind::Oscillator(Waveform::Sine),
            &[(ParamKind::Frequency, 6.0)],
        );
        let depth = backend.create_node(NodeKind::Gain, &[(ParamKind::Gain, 10.0)]);
        let filter = backend.create_node(NodeKind::Filter(FilterType::Lowpass), &[]);
        let output = backend.create_node(NodeKind::Gain, &[(ParamKind::Gain, 0.0)]);

        backend.connect(saw, filter.into());
        backend.connect(filter, output.into());
        backend.connect(lfo, depth.into());
        backend.connect(depth, saw.param(ParamKind::Frequency).into());

        let now = backend.now();
        backend.start(saw, now);
        backend.start(lfo, now);

        Self {
            input,
            output,
            saw,
            lfo,
        }
    }

    pub fn oscillator(&self) -> NodeId {
        self.saw
    }

    pub fn lfo(&self) -> NodeId {
        self.lfo
    }
}

impl Plugin for Synth {
    fn name(&self) -> &str {
        "synth"
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

impl Voice for Synth {
    fn note_on(&mut self, backend: &mut dyn AudioBackend, time: f64, note: Note) -> Result<()> {
        backend.set_value_at(self.saw.param(ParamKind::Frequency), time, note.frequency());
        backend.linear_ramp_to(self.output.param(ParamKind::Gain), time + FADE, 1.0);
        Ok(())
    }

    fn note_off(&mut self, backend: &mut dyn AudioBackend, time: f64, _note: Note) -> Result<()> {
        backend.linear_ramp_to(self.output.param(ParamKind::Gain), time + FADE, 0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Automation, Port, RecordingBackend};

    #[test]
    fn lfo_modulates_oscillator_frequency() {
        let mut backend = RecordingBackend::new();
        let synth = Synth::new(&mut backend);

        let depth = backend.signal_path(synth.lfo())[1];
        assert_eq!(
            backend.connections_from(depth),
            vec![Port::Param(synth.oscillator().param(ParamKind::Frequency))]
        );
        assert_eq!(backend.signal_path(synth.oscillator()).last(), Some(&synth.output().node()));
    }

    #[test]
    fn note_on_then_off_fades() {
        let mut backend = RecordingBackend::new();
        let mut synth = Synth::new(&mut backend);
        let a4: Note = "A4".parse().unwrap();

        synth.note_on(&mut backend, 1.0, a4).unwrap();
        synth.note_off(&mut backend, 2.0, a4).unwrap();

        assert_eq!(
            backend.automation(synth.oscillator().param(ParamKind::Frequency)),
            vec![Automation::Set { time: 1.0, value: 440.0 }]
        );
        assert_eq!(
            backend.automation(synth.output().node().param(ParamKind::Gain)),
            vec![
                Automation::Ramp { time: 1.1, value: 1.0 },
                Automation::Ramp { time: 2.1, value: 0.0 },
            ]
        );
    }
}
