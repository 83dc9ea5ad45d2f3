//! The audio backend seen from the sequencer.
//!
//! The backend owns real audio: node creation, the connection graph and
//! sample-accurate parameter automation. The sequencer only ever talks to it
//! through [`AudioBackend`], committing events with absolute timestamps and
//! never waiting for them to play.

use crate::io::clock::Clock;

/// Opaque handle to a node created by the backend.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    Lowpass,
    Highpass,
    Bandpass,
}

/// Kinds of node the sequencer asks the backend for.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Gain,
    Oscillator(Waveform),
    Filter(FilterType),
    Compressor,
    Analyser,
    /// One second of white noise played from a buffer.
    Noise,
}

/// Automatable or configurable parameter names.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Gain,
    Frequency,
    Detune,
    Q,
    FftSize,
    MaxDecibels,
}

/// A parameter on a specific node.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    pub node: NodeId,
    pub kind: ParamKind,
}

impl NodeId {
    pub fn param(self, kind: ParamKind) -> Param {
        Param { node: self, kind }
    }
}

/// Where a connection lands: a node's audio input or one of its parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    Node(NodeId),
    Param(Param),
}

impl From<NodeId> for Port {
    fn from(node: NodeId) -> Self {
        Port::Node(node)
    }
}

impl From<Param> for Port {
    fn from(param: Param) -> Self {
        Port::Param(param)
    }
}

/// Everything the sequencer needs from an audio engine.
///
/// Times are absolute seconds in the same domain as [`Clock::now`].
pub trait AudioBackend: Clock {
    fn create_node(&mut self, kind: NodeKind, params: &[(ParamKind, f32)]) -> NodeId;

    /// The final output (speakers).
    fn destination(&self) -> NodeId;

    fn connect(&mut self, src: NodeId, dst: Port);

    /// Remove every outgoing connection of `src`. Safe to repeat.
    fn disconnect(&mut self, src: NodeId);

    /// Jump `param` to `value` at `time`.
    fn set_value_at(&mut self, param: Param, time: f64, value: f32);

    /// Ramp `param` linearly from its previous event to `value`, arriving at `time`.
    fn linear_ramp_to(&mut self, param: Param, time: f64, value: f32);

    fn start(&mut self, node: NodeId, time: f64);

    fn stop(&mut self, node: NodeId, time: f64);
}
