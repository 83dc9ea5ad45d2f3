//! Single backend node used as a chain effect.

use crate::graph::node::{AttachPoint, Plugin};
use crate::io::backend::{AudioBackend, FilterType, NodeId, NodeKind, ParamKind};

/// FFT size the analyser is created with.
pub const ANALYSER_FFT_SIZE: f32 = 256.0;

/// One node whose input and output are the same.
#[derive(Debug)]
pub struct NodePlugin {
    name: &'static str,
    node: NodeId,
}

impl NodePlugin {
    pub fn new(
        backend: &mut dyn AudioBackend,
        name: &'static str,
        kind: NodeKind,
        params: &[(ParamKind, f32)],
    ) -> Self {
        Self {
            name,
            node: backend.create_node(kind, params),
        }
    }

    pub fn compressor(backend: &mut dyn AudioBackend) -> Self {
        Self::new(backend, "compressor", NodeKind::Compressor, &[])
    }

    pub fn analyser(backend: &mut dyn AudioBackend) -> Self {
        Self::new(
            backend,
            "analyser",
            NodeKind::Analyser,
            &[
                (ParamKind::FftSize, ANALYSER_FFT_SIZE),
                (ParamKind::MaxDecibels, 0.0),
            ],
        )
    }

    pub fn gain(backend: &mut dyn AudioBackend, level: f32) -> Self {
        Self::new(backend, "gain", NodeKind::Gain, &[(ParamKind::Gain, level)])
    }

    pub fn filter(backend: &mut dyn AudioBackend, filter: FilterType, cutoff: f32, q: f32) -> Self {
        Self::new(
            backend,
            "filter",
            NodeKind::Filter(filter),
            &[(ParamKind::Frequency, cutoff), (ParamKind::Q, q)],
        )
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Plugin for NodePlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn input(&self) -> AttachPoint {
        self.node.into()
    }

    fn output(&self) -> AttachPoint {
        self.node.into()
    }
}
