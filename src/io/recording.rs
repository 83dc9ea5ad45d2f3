//! In-memory backend that records every call.
//!
//! Nothing is rendered. The backend keeps the live connection graph and a
//! log of every operation so tests can assert on signal paths and committed
//! automation, and demos can print what would have been played.

use crate::io::backend::{AudioBackend, NodeId, NodeKind, Param, ParamKind, Port};
use crate::io::clock::{Clock, ManualClock};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOp {
    Create {
        node: NodeId,
        kind: NodeKind,
        params: Vec<(ParamKind, f32)>,
    },
    Connect {
        src: NodeId,
        dst: Port,
    },
    Disconnect {
        src: NodeId,
    },
    SetValue {
        param: Param,
        time: f64,
        value: f32,
    },
    LinearRamp {
        param: Param,
        time: f64,
        value: f32,
    },
    Start {
        node: NodeId,
        time: f64,
    },
    Stop {
        node: NodeId,
        time: f64,
    },
}

/// How an automation event moves its parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Automation {
    Set { time: f64, value: f32 },
    Ramp { time: f64, value: f32 },
}

impl Automation {
    pub fn time(&self) -> f64 {
        match self {
            Automation::Set { time, .. } | Automation::Ramp { time, .. } => *time,
        }
    }

    pub fn value(&self) -> f32 {
        match self {
            Automation::Set { value, .. } | Automation::Ramp { value, .. } => *value,
        }
    }
}

pub struct RecordingBackend<C: Clock = ManualClock> {
    clock: C,
    destination: NodeId,
    nodes: Vec<NodeKind>,
    edges: Vec<(NodeId, Port)>,
    ops: Vec<BackendOp>,
}

impl RecordingBackend<ManualClock> {
    /// Backend driven by a fresh manual clock at time zero.
    pub fn new() -> Self {
        Self::with_clock(ManualClock::new())
    }
}

impl Default for RecordingBackend<ManualClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RecordingBackend<C> {
    pub fn with_clock(clock: C) -> Self {
        // Node 0 is the destination
        Self {
            clock,
            destination: NodeId(0),
            nodes: vec![NodeKind::Gain],
            edges: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ops(&self) -> &[BackendOp] {
        &self.ops
    }

    /// Drain the operation log, keeping nodes and connections.
    pub fn take_ops(&mut self) -> Vec<BackendOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(node.0 as usize).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Live outgoing connections of `src`, in connection order.
    pub fn connections_from(&self, src: NodeId) -> Vec<Port> {
        self.edges
            .iter()
            .filter(|(from, _)| *from == src)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Follow node-to-node connections from `from` while each node has
    /// exactly one audio output. The returned path starts with `from`.
    pub fn signal_path(&self, from: NodeId) -> Vec<NodeId> {
        let mut path = vec![from];
        let mut current = from;

        loop {
            let outputs: Vec<NodeId> = self
                .connections_from(current)
                .into_iter()
                .filter_map(|port| match port {
                    Port::Node(node) => Some(node),
                    Port::Param(_) => None,
                })
                .collect();

            match outputs.as_slice() {
                [next] if !path.contains(next) => {
                    path.push(*next);
                    current = *next;
                }
                _ => return path,
            }
        }
    }

    /// Every automation event committed for `param`, in commit order.
    pub fn automation(&self, param: Param) -> Vec<Automation> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                BackendOp::SetValue { param: p, time, value } if *p == param => {
                    Some(Automation::Set { time: *time, value: *value })
                }
                BackendOp::LinearRamp { param: p, time, value } if *p == param => {
                    Some(Automation::Ramp { time: *time, value: *value })
                }
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, op: BackendOp) {
        log::trace!("backend: {op:?}");
        self.ops.push(op);
    }
}

impl<C: Clock> Clock for RecordingBackend<C> {
    fn now(&self) -> f64 {
        self.clock.now()
    }
}

impl<C: Clock> AudioBackend for RecordingBackend<C> {
    fn create_node(&mut self, kind: NodeKind, params: &[(ParamKind, f32)]) -> NodeId {
        let node = NodeId(self.nodes.len() as u32);
        self.nodes.push(kind);
        self.record(BackendOp::Create {
            node,
            kind,
            params: params.to_vec(),
        });
        node
    }

    fn destination(&self) -> NodeId {
        self.destination
    }

    fn connect(&mut self, src: NodeId, dst: Port) {
        if !self.edges.contains(&(src, dst)) {
            self.edges.push((src, dst));
        }
        self.record(BackendOp::Connect { src, dst });
    }

    fn disconnect(&mut self, src: NodeId) {
        self.edges.retain(|(from, _)| *from != src);
        self.record(BackendOp::Disconnect { src });
    }

    fn set_value_at(&mut self, param: Param, time: f64, value: f32) {
        self.record(BackendOp::SetValue { param, time, value });
    }

    fn linear_ramp_to(&mut self, param: Param, time: f64, value: f32) {
        self.record(BackendOp::LinearRamp { param, time, value });
    }

    fn start(&mut self, node: NodeId, time: f64) {
        self.record(BackendOp::Start { node, time });
    }

    fn stop(&mut self, node: NodeId, time: f64) {
        self.record(BackendOp::Stop { node, time });
    }
}
