/*
Plugins and Voices
==================

Everything that sits in a track's signal chain is a Plugin. A plugin owns
the backend nodes it created and exposes two attachment points:

  input  ──→ [ plugin's own nodes ] ──→ output

For a single-node effect (compressor, analyser) input and output are the
same node. For an instrument the input is usually a silent gain node that
nothing feeds, and the output is the instrument's amplitude stage.

Capabilities
------------

  Plugin   {connect, disconnect}        every chain member
  Voice    {note_on, note_off}          optional, instruments only

Voice is a separate trait. A plugin advertises it through
`Plugin::as_voice_mut`, and a track checks for it once when the plugin is
added, never by calling note methods speculatively.

Connection Targets
------------------

A connection target is either a raw backend node or another plugin's input.
`Destination` captures both and resolves to an `AttachPoint` at the API
boundary, so nothing downstream needs to know which it was.
*/

use crate::error::Result;
use crate::io::backend::{AudioBackend, NodeId};
use crate::sequencing::Note;

/// Normalized connection point: the backend node a signal enters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachPoint(NodeId);

impl AttachPoint {
    pub fn node(self) -> NodeId {
        self.0
    }
}

impl From<NodeId> for AttachPoint {
    fn from(node: NodeId) -> Self {
        Self(node)
    }
}

/// Something a signal can be sent into.
pub enum Destination<'a> {
    Node(NodeId),
    Plugin(&'a dyn Plugin),
}

impl Destination<'_> {
    pub fn resolve(&self) -> AttachPoint {
        match self {
            Destination::Node(node) => AttachPoint(*node),
            Destination::Plugin(plugin) => plugin.input(),
        }
    }
}

impl From<AttachPoint> for Destination<'_> {
    fn from(point: AttachPoint) -> Self {
        Destination::Node(point.node())
    }
}

impl From<NodeId> for Destination<'_> {
    fn from(node: NodeId) -> Self {
        Destination::Node(node)
    }
}

impl<'a> From<&'a dyn Plugin> for Destination<'a> {
    fn from(plugin: &'a dyn Plugin) -> Self {
        Destination::Plugin(plugin)
    }
}

/// Note events turned into parameter automation.
pub trait Voice {
    fn note_on(&mut self, backend: &mut dyn AudioBackend, time: f64, note: Note) -> Result<()>;

    fn note_off(&mut self, backend: &mut dyn AudioBackend, time: f64, note: Note) -> Result<()>;
}

/// A unit in a signal chain.
pub trait Plugin: Send {
    fn name(&self) -> &str;

    fn input(&self) -> AttachPoint;

    fn output(&self) -> AttachPoint;

    /// Route this plugin's output into `dest`, replacing any previous
    /// connection.
    fn connect(&mut self, backend: &mut dyn AudioBackend, dest: Destination<'_>) {
        let dest = dest.resolve();
        let output = self.output().node();
        backend.disconnect(output);
        backend.connect(output, dest.node().into());
    }

    /// Detach the output. Safe to call when already disconnected.
    fn disconnect(&mut self, backend: &mut dyn AudioBackend) {
        backend.disconnect(self.output().node());
    }

    /// The voice capability, if this plugin plays notes.
    fn as_voice_mut(&mut self) -> Option<&mut dyn Voice> {
        None
    }
}
