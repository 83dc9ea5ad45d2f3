//! Track - an ordered plugin chain playing a list of sequences.
//!
//! ```text
//! input ─→ plugin 0 ─→ plugin 1 ─→ ... ─→ plugin n ─→ output ─→ destination
//! ```
//!
//! Plugin 0 is the instrument: note events from the sequences go to its
//! voice. Later plugins are effects. With no plugins the input passes
//! straight to the output.

use crate::error::{Error, Result};
use crate::graph::node::{AttachPoint, Destination, Plugin};
use crate::io::backend::{AudioBackend, NodeId, NodeKind};
use crate::sequencing::{NoteEvent, Sequence};

pub struct Track {
    input: NodeId,
    output: NodeId,
    plugins: Vec<Box<dyn Plugin>>,
    sequences: Vec<Box<dyn Sequence>>,
    destination: Option<AttachPoint>,
}

impl Track {
    pub fn new(backend: &mut dyn AudioBackend) -> Self {
        let input = backend.create_node(NodeKind::Gain, &[]);
        let output = backend.create_node(NodeKind::Gain, &[]);
        backend.connect(input, output.into());

        Self {
            input,
            output,
            plugins: Vec::new(),
            sequences: Vec::new(),
            destination: None,
        }
    }

    pub fn input(&self) -> AttachPoint {
        self.input.into()
    }

    pub fn output(&self) -> AttachPoint {
        self.output.into()
    }

    /// Append `plugin` to the end of the chain.
    pub fn add_plugin<P: Plugin + 'static>(&mut self, backend: &mut dyn AudioBackend, plugin: P) {
        self.add_boxed_plugin(backend, Box::new(plugin));
    }

    pub fn add_boxed_plugin(&mut self, backend: &mut dyn AudioBackend, mut plugin: Box<dyn Plugin>) {
        match self.plugins.last_mut() {
            Some(last) => last.connect(backend, plugin.input().into()),
            None => {
                backend.disconnect(self.input);
                backend.connect(self.input, plugin.input().node().into());
            }
        }
        plugin.connect(backend, self.output().into());

        if self.plugins.is_empty() && plugin.as_voice_mut().is_none() {
            log::debug!(
                "track instrument `{}` does not play notes; sequence events will be dropped",
                plugin.name()
            );
        }
        self.plugins.push(plugin);
    }

    pub fn plugins(&self) -> &[Box<dyn Plugin>] {
        &self.plugins
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn add_sequence<S: Sequence + 'static>(&mut self, sequence: S) {
        self.sequences.push(Box::new(sequence));
    }

    pub fn add_boxed_sequence(&mut self, sequence: Box<dyn Sequence>) {
        self.sequences.push(sequence);
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn clear_sequences(&mut self) {
        self.sequences.clear();
    }

    /// Send the track output to `dest` (a node, an attach point or a
    /// plugin), replacing any previous connection.
    pub fn connect<'a>(&mut self, backend: &mut dyn AudioBackend, dest: impl Into<Destination<'a>>) {
        let dest = dest.into().resolve();
        backend.disconnect(self.output);
        backend.connect(self.output, dest.node().into());
        self.destination = Some(dest);
    }

    /// Safe to call when not connected.
    pub fn disconnect(&mut self, backend: &mut dyn AudioBackend) {
        if self.destination.take().is_some() {
            backend.disconnect(self.output);
        }
    }

    pub fn destination(&self) -> Option<AttachPoint> {
        self.destination
    }

    /// Run sequence `sequence` for `beat` and forward its events to the
    /// instrument. Returns the number of events delivered.
    ///
    /// A sequence index past the end is a no-op. Events are dropped when the
    /// track has no instrument. An event the voice rejects is logged and
    /// skipped; the rest of the beat is still delivered and the first
    /// rejection is returned.
    pub fn schedule_beat(
        &mut self,
        backend: &mut dyn AudioBackend,
        time: f64,
        sequence: usize,
        beat: u8,
    ) -> Result<usize> {
        let Some(seq) = self.sequences.get(sequence) else {
            return Ok(0);
        };

        let events = seq.events(time, beat).map_err(|source| Error::SequenceFault {
            track: 0,
            sequence,
            beat,
            source,
        })?;
        if events.is_empty() {
            return Ok(0);
        }

        let Some(voice) = self.plugins.first_mut().and_then(|p| p.as_voice_mut()) else {
            log::trace!("dropping {} events at beat {beat}: no instrument", events.len());
            return Ok(0);
        };

        let mut delivered = 0;
        let mut first_fault = None;
        for event in &events {
            let result = match *event {
                NoteEvent::On(note) => voice.note_on(backend, time, note),
                NoteEvent::Off(note) => voice.note_off(backend, time, note),
            };
            match result {
                Ok(()) => delivered += 1,
                Err(err) => {
                    log::warn!("voice rejected {event:?} at beat {beat}: {err}");
                    first_fault.get_or_insert(err);
                }
            }
        }

        match first_fault {
            Some(err) => Err(err),
            None => Ok(delivered),
        }
    }
}
