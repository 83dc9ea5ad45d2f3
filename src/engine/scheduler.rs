/*
Look-Ahead Scheduler
====================

The scheduler owns the backend, the tracks and the transport state. It
does not produce audio itself; it commits note events to the backend ahead
of time, with absolute timestamps, and lets the backend play them.

  now                       now + look_ahead
   │◄──────── window ────────►│
   ▼                          ▼
───┼──●─────●─────●─────●─────┼──●─────●──→ time
      beats committed this wake   next wake

Each wake dispatches every beat whose time is before the end of the window,
then the caller waits one poll interval and wakes again. The window is much
longer than the poll interval, so a late wake still finds its beats
committed. After a long stall one wake dispatches all the overdue beats in
order: nothing is skipped, nothing is dispatched twice.

Tracks
------

  track 0 (main) ─┐
  track 1 ────────┼─→ master ─→ [compressor → analyser] ─→ destination
  track 2 ────────┘

Track 0 always exists and receives `add_sequence` calls, which covers the
"one flat list of sequences" use. Every beat goes to every track in
registration order. A track with fewer sequences than the current sequence
index stays silent for that pattern.

The pattern count (when the song wraps) is the longest sequence list across
all tracks.

Faults
------

A failing sequence or voice is logged and reported in the wake report; the
remaining tracks and beats are still dispatched.
*/

use crate::config::TransportConfig;
use crate::engine::state::{Beat, TransportState};
use crate::engine::timer::{CancelHandle, PollTimer};
use crate::error::{Error, Result};
use crate::graph::node::{AttachPoint, Plugin};
use crate::graph::NodePlugin;
use crate::io::backend::{AudioBackend, NodeId};
use crate::runtime::Track;
use crate::sequencing::Sequence;

#[cfg(feature = "rtrb")]
use crate::engine::control::{control_queue, TransportCommand, TransportHandle};
#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Index of a track owned by a [`Scheduler`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(usize);

impl TrackId {
    /// The track `add_sequence` writes to.
    pub const MAIN: TrackId = TrackId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a track's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Master,
    /// Straight to the backend destination, skipping master.
    Output,
    Track(TrackId),
    Node(NodeId),
}

/// What one wake did.
#[derive(Debug, Default)]
pub struct WakeReport {
    pub beats: Vec<Beat>,
    pub faults: Vec<Error>,
    /// The song ran out with looping off and the transport stopped.
    pub ended: bool,
}

pub struct Scheduler<B: AudioBackend> {
    backend: B,
    config: TransportConfig,
    state: TransportState,
    master: Track,
    tracks: Vec<Track>,
    cancel: CancelHandle,
    #[cfg(feature = "rtrb")]
    control: Option<Consumer<TransportCommand>>,
}

impl<B: AudioBackend> Scheduler<B> {
    pub fn new(backend: B) -> Self {
        Self::build(backend, TransportConfig::default(), TransportState::default())
    }

    pub fn with_config(backend: B, config: TransportConfig) -> Result<Self> {
        config.validate()?;
        let state = TransportState::new(config.bpm, config.looping)?;
        Ok(Self::build(backend, config, state))
    }

    fn build(mut backend: B, config: TransportConfig, state: TransportState) -> Self {
        let mut master = Track::new(&mut backend);
        if config.master_chain {
            let compressor = NodePlugin::compressor(&mut backend);
            let analyser = NodePlugin::analyser(&mut backend);
            master.add_plugin(&mut backend, compressor);
            master.add_plugin(&mut backend, analyser);
        }
        let destination = backend.destination();
        master.connect(&mut backend, destination);

        let mut main = Track::new(&mut backend);
        main.connect(&mut backend, master.input());

        log::debug!(
            "scheduler ready: {} bpm, look-ahead {}s, poll {:?}",
            config.bpm,
            config.look_ahead,
            config.poll_interval
        );

        Self {
            backend,
            config,
            state,
            master,
            tracks: vec![main],
            cancel: CancelHandle::new(),
            #[cfg(feature = "rtrb")]
            control: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend access, e.g. for constructing plugins.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Handle for the current playback. Cancelling it stops the transport
    /// at its next wake.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    // -- tracks --

    pub fn master(&self) -> &Track {
        &self.master
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.0)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn track_mut(&mut self, id: TrackId) -> Result<&mut Track> {
        self.tracks.get_mut(id.0).ok_or(Error::UnknownTrack(id.0))
    }

    /// New empty track routed to master.
    pub fn create_track(&mut self) -> TrackId {
        let mut track = Track::new(&mut self.backend);
        track.connect(&mut self.backend, self.master.input());
        self.tracks.push(track);
        TrackId(self.tracks.len() - 1)
    }

    pub fn add_plugin<P: Plugin + 'static>(&mut self, id: TrackId, plugin: P) -> Result<()> {
        let track = self.tracks.get_mut(id.0).ok_or(Error::UnknownTrack(id.0))?;
        track.add_plugin(&mut self.backend, plugin);
        Ok(())
    }

    /// Append an effect to the master chain.
    pub fn add_master_plugin<P: Plugin + 'static>(&mut self, plugin: P) {
        self.master.add_plugin(&mut self.backend, plugin);
    }

    /// Append a sequence to the main track.
    pub fn add_sequence<S: Sequence + 'static>(&mut self, sequence: S) {
        self.tracks[TrackId::MAIN.0].add_sequence(sequence);
    }

    pub fn add_track_sequence<S: Sequence + 'static>(&mut self, id: TrackId, sequence: S) -> Result<()> {
        self.track_mut(id)?.add_sequence(sequence);
        Ok(())
    }

    pub fn connect_track(&mut self, id: TrackId, route: Route) -> Result<()> {
        let dest: AttachPoint = match route {
            Route::Master => self.master.input(),
            Route::Output => self.backend.destination().into(),
            Route::Track(other) => self.track(other).ok_or(Error::UnknownTrack(other.0))?.input(),
            Route::Node(node) => node.into(),
        };
        let track = self.tracks.get_mut(id.0).ok_or(Error::UnknownTrack(id.0))?;
        track.connect(&mut self.backend, dest);
        Ok(())
    }

    pub fn disconnect_track(&mut self, id: TrackId) -> Result<()> {
        let track = self.tracks.get_mut(id.0).ok_or(Error::UnknownTrack(id.0))?;
        track.disconnect(&mut self.backend);
        Ok(())
    }

    /// Number of patterns in the song: the longest sequence list of any track.
    pub fn pattern_count(&self) -> usize {
        self.tracks
            .iter()
            .map(Track::sequence_count)
            .max()
            .unwrap_or(0)
    }

    // -- transport --

    /// Start playing from the current cursor and run the first wake.
    ///
    /// Fails with [`Error::EmptySequence`] when no track has a sequence; the
    /// transport then stays stopped. Calling `play` while playing does
    /// nothing.
    pub fn play(&mut self) -> Result<WakeReport> {
        if self.pattern_count() == 0 {
            return Err(Error::EmptySequence);
        }
        // a cancel nobody has applied yet still ends the old playback here
        if self.keep_playing() {
            return Ok(WakeReport::default());
        }

        self.cancel = CancelHandle::new();
        let now = self.backend.now();
        self.state.start_at(now);
        log::info!(
            "play at {now:.3}s from sequence {} beat {} ({} bpm)",
            self.state.sequence_index(),
            self.state.beat_index(),
            self.state.bpm()
        );
        Ok(self.wake())
    }

    /// Stop scheduling. Events already committed to the backend still play.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if self.state.is_playing() {
            self.state.stop();
            log::info!("stopped");
        }
    }

    /// Stop, drop every sequence and zero the cursor.
    pub fn reset(&mut self) {
        self.stop();
        for track in &mut self.tracks {
            track.clear_sequences();
        }
        self.state.rewind();
        log::info!("reset");
    }

    /// Zero the cursor, keeping sequences and play state.
    pub fn rewind(&mut self) {
        self.state.rewind();
    }

    /// Change tempo from the next beat on. Invalid values are rejected and
    /// the previous tempo is kept.
    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        self.state.set_bpm(bpm)?;
        self.config.bpm = bpm;
        log::info!("tempo {bpm} bpm");
        Ok(())
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.state.set_looping(looping);
        self.config.looping = looping;
    }

    /// Queue for changing the transport from another thread.
    ///
    /// Creating a new handle disconnects the previous one.
    #[cfg(feature = "rtrb")]
    pub fn control_handle(&mut self) -> TransportHandle {
        let (handle, rx) = control_queue();
        self.control = Some(rx);
        handle
    }

    #[cfg(feature = "rtrb")]
    fn drain_commands(&mut self) {
        while let Some(command) = self.control.as_mut().and_then(|rx| rx.pop().ok()) {
            log::debug!("control: {command:?}");
            match command {
                TransportCommand::SetBpm(bpm) => {
                    if let Err(err) = self.set_bpm(bpm) {
                        log::warn!("ignoring tempo change: {err}");
                    }
                }
                TransportCommand::SetLooping(looping) => self.set_looping(looping),
                TransportCommand::Stop => self.stop(),
            }
        }
    }

    #[cfg(not(feature = "rtrb"))]
    fn drain_commands(&mut self) {}

    /// One pass of the scheduling loop.
    ///
    /// Dispatches every beat due before `now + look_ahead`, in time order,
    /// to every track in registration order.
    pub fn wake(&mut self) -> WakeReport {
        let mut report = WakeReport::default();
        self.drain_commands();

        if !self.keep_playing() {
            return report;
        }

        let until = self.backend.now() + self.config.look_ahead;
        let patterns = self.pattern_count();

        while self.state.is_playing() && self.state.next_beat_time() < until {
            let beat = self.state.current_beat();
            log::trace!(
                "beat {}:{} at {:.3}s",
                beat.sequence_index,
                beat.beat_index,
                beat.time
            );

            for (index, track) in self.tracks.iter_mut().enumerate() {
                let result =
                    track.schedule_beat(&mut self.backend, beat.time, beat.sequence_index, beat.beat_index);
                if let Err(err) = result {
                    let err = attribute_fault(err, index);
                    log::warn!("track {index}: {err}");
                    report.faults.push(err);
                }
            }
            report.beats.push(beat);

            if self.state.advance(patterns) {
                report.ended = true;
                self.cancel.cancel();
                log::info!("end of song");
            }
        }

        if report.beats.len() > 1 {
            log::debug!(
                "dispatched {} beats up to {:.3}s",
                report.beats.len(),
                self.state.next_beat_time()
            );
        }
        report
    }

    /// Drive the loop until the transport stops or is cancelled: wait one
    /// poll interval, wake, repeat. Returns the number of beats dispatched.
    pub fn run<T: PollTimer>(&mut self, timer: &mut T) -> usize {
        let mut dispatched = 0;
        while self.keep_playing() {
            timer.wait(self.config.poll_interval);
            dispatched += self.wake().beats.len();
        }
        dispatched
    }

    /// Playing and not cancelled. A cancelled playback is stopped here.
    fn keep_playing(&mut self) -> bool {
        if self.state.is_playing() && self.cancel.is_cancelled() {
            self.state.stop();
            log::info!("stopped by cancel handle");
        }
        self.state.is_playing()
    }
}

fn attribute_fault(err: Error, track: usize) -> Error {
    match err {
        Error::SequenceFault {
            sequence,
            beat,
            source,
            ..
        } => Error::SequenceFault {
            track,
            sequence,
            beat,
            source,
        },
        other => other,
    }
}
