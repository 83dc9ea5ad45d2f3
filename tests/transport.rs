use std::time::Duration;

use float_cmp::approx_eq;
use saavy_seq::engine::{ManualTimer, TrackId};
use saavy_seq::io::{Automation, ParamKind};
use saavy_seq::voices::Synth;
use saavy_seq::{
    Error, ManualClock, Note, NoteEvent, PlayState, Plugin, RecordingBackend, Scheduler,
    StepPattern, TransportConfig,
};

fn silent(_time: f64, _beat: u8) -> Vec<NoteEvent> {
    Vec::new()
}

fn transport(config: TransportConfig) -> (Scheduler<RecordingBackend>, ManualClock) {
    let clock = ManualClock::new();
    let backend = RecordingBackend::with_clock(clock.clone());
    let scheduler = Scheduler::with_config(backend, config).unwrap();
    (scheduler, clock)
}

#[test]
fn sixteen_beats_at_120_bpm_fill_one_pattern() {
    let (mut seq, clock) = transport(TransportConfig::new().bpm(120.0));
    seq.add_sequence(silent);
    seq.add_sequence(silent);

    assert_eq!(seq.state().beat_duration(), 0.125);

    let first = seq.play().unwrap();
    clock.set(1.5);
    let second = seq.wake();

    assert_eq!(first.beats.len() + second.beats.len(), 16);
    assert_eq!(seq.state().beat_index(), 0);
    assert_eq!(seq.state().sequence_index(), 1);
}

#[test]
fn loop_off_stops_after_last_beat_and_replays_from_top() {
    let (mut seq, clock) = transport(TransportConfig::new().looping(false));
    seq.add_sequence(silent);

    let mut beats = seq.play().unwrap().beats;
    clock.set(1.6);
    let report = seq.wake();
    beats.extend(report.beats);

    assert!(report.ended);
    assert_eq!(beats.len(), 16);
    assert_eq!(beats.last().map(|b| b.beat_index), Some(15));
    assert_eq!(seq.state().play_state(), PlayState::Stopped);

    clock.set(3.0);
    assert!(seq.wake().beats.is_empty());

    let replay = seq.play().unwrap();
    assert_eq!(replay.beats[0].time, 3.0);
    assert_eq!(replay.beats[0].sequence_index, 0);
    assert_eq!(replay.beats[0].beat_index, 0);
}

#[test]
fn stall_dispatches_every_overdue_beat_once() {
    let (mut seq, clock) = transport(TransportConfig::new().bpm(120.0).look_ahead(0.5));
    seq.add_sequence(silent);

    let before = seq.play().unwrap().beats;
    let stale = seq.state().next_beat_time();
    assert_eq!(stale, 0.5);

    // the process was suspended for two seconds
    clock.set(stale + 2.0);
    let burst = seq.wake().beats;

    assert_eq!(burst.len(), 20);
    assert_eq!(burst[0].time, stale);
    assert!(burst.last().unwrap().time < clock_now(&clock) + 0.5);

    let all: Vec<_> = before.iter().chain(burst.iter()).collect();
    for (n, beat) in all.iter().enumerate() {
        assert!(approx_eq!(f64, beat.time, n as f64 * 0.125, ulps = 2));
        assert_eq!(beat.beat_index as usize, n % 16);
    }
}

fn clock_now(clock: &ManualClock) -> f64 {
    use saavy_seq::Clock;
    clock.now()
}

#[test]
fn play_without_sequences_fails_and_stays_stopped() {
    let (mut seq, _clock) = transport(TransportConfig::default());
    seq.create_track();

    assert!(matches!(seq.play(), Err(Error::EmptySequence)));
    assert!(!seq.is_playing());
}

#[test]
fn invalid_tempo_keeps_previous_bpm() {
    let (mut seq, _clock) = transport(TransportConfig::new().bpm(100.0));

    assert!(matches!(seq.set_bpm(0.0), Err(Error::InvalidTempo(_))));
    assert!(matches!(seq.set_bpm(-40.0), Err(Error::InvalidTempo(_))));
    assert_eq!(seq.state().bpm(), 100.0);

    seq.set_bpm(150.0).unwrap();
    assert_eq!(seq.state().bpm(), 150.0);
}

#[test]
fn tempo_change_applies_from_the_next_beat() {
    let (mut seq, clock) = transport(TransportConfig::new().bpm(120.0));
    seq.add_sequence(silent);
    seq.play().unwrap();

    seq.set_bpm(60.0).unwrap();
    clock.set(0.5);
    let beats = seq.wake().beats;

    let times: Vec<f64> = beats.iter().map(|b| b.time).collect();
    assert_eq!(times, vec![0.5, 0.75]);
}

#[test]
fn stop_prevents_further_dispatch_but_keeps_committed_events() {
    let (mut seq, clock) = transport(TransportConfig::default());
    let synth = Synth::new(seq.backend_mut());
    let gain = synth.output();
    seq.add_plugin(TrackId::MAIN, synth).unwrap();
    seq.add_sequence(StepPattern::new().every(1, 0, "C4".parse().unwrap()));

    seq.play().unwrap();
    let committed = seq.backend().automation(gain.node().param(ParamKind::Gain));
    assert_eq!(committed.len(), 4);

    seq.stop();
    clock.set(5.0);
    assert!(seq.wake().beats.is_empty());
    assert_eq!(seq.backend().automation(gain.node().param(ParamKind::Gain)), committed);
}

#[test]
fn play_after_stop_resumes_from_cursor() {
    let (mut seq, clock) = transport(TransportConfig::default());
    seq.add_sequence(silent);
    seq.play().unwrap();
    seq.stop();

    clock.set(10.0);
    let resumed = seq.play().unwrap();
    assert_eq!(resumed.beats[0].beat_index, 4);
    assert_eq!(resumed.beats[0].time, 10.0);
}

#[test]
fn reset_clears_sequences_and_cursor() {
    let (mut seq, _clock) = transport(TransportConfig::default());
    seq.add_sequence(silent);
    seq.play().unwrap();

    seq.reset();
    assert!(!seq.is_playing());
    assert_eq!(seq.pattern_count(), 0);
    assert_eq!((seq.state().sequence_index(), seq.state().beat_index()), (0, 0));
    assert!(matches!(seq.play(), Err(Error::EmptySequence)));
}

#[test]
fn rewind_keeps_playing_from_the_top() {
    let (mut seq, clock) = transport(TransportConfig::default());
    seq.add_sequence(silent);
    seq.add_sequence(silent);
    seq.play().unwrap();

    seq.rewind();
    clock.set(0.1);
    let beats = seq.wake().beats;
    assert!(seq.is_playing());
    assert_eq!(beats[0].beat_index, 0);
    assert_eq!(beats[0].time, 0.5);
}

#[test]
fn run_survives_jittery_wakeups() {
    let clock = ManualClock::new();
    let backend = RecordingBackend::with_clock(clock.clone());
    let config = TransportConfig::new()
        .looping(false)
        .poll_interval(Duration::from_millis(25));
    let mut seq = Scheduler::with_config(backend, config).unwrap();
    seq.add_sequence(silent);
    seq.add_sequence(silent);

    let mut timer = ManualTimer::new(clock.clone()).with_lateness(vec![
        Duration::ZERO,
        Duration::from_millis(180),
        Duration::from_millis(3),
        Duration::from_millis(400),
    ]);

    let first = seq.play().unwrap().beats.len();
    let rest = seq.run(&mut timer);

    assert_eq!(first + rest, 32);
    assert!(!seq.is_playing());
    assert!(timer.waits() > 1);
}

#[test]
fn cancel_handle_stops_the_loop() {
    let (mut seq, clock) = transport(TransportConfig::default());
    seq.add_sequence(silent);
    seq.play().unwrap();

    let handle = seq.cancel_handle();
    handle.cancel();

    let mut timer = ManualTimer::new(clock);
    assert_eq!(seq.run(&mut timer), 0);
    assert_eq!(timer.waits(), 0);
    assert!(!seq.is_playing());
}

#[test]
fn old_cancel_handle_does_not_stop_a_new_playback() {
    let (mut seq, clock) = transport(TransportConfig::default());
    seq.add_sequence(silent);
    seq.play().unwrap();
    let stale = seq.cancel_handle();
    seq.stop();

    seq.play().unwrap();
    stale.cancel();
    clock.set(0.3);
    seq.wake();
    assert!(seq.is_playing());
}

#[test]
fn play_right_after_cancel_starts_a_new_playback() {
    let (mut seq, clock) = transport(TransportConfig::default());
    seq.add_sequence(silent);
    seq.play().unwrap();

    seq.cancel_handle().cancel();
    clock.set(1.0);
    let replay = seq.play().unwrap();
    assert_eq!(replay.beats.first().map(|b| b.time), Some(1.0));

    clock.set(1.3);
    let next = seq.wake();
    assert!(seq.is_playing());
    assert!(!next.beats.is_empty());
}

#[test]
fn failing_sequence_does_not_silence_other_tracks() {
    let (mut seq, clock) = transport(TransportConfig::default());
    seq.add_sequence(|_t: f64, beat: u8| -> Result<Vec<Note>, String> {
        if beat == 1 {
            Err("broken pattern".to_string())
        } else {
            Ok(Vec::new())
        }
    });

    let lead = seq.create_track();
    let synth = Synth::new(seq.backend_mut());
    let osc = synth.oscillator();
    seq.add_plugin(lead, synth).unwrap();
    seq.add_track_sequence(lead, StepPattern::new().every(1, 0, "A4".parse().unwrap()))
        .unwrap();

    let report = seq.play().unwrap();
    assert_eq!(report.beats.len(), 4);
    assert_eq!(report.faults.len(), 1);
    assert!(matches!(
        report.faults[0],
        Error::SequenceFault { track: 0, sequence: 0, beat: 1, .. }
    ));

    let pitches = seq.backend().automation(osc.param(ParamKind::Frequency));
    assert_eq!(pitches.len(), 4);
    assert_eq!(pitches[1], Automation::Set { time: 0.125, value: 440.0 });

    clock.set(0.25);
    assert!(seq.wake().faults.is_empty());
}

#[test]
fn tracks_are_notified_in_registration_order() {
    use std::sync::{Arc, Mutex};

    let (mut seq, _clock) = transport(TransportConfig::new().look_ahead(0.1));
    let log = Arc::new(Mutex::new(Vec::new()));

    for name in ["main", "second", "third"] {
        let log = Arc::clone(&log);
        let id = if name == "main" { TrackId::MAIN } else { seq.create_track() };
        seq.add_track_sequence(id, move |_t: f64, beat: u8| {
            log.lock().unwrap().push((beat, name));
            Vec::<Note>::new()
        })
        .unwrap();
    }

    seq.play().unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec![(0, "main"), (0, "second"), (0, "third")]
    );
}
