/*
ADSR Envelope Breakpoints
=========================

This module computes an Attack Decay Sustain Release shape for one
parameter as a list of (time, value) breakpoints. It does no I/O: the caller
commits the breakpoints to the backend (see `Envelope::apply`), and the
backend ramps between them sample-accurately.


The Shape
---------

  Value
    max ┐     ╱╲
        │    ╱  ╲
    sus │   ╱    ╲________
        │  ╱              ╲___
    min │ ╱                   ╲
    0.0 └╱─────────────────────╲──→ Time
        A     D     S      R

Breakpoints, in order:

  0. (start, 0)             instant set, baseline reset
  1. (attack_time, max)     ramp
  2. (decay_time, sus|min)  ramp
  3. (release_time, min)    ramp, four-stage shape only

The baseline reset is always emitted so that a retrigger never inherits the
tail of a previous release.

The sustain stage contributes time, not a breakpoint: the ramp from the
decay breakpoint to the release breakpoint spans both sustain and release.
`Envelope::sustain_time` reports where sustain nominally ends.


Rates, Not Times
----------------

Every stage length is given as a RATE: the stage lasts `1 / rate` seconds.

    attack_rate = 100  →  10ms attack
    decay_rate  = 3    →  333ms decay

Larger numbers are faster. A rate of zero (or below) disables the stage:
for attack this means the peak is reached instantly, which is what you want
for frequency snaps on drums. Decay is the exception and must be positive.


Two Shapes
----------

  Attack-decay (percussive):   sustain missing, or any of sustain value,
                               sustain rate, release rate <= 0.
                               Ends at the decay breakpoint, value min.

  Four-stage:                  sustain value, sustain rate and release rate
                               all > 0. Decays to the sustain value, then
                               ramps to min at the release breakpoint.
*/

use crate::error::{Error, Result};
use crate::io::backend::{AudioBackend, Param};

/// How the parameter arrives at a breakpoint.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// Jump to the value at the breakpoint time.
    Instant,
    /// Ramp linearly from the previous breakpoint.
    Linear,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub time: f64,
    pub value: f32,
    pub curve: Curve,
}

/// Input to [`compute_envelope`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSpec {
    pub start_time: f64,
    pub min_value: f32,
    pub max_value: f32,
    pub attack_rate: f64,
    pub decay_rate: f64,
    pub sustain_value: Option<f32>,
    pub sustain_rate: Option<f64>,
    pub release_rate: Option<f64>,
}

impl EnvelopeSpec {
    /// Percussive attack-decay shape.
    pub fn attack_decay(
        start_time: f64,
        min_value: f32,
        max_value: f32,
        attack_rate: f64,
        decay_rate: f64,
    ) -> Self {
        Self {
            start_time,
            min_value,
            max_value,
            attack_rate,
            decay_rate,
            sustain_value: None,
            sustain_rate: None,
            release_rate: None,
        }
    }

    /// Add sustain and release stages.
    pub fn with_sustain(mut self, value: f32, sustain_rate: f64, release_rate: f64) -> Self {
        self.sustain_value = Some(value);
        self.sustain_rate = Some(sustain_rate);
        self.release_rate = Some(release_rate);
        self
    }

    pub fn compute(&self) -> Result<Envelope> {
        compute_envelope(self)
    }
}

/// Computed breakpoints plus the time the parameter comes to rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    breakpoints: Vec<Breakpoint>,
    sustain_time: Option<f64>,
    end_time: f64,
}

impl Envelope {
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// End of the sustain stage, four-stage shapes only.
    pub fn sustain_time(&self) -> Option<f64> {
        self.sustain_time
    }

    pub fn is_percussive(&self) -> bool {
        self.sustain_time.is_none()
    }

    /// Commit the breakpoints to `param`, in order, as absolute-time events.
    /// Returns the end time.
    pub fn apply(&self, backend: &mut dyn AudioBackend, param: Param) -> f64 {
        for point in &self.breakpoints {
            match point.curve {
                Curve::Instant => backend.set_value_at(param, point.time, point.value),
                Curve::Linear => backend.linear_ramp_to(param, point.time, point.value),
            }
        }
        self.end_time
    }
}

fn stage_length(rate: f64) -> f64 {
    if rate > 0.0 {
        1.0 / rate
    } else {
        0.0
    }
}

fn positive<T: PartialOrd + Default + Copy>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v > T::default())
}

/// Compute the breakpoints for `spec`.
///
/// Fails with [`Error::InvalidEnvelope`] when the decay rate is not positive.
pub fn compute_envelope(spec: &EnvelopeSpec) -> Result<Envelope> {
    if spec.decay_rate <= 0.0 || !spec.decay_rate.is_finite() {
        return Err(Error::InvalidEnvelope {
            decay_rate: spec.decay_rate,
        });
    }

    let mut breakpoints = Vec::with_capacity(4);
    breakpoints.push(Breakpoint {
        time: spec.start_time,
        value: 0.0,
        curve: Curve::Instant,
    });

    let attack_time = spec.start_time + stage_length(spec.attack_rate);
    breakpoints.push(Breakpoint {
        time: attack_time,
        value: spec.max_value,
        curve: Curve::Linear,
    });

    let sustain_value = positive(spec.sustain_value);
    let decay_time = attack_time + 1.0 / spec.decay_rate;
    breakpoints.push(Breakpoint {
        time: decay_time,
        value: sustain_value.unwrap_or(spec.min_value),
        curve: Curve::Linear,
    });

    let stages = (
        sustain_value,
        positive(spec.sustain_rate),
        positive(spec.release_rate),
    );
    match stages {
        (Some(_), Some(sustain_rate), Some(release_rate)) => {
            let sustain_time = decay_time + 1.0 / sustain_rate;
            let release_time = sustain_time + 1.0 / release_rate;
            breakpoints.push(Breakpoint {
                time: release_time,
                value: spec.min_value,
                curve: Curve::Linear,
            });
            Ok(Envelope {
                breakpoints,
                sustain_time: Some(sustain_time),
                end_time: release_time,
            })
        }
        _ => Ok(Envelope {
            breakpoints,
            sustain_time: None,
            end_time: decay_time,
        }),
    }
}
