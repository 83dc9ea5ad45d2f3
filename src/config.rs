//! Transport configuration.

use std::time::Duration;

use crate::engine::state::{validate_bpm, DEFAULT_BPM};
use crate::error::{Error, Result};

/// Settings a [`Scheduler`](crate::Scheduler) starts with.
///
/// ```ignore
/// let config = TransportConfig::new().bpm(96.0).looping(false);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub bpm: f64,
    /// How far past now, in seconds, beats may be committed to the backend.
    pub look_ahead: f64,
    /// Wake-up cadence of the scheduling loop.
    pub poll_interval: Duration,
    pub looping: bool,
    /// Put a compressor and an analyser between the master track and the
    /// backend destination.
    pub master_chain: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            look_ahead: 0.5,
            poll_interval: Duration::from_millis(25),
            looping: true,
            master_chain: true,
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn look_ahead(mut self, seconds: f64) -> Self {
        self.look_ahead = seconds;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn master_chain(mut self, enabled: bool) -> Self {
        self.master_chain = enabled;
        self
    }

    /// Rejects a bad tempo, a non-finite look-ahead and a zero poll
    /// interval. A look-ahead of zero or less is fine: only beats already
    /// due are dispatched.
    pub fn validate(&self) -> Result<()> {
        validate_bpm(self.bpm)?;
        if !self.look_ahead.is_finite() {
            return Err(Error::InvalidLookAhead(self.look_ahead));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidPollInterval);
        }
        Ok(())
    }
}
