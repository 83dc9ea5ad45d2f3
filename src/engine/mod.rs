//! Transport: cursor state, the look-ahead scheduler and its poll loop.

#[cfg(feature = "rtrb")]
pub mod control;
pub mod scheduler;
pub mod state;
pub mod timer;

#[cfg(feature = "rtrb")]
pub use control::{TransportCommand, TransportHandle};
pub use scheduler::{Route, Scheduler, TrackId, WakeReport};
pub use state::{beat_duration, Beat, PlayState, TransportState};
pub use timer::{CancelHandle, ManualTimer, PollTimer, SleepTimer};
