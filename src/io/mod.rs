// External interfaces: the audio backend and the transport clock

pub mod backend;
pub mod clock;
pub mod recording;

pub use backend::{AudioBackend, FilterType, NodeId, NodeKind, Param, ParamKind, Port, Waveform};
pub use clock::{Clock, ManualClock, SystemClock};
pub use recording::{Automation, BackendOp, RecordingBackend};
