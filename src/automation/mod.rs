pub mod envelope;

pub use envelope::{compute_envelope, Breakpoint, Curve, Envelope, EnvelopeSpec};
