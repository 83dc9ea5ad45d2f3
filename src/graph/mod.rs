//! Signal-chain building blocks.
//!
//! Plugins wrap backend nodes with a uniform connect/disconnect contract so
//! tracks can chain instruments and effects without caring what is inside.

/// Single-node effects (compressor, analyser, gain, filter).
pub mod effect;
/// Plugin and Voice capabilities, attachment points.
pub mod node;

pub use effect::NodePlugin;
pub use node::{AttachPoint, Destination, Plugin, Voice};
