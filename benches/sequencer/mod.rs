//! Benchmarks for the sequencing core.

mod envelope;
mod scheduler;

pub use envelope::bench_envelope;
pub use scheduler::bench_scheduler;
