//! telemetry/mod.rs
//! Counters, timers and the immutable snapshot returned by every run.
//!
//! Counters are shared by the reader, the transform workers and the writer,
//! so they are atomics. The snapshot is taken once, after both pools joined.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
