//! telemetry/mod.rs
//! Per-transfer counters, stage timers, and the immutable snapshot attached
//! to every send report and receive outcome.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
