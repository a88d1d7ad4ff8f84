//! Observability subsystem
//!
//! Structured JSON logging. One log line = one event, synchronous, with
//! deterministic field ordering so log output is diffable across runs.

mod logger;

pub use logger::{Logger, Severity};
