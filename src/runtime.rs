//! Ambient runtime concerns: termination-signal sources and tracing
//! bootstrap.

pub mod signals;
pub mod telemetry;
