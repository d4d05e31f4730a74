//! Infrastructure adapters and runtime bootstrap.

pub mod elastic;
pub mod error;
pub mod telemetry;
