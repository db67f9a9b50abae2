//! # ecsctl telemetry
//!
//! Logging setup shared by ecsctl binaries.

pub mod logging;

pub use logging::init;
