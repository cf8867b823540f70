//! Lamport Runtime - Endpoint orchestration
//!
//! An endpoint runs two activities concurrently:
//! 1. Listener task: accept, read, decode, observe, record, repeat
//! 2. Caller path: local events and on-demand sends
//!
//! Both share the logical clock and the append-only event log.

pub mod config;
pub mod endpoint;
pub mod log;
pub mod telemetry;

pub use config::*;
pub use endpoint::*;
pub use log::*;
