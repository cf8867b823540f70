//! Lamport Transport Layer - TCP, one message per connection
//!
//! This crate provides:
//! - Listener binding and accept
//! - Bounded line reads for inbound frames
//! - Outbound links split into connect and send
//! - Port availability probing

pub mod tcp;

pub use tcp::*;
