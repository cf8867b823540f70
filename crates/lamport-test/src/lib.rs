//! Lamport Test Harness - multi-process validation over real sockets
//!
//! This crate provides:
//! - Test nodes wrapping a live endpoint and its feed
//! - A mesh harness that checks causal ordering of every delivery
//! - Scripted end-to-end scenarios

pub mod integration;
pub mod network_test;

pub use integration::*;
pub use network_test::*;
