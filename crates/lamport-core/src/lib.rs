//! Lamport Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by every layer:
//! - Process identity (the listening port)
//! - Logical timestamps
//! - Event records for the append-only log
//! - The crate-wide error taxonomy

pub mod error;
pub mod event;
pub mod id;
pub mod time;

pub use error::*;
pub use event::*;
pub use id::*;
pub use time::*;
