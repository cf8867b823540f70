//! Lamport Time - the logical clock
//!
//! One `LogicalClock` per process. It is the only mutable state shared
//! between the listener and the sending path, so both of its mutating
//! operations run under a single exclusive lock.

pub mod clock;

pub use clock::*;
