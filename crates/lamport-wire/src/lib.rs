//! Lamport Wire Protocol - Text line format
//!
//! One message per TCP connection:
//! - UTF-8, a single line
//! - `<senderPort>,<senderLamportTime>` followed by `\n`
//! - No acknowledgement; the sender closes after writing

pub mod frame;

pub use frame::*;
