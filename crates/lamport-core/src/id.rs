//! Process identity
//!
//! A process is identified by the TCP port it listens on. The same value is
//! carried as the "from" field of every message it sends.

use std::fmt;
use std::str::FromStr;

use crate::{LamportError, LamportResult};

/// Process identity - the listening port, immutable after startup
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(u16);

impl ProcessId {
    /// Lowest port a process may claim (below are privileged)
    pub const MIN_PORT: u16 = 1024;
    pub const MAX_PORT: u16 = u16::MAX;

    /// Validate a port number
    pub fn new(port: u16) -> LamportResult<Self> {
        if port < Self::MIN_PORT {
            return Err(LamportError::PortOutOfRange(port as i64));
        }
        Ok(ProcessId(port))
    }

    /// Parse user or wire text into a process identity
    pub fn parse(text: &str) -> LamportResult<Self> {
        let trimmed = text.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| LamportError::InvalidPort(trimmed.to_string()))?;

        if !(Self::MIN_PORT as i64..=Self::MAX_PORT as i64).contains(&value) {
            return Err(LamportError::PortOutOfRange(value));
        }
        Ok(ProcessId(value as u16))
    }

    #[inline]
    pub fn port(self) -> u16 {
        self.0
    }
}

impl FromStr for ProcessId {
    type Err = LamportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessId::parse(s)
    }
}

impl fmt::Debug for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Process({})", self.0)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
