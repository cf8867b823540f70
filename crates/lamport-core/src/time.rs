//! Logical time primitives

use std::fmt;

/// Lamport timestamp - a process-local logical counter value
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LamportTime(pub u64);

impl LamportTime {
    pub const ZERO: LamportTime = LamportTime(0);
    pub const MAX: LamportTime = LamportTime(u64::MAX);

    #[inline]
    pub fn new(value: u64) -> Self {
        LamportTime(value)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// The immediately following timestamp, saturating at `MAX`
    #[inline]
    pub fn next(self) -> Self {
        LamportTime(self.0.saturating_add(1))
    }
}

impl From<u64> for LamportTime {
    fn from(value: u64) -> Self {
        LamportTime(value)
    }
}

impl fmt::Debug for LamportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L({})", self.0)
    }
}

impl fmt::Display for LamportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
