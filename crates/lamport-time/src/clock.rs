//! Logical clock implementation

use parking_lot::Mutex;

use lamport_core::LamportTime;

/// Lamport logical clock
/// INVARIANT: every mutation strictly increases the value
#[derive(Debug, Default)]
pub struct LogicalClock {
    time: Mutex<LamportTime>,
}

impl LogicalClock {
    /// Create a new clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Local event: advance by exactly one and return the new value
    pub fn tick(&self) -> LamportTime {
        let mut time = self.time.lock();
        *time = time.next();
        *time
    }

    /// Message receipt: `time = max(time, remote) + 1`
    pub fn observe(&self, remote: LamportTime) -> LamportTime {
        let mut time = self.time.lock();
        *time = (*time).max(remote).next();
        *time
    }

    /// Current value without advancing
    pub fn now(&self) -> LamportTime {
        *self.time.lock()
    }
}
