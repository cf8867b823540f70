//! Event records
//!
//! Every clock mutation produces exactly one record. Records are appended to
//! the process log and never changed afterwards.

use std::fmt;

use crate::{LamportTime, ProcessId};

/// What caused a clock mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Local event (tick)
    Local,
    /// Message transmitted to a peer (tick)
    Sent { to: ProcessId },
    /// Message received from a peer (observe)
    Received { from: ProcessId },
    /// Clock advanced for a send whose write then failed (tick)
    SendFailed { to: ProcessId },
}

impl EventKind {
    /// Peer involved in the event, if any
    pub fn peer(&self) -> Option<ProcessId> {
        match *self {
            EventKind::Local => None,
            EventKind::Sent { to } | EventKind::SendFailed { to } => Some(to),
            EventKind::Received { from } => Some(from),
        }
    }

    pub fn is_received(&self) -> bool {
        matches!(self, EventKind::Received { .. })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Local => write!(f, "Local event triggered"),
            EventKind::Sent { to } => write!(f, "Message sent to port {}", to),
            EventKind::Received { from } => write!(f, "Message received from port {}", from),
            EventKind::SendFailed { to } => {
                write!(f, "Message to port {} failed after clock advanced", to)
            }
        }
    }
}

/// One entry of the append-only event log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    /// 1-based display index, assigned at append time
    pub seq: u64,
    /// Clock value returned by the operation that produced this record
    pub time: LamportTime,
    pub kind: EventKind,
}

impl EventRecord {
    pub fn new(seq: u64, time: LamportTime, kind: EventKind) -> Self {
        EventRecord { seq, time, kind }
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time {} | {}", self.time, self.kind)
    }
}
