//! Append-only event log with a live feed

use parking_lot::Mutex;
use tokio::sync::broadcast;

use lamport_core::{EventKind, EventRecord, LamportTime};

/// Item delivered to feed subscribers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndpointEvent {
    /// A record was appended (local, sent or received)
    Recorded(EventRecord),
    /// An inbound connection was dropped; the clock is unchanged
    ReceiveFailed { reason: String },
}

/// Process event history.
/// Records are never changed or removed once appended.
pub struct EventLog {
    records: Mutex<Vec<EventRecord>>,
    feed: broadcast::Sender<EndpointEvent>,
}

impl EventLog {
    pub fn new(feed_capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(feed_capacity.max(1));
        EventLog {
            records: Mutex::new(Vec::new()),
            feed,
        }
    }

    /// Append a record for a clock mutation and publish it
    pub fn append(&self, time: LamportTime, kind: EventKind) -> EventRecord {
        let mut records = self.records.lock();
        let record = EventRecord::new(records.len() as u64 + 1, time, kind);
        records.push(record.clone());

        // Published under the lock so feed order matches sequence order.
        // No subscribers is fine.
        let _ = self.feed.send(EndpointEvent::Recorded(record.clone()));
        record
    }

    /// Publish a receive failure to subscribers
    pub fn publish_failure(&self, reason: impl Into<String>) {
        let _ = self.feed.send(EndpointEvent::ReceiveFailed {
            reason: reason.into(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EndpointEvent> {
        self.feed.subscribe()
    }

    /// Full history in append order
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.records.lock().clone()
    }

    /// The last `n` records, keeping their original sequence numbers
    pub fn recent(&self, n: usize) -> Vec<EventRecord> {
        let records = self.records.lock();
        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
