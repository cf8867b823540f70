//! Message framing

use lamport_core::{LamportError, LamportResult, LamportTime, ProcessId};

/// Separator between sender identity and timestamp
pub const DELIMITER: char = ',';

/// Line terminator ending every message
pub const TERMINATOR: u8 = b'\n';

/// Maximum bytes read for one message
pub const MAX_FRAME_SIZE: usize = 1024;

/// Largest timestamp accepted from a peer. Anything above would leave the
/// receiver too little room to keep strictly increasing for its lifetime.
pub const MAX_WIRE_TIME: u64 = i64::MAX as u64;

/// Timestamped message exchanged between processes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message {
    pub sender: ProcessId,
    /// Sender's clock value after the tick for this send
    pub time: LamportTime,
}

impl Message {
    pub fn new(sender: ProcessId, time: LamportTime) -> Self {
        Message { sender, time }
    }

    /// Serialize to `<port>,<time>\n`
    pub fn encode(&self) -> Vec<u8> {
        format!("{}{}{}\n", self.sender, DELIMITER, self.time).into_bytes()
    }

    /// Parse a received payload
    pub fn parse(buf: &[u8]) -> LamportResult<Self> {
        let text = std::str::from_utf8(buf)
            .map_err(|_| LamportError::InvalidWireFormat("payload is not UTF-8".into()))?;
        let line = text.trim();

        let (sender, time) = line.split_once(DELIMITER).ok_or_else(|| {
            LamportError::InvalidWireFormat(format!("missing '{}' in {:?}", DELIMITER, line))
        })?;

        if time.contains(DELIMITER) {
            return Err(LamportError::InvalidWireFormat(format!(
                "too many fields in {:?}",
                line
            )));
        }

        let sender = ProcessId::parse(sender)
            .map_err(|e| LamportError::InvalidWireFormat(format!("bad sender: {}", e)))?;

        let time: u64 = time
            .trim()
            .parse()
            .map_err(|_| LamportError::InvalidWireFormat(format!("bad timestamp {:?}", time)))?;

        if time > MAX_WIRE_TIME {
            return Err(LamportError::InvalidWireFormat(format!(
                "timestamp {} out of range",
                time
            )));
        }

        Ok(Message {
            sender,
            time: LamportTime::new(time),
        })
    }
}
