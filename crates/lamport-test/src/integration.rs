//! End-to-end Integration Scenarios
//!
//! Scripted multi-process runs whose outcome must be exactly reproducible:
//! - Two-process exchange with local events on both sides
//! - Self-send rejection
//! - Malformed payload resilience

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use lamport_core::{EventKind, LamportError, LamportResult, LamportTime};

use crate::network_test::NetworkTestNode;

/// Receive timeout used by the scenarios
pub const SCENARIO_TIMEOUT_MS: u64 = 2000;

/// Clock values observed while running a scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioTrace {
    /// Times of A's records in append order
    pub a_times: Vec<u64>,
    /// Times of B's records in append order
    pub b_times: Vec<u64>,
    /// A's clock when the run ends
    pub a_final: LamportTime,
}

/// A: local. B: local, then send to A. A: receive, then local.
///
/// The send counts as B's second event, so it carries time 2 and A moves
/// from 1 to `max(1, 2) + 1 = 3`, then to 4.
///
/// Read literally, "B performs two local events, then sends carrying 2"
/// cannot hold: a send ticks, so two local events followed by a send would
/// carry 3. The script makes the send B's second event on purpose.
pub async fn run_two_process_exchange() -> LamportResult<ScenarioTrace> {
    let mut a = NetworkTestNode::new().await?;
    let b = NetworkTestNode::new().await?;

    a.local_event();
    b.local_event();
    b.send_to(a.id()).await?;

    a.recv_timeout(SCENARIO_TIMEOUT_MS)
        .await
        .ok_or_else(|| LamportError::TransportError("receipt timed out".into()))?;
    a.local_event();

    let times = |node: &NetworkTestNode| {
        node.endpoint()
            .history()
            .iter()
            .map(|r| r.time.as_u64())
            .collect::<Vec<_>>()
    };

    Ok(ScenarioTrace {
        a_times: times(&a),
        b_times: times(&b),
        a_final: a.now(),
    })
}

/// Write raw bytes to a node as if from a misbehaving peer
pub async fn inject_raw(node: &NetworkTestNode, payload: &[u8]) -> std::io::Result<()> {
    let mut stream = TcpStream::connect(node.endpoint().local_addr()).await?;
    stream.write_all(payload).await?;
    stream.shutdown().await
}
