//! Real Network Testing
//!
//! Tests that run actual endpoints on localhost TCP ports.
//! These verify clock behaviour across independent processes.

use std::collections::HashMap;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::timeout;

use lamport_core::{EventKind, EventRecord, LamportError, LamportResult, LamportTime, ProcessId};
use lamport_runtime::{Endpoint, EndpointConfig, EndpointEvent};

// ============================================================================
// NETWORK TEST NODE
// ============================================================================

/// Find a port that is free right now
pub async fn free_port() -> std::io::Result<ProcessId> {
    let holder = TcpListener::bind("127.0.0.1:0").await?;
    let port = holder.local_addr()?.port();
    ProcessId::new(port).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}

/// A test node that runs a real endpoint
pub struct NetworkTestNode {
    endpoint: Endpoint,

    /// Feed subscription, taken before any traffic
    feed: broadcast::Receiver<EndpointEvent>,

    /// Receipts drained from the feed
    received: Vec<EventRecord>,

    /// Receive failures drained from the feed
    failures: Vec<String>,
}

impl NetworkTestNode {
    /// Start a node on a free localhost port
    pub async fn new() -> LamportResult<Self> {
        let port = free_port()
            .await
            .map_err(|e| LamportError::TransportError(e.to_string()))?;
        Self::with_port(port).await
    }

    pub async fn with_port(port: ProcessId) -> LamportResult<Self> {
        let endpoint = Endpoint::bind(EndpointConfig::new(port)).await?;
        let feed = endpoint.subscribe();

        Ok(Self {
            endpoint,
            feed,
            received: Vec::new(),
            failures: Vec::new(),
        })
    }

    pub fn id(&self) -> ProcessId {
        self.endpoint.identity()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn now(&self) -> LamportTime {
        self.endpoint.now()
    }

    pub fn local_event(&self) -> EventRecord {
        self.endpoint.record_local_event()
    }

    pub async fn send_to(&self, dest: ProcessId) -> LamportResult<EventRecord> {
        self.endpoint.send_message(dest).await
    }

    /// Wait for the next receipt, collecting failures seen on the way
    pub async fn recv_timeout(&mut self, timeout_ms: u64) -> Option<EventRecord> {
        let deadline = Duration::from_millis(timeout_ms);

        loop {
            match timeout(deadline, self.feed.recv()).await {
                Ok(Ok(EndpointEvent::Recorded(record))) if record.kind.is_received() => {
                    self.received.push(record.clone());
                    return Some(record);
                }
                Ok(Ok(EndpointEvent::Recorded(_))) => continue,
                Ok(Ok(EndpointEvent::ReceiveFailed { reason })) => {
                    self.failures.push(reason);
                }
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => return None,
            }
        }
    }

    /// Wait for the next receive failure
    pub async fn failure_timeout(&mut self, timeout_ms: u64) -> Option<String> {
        let deadline = Duration::from_millis(timeout_ms);

        loop {
            match timeout(deadline, self.feed.recv()).await {
                Ok(Ok(EndpointEvent::ReceiveFailed { reason })) => {
                    self.failures.push(reason.clone());
                    return Some(reason);
                }
                Ok(Ok(EndpointEvent::Recorded(record))) => {
                    if record.kind.is_received() {
                        self.received.push(record);
                    }
                }
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => return None,
            }
        }
    }

    pub fn received(&self) -> &[EventRecord] {
        &self.received
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

// ============================================================================
// NETWORK TEST HARNESS
// ============================================================================

/// Configuration for network tests
#[derive(Debug, Clone)]
pub struct NetworkTestConfig {
    /// Number of nodes
    pub node_count: usize,

    /// Messages each node sends to every other node
    pub messages_per_peer: usize,

    /// Receive timeout in ms
    pub recv_timeout_ms: u64,
}

impl Default for NetworkTestConfig {
    fn default() -> Self {
        Self {
            node_count: 3,
            messages_per_peer: 3,
            recv_timeout_ms: 2000,
        }
    }
}

/// Result of a network test
#[derive(Debug, Clone)]
pub struct NetworkTestResult {
    pub messages_sent: usize,
    pub messages_received: usize,
    /// Every receipt is later than the send it answers
    pub causality_maintained: bool,
    pub violations: Vec<String>,
}

impl NetworkTestResult {
    pub fn passed(&self) -> bool {
        self.causality_maintained && self.messages_received == self.messages_sent
    }
}

/// Full-mesh exchange harness
pub struct NetworkTestHarness {
    config: NetworkTestConfig,
    nodes: Vec<NetworkTestNode>,
}

impl NetworkTestHarness {
    pub async fn new(config: NetworkTestConfig) -> LamportResult<Self> {
        let mut nodes = Vec::with_capacity(config.node_count);
        for _ in 0..config.node_count {
            nodes.push(NetworkTestNode::new().await?);
        }
        Ok(Self { config, nodes })
    }

    /// Every node sends to every other node, interleaved with local events,
    /// then each delivery is matched against its send.
    pub async fn run(&mut self) -> NetworkTestResult {
        let mut violations = Vec::new();
        // (sender, receiver) -> send times in order
        let mut sent: HashMap<(ProcessId, ProcessId), Vec<LamportTime>> = HashMap::new();
        let mut messages_sent = 0;

        let ids: Vec<ProcessId> = self.nodes.iter().map(|n| n.id()).collect();

        for round in 0..self.config.messages_per_peer {
            for sender in &self.nodes {
                if round % 2 == 0 {
                    sender.local_event();
                }
                for &dest in &ids {
                    if dest == sender.id() {
                        continue;
                    }
                    match sender.send_to(dest).await {
                        Ok(record) => {
                            sent.entry((sender.id(), dest)).or_default().push(record.time);
                            messages_sent += 1;
                        }
                        Err(e) => violations.push(format!("send {} -> {}: {}", sender.id(), dest, e)),
                    }
                }
            }
        }

        // Drain receipts
        let mut messages_received = 0;
        for node in &mut self.nodes {
            let expected = (ids.len() - 1) * self.config.messages_per_peer;
            for _ in 0..expected {
                if node.recv_timeout(self.config.recv_timeout_ms).await.is_none() {
                    violations.push(format!("node {} missed receipts", node.id()));
                    break;
                }
                messages_received += 1;
            }
        }

        // Match nth receipt from S at R with nth send from S to R
        for node in &self.nodes {
            let mut per_sender: HashMap<ProcessId, usize> = HashMap::new();
            for record in node.received() {
                let EventKind::Received { from } = record.kind else {
                    continue;
                };
                let idx = per_sender.entry(from).or_insert(0);
                let send_time = sent
                    .get(&(from, node.id()))
                    .and_then(|times| times.get(*idx))
                    .copied();
                *idx += 1;

                match send_time {
                    Some(k) if record.time > k => {}
                    Some(k) => violations.push(format!(
                        "causality: {} received {:?} from {} sent at {:?}",
                        node.id(),
                        record.time,
                        from,
                        k
                    )),
                    None => violations.push(format!(
                        "unexpected receipt at {} from {}",
                        node.id(),
                        from
                    )),
                }
            }
        }

        NetworkTestResult {
            messages_sent,
            messages_received,
            causality_maintained: violations.is_empty(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_network_node_creation() {
        let node = NetworkTestNode::new().await.unwrap();
        assert!(node.id().port() >= ProcessId::MIN_PORT);
        assert_eq!(node.now(), LamportTime::ZERO);
    }

    #[tokio::test]
    async fn test_causal_delivery() {
        let sender = NetworkTestNode::new().await.unwrap();
        let mut receiver = NetworkTestNode::new().await.unwrap();

        for _ in 0..5 {
            sender.local_event();
        }
        let sent = sender.send_to(receiver.id()).await.unwrap();

        let got = receiver.recv_timeout(2000).await.unwrap();
        assert!(got.time > sent.time);
        assert_eq!(got.kind, EventKind::Received { from: sender.id() });
    }

    #[tokio::test]
    async fn test_network_harness() {
        let mut harness = NetworkTestHarness::new(NetworkTestConfig::default())
            .await
            .unwrap();
        let result = harness.run().await;

        assert!(result.passed(), "violations: {:?}", result.violations);
        assert_eq!(result.messages_sent, 3 * 2 * 3);
    }
}
