//! Endpoint - listener task, sender and event log around one logical clock

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;

use lamport_core::{EventKind, EventRecord, LamportError, LamportResult, LamportTime, ProcessId};
use lamport_time::LogicalClock;
use lamport_transport::{read_frame, OutboundLink, TcpTransport};
use lamport_wire::Message;

use crate::{EndpointConfig, EndpointEvent, EventLog};

/// Pause after a failed accept so a persistent error does not spin
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// State shared between the listener task and callers
struct Shared {
    config: EndpointConfig,
    clock: LogicalClock,
    log: EventLog,
}

impl Shared {
    fn identity(&self) -> ProcessId {
        self.config.port
    }

    /// Apply a decoded message to the clock and record the receipt
    fn receive(&self, message: Message) -> EventRecord {
        let time = self.clock.observe(message.time);
        self.log.append(
            time,
            EventKind::Received {
                from: message.sender,
            },
        )
    }

    /// Handle one inbound connection to completion
    async fn handle_connection(&self, stream: &mut TcpStream) -> LamportResult<Option<EventRecord>> {
        let Some(frame) = read_frame(stream, self.config.max_frame_size).await? else {
            return Ok(None);
        };

        let message = Message::parse(&frame)?;
        Ok(Some(self.receive(message)))
    }
}

/// One process's network presence: a listening address plus on-demand sends
pub struct Endpoint {
    shared: Arc<Shared>,
    local_addr: SocketAddr,
    listener: JoinHandle<()>,
}

impl Endpoint {
    /// Bind the listening address and start the listener task.
    /// Returns once the listener is ready to accept, or with the bind error.
    pub async fn bind(config: EndpointConfig) -> LamportResult<Self> {
        let shared = Arc::new(Shared {
            log: EventLog::new(config.feed_capacity),
            clock: LogicalClock::new(),
            config,
        });

        let (ready_tx, ready_rx) = oneshot::channel();
        let listener = tokio::spawn(listen(Arc::clone(&shared), ready_tx));

        let local_addr = match ready_rx.await {
            Ok(Ok(addr)) => addr,
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(LamportError::ListenerUnavailable),
        };

        tracing::info!(
            "Listening for incoming messages at port {}",
            shared.identity()
        );

        Ok(Endpoint {
            shared,
            local_addr,
            listener,
        })
    }

    /// This process's identity (its listening port)
    pub fn identity(&self) -> ProcessId {
        self.shared.identity()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Current logical time
    pub fn now(&self) -> LamportTime {
        self.shared.clock.now()
    }

    /// Local event: tick and record
    pub fn record_local_event(&self) -> EventRecord {
        let time = self.shared.clock.tick();
        self.shared.log.append(time, EventKind::Local)
    }

    /// Send a timestamped message to a peer on the same host.
    ///
    /// The clock advances only once the connection is established, so an
    /// unreachable peer leaves it untouched. A write failure after that point
    /// is recorded as `SendFailed` because the tick cannot be undone.
    pub async fn send_message(&self, dest: ProcessId) -> LamportResult<EventRecord> {
        let me = self.identity();
        if dest == me {
            return Err(LamportError::SelfSend(dest));
        }

        let link = match OutboundLink::connect(self.shared.config.peer_addr(dest), dest).await {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!("Send to port {} failed: {}", dest, e);
                return Err(e);
            }
        };

        self.deliver(link).await
    }

    /// Tick, then write the message over an established link
    async fn deliver<S>(&self, link: OutboundLink<S>) -> LamportResult<EventRecord>
    where
        S: AsyncWrite + Unpin,
    {
        let dest = link.peer();
        let time = self.shared.clock.tick();
        let message = Message::new(self.identity(), time);

        match link.send(&message.encode()).await {
            Ok(()) => {
                tracing::debug!("Sent {:?} to port {}", time, dest);
                Ok(self.shared.log.append(time, EventKind::Sent { to: dest }))
            }
            Err(e) => {
                tracing::warn!("Write to port {} failed at {:?}: {}", dest, time, e);
                self.shared.log.append(time, EventKind::SendFailed { to: dest });
                Err(e)
            }
        }
    }

    /// Live feed of appended records and receive failures
    pub fn subscribe(&self) -> broadcast::Receiver<EndpointEvent> {
        self.shared.log.subscribe()
    }

    /// Full event history in append order
    pub fn history(&self) -> Vec<EventRecord> {
        self.shared.log.snapshot()
    }

    /// The last `n` records
    pub fn recent(&self, n: usize) -> Vec<EventRecord> {
        self.shared.log.recent(n)
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Listener task: bind, signal readiness, then accept forever
async fn listen(shared: Arc<Shared>, ready: oneshot::Sender<LamportResult<SocketAddr>>) {
    let transport = match TcpTransport::bind(shared.config.listen_addr(), shared.identity()).await {
        Ok(transport) => transport,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if ready.send(Ok(transport.local_addr())).is_err() {
        // Caller gave up waiting
        return;
    }

    loop {
        let (mut stream, peer) = match transport.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Accept failed: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        match shared.handle_connection(&mut stream).await {
            Ok(Some(record)) => {
                tracing::debug!("Connection from {}: {}", peer, record);
            }
            Ok(None) => {
                tracing::debug!("Connection from {} closed without a message", peer);
            }
            Err(e) => {
                tracing::warn!("Error receiving message from {}: {}", peer, e);
                shared.log.publish_failure(e.to_string());
            }
        }
        // stream dropped here, closing our end
    }
}
