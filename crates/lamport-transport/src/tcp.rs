//! TCP transport implementation

use std::io::ErrorKind;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use lamport_core::{LamportError, LamportResult, ProcessId};
use lamport_wire::TERMINATOR;

/// Backlog of pending inbound connections
pub const LISTEN_BACKLOG: u32 = 5;

/// Listening side of a process
pub struct TcpTransport {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpTransport {
    /// Bind to a local address
    pub async fn bind(addr: SocketAddr, id: ProcessId) -> LamportResult<Self> {
        let socket = match addr {
            SocketAddr::V4(_) => tokio::net::TcpSocket::new_v4(),
            SocketAddr::V6(_) => tokio::net::TcpSocket::new_v6(),
        }
        .map_err(|e| LamportError::TransportError(e.to_string()))?;

        let listener = socket
            .bind(addr)
            .and_then(|_| socket.listen(LISTEN_BACKLOG))
            .map_err(|e| bind_error(e, id))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| LamportError::TransportError(e.to_string()))?;

        Ok(TcpTransport {
            listener,
            local_addr,
        })
    }

    /// Get local address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the next inbound connection
    pub async fn accept(&self) -> LamportResult<(TcpStream, SocketAddr)> {
        self.listener
            .accept()
            .await
            .map_err(|e| LamportError::TransportError(e.to_string()))
    }
}

fn bind_error(e: std::io::Error, port: ProcessId) -> LamportError {
    if e.kind() == ErrorKind::AddrInUse {
        LamportError::AddressInUse(port)
    } else {
        LamportError::BindFailed {
            port,
            reason: e.to_string(),
        }
    }
}

/// Read one frame: up to the terminator or EOF, at most `limit` bytes.
/// Returns `None` if the peer closed without sending anything.
pub async fn read_frame<R>(reader: &mut R, limit: usize) -> LamportResult<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut frame = Vec::with_capacity(64);
    let mut chunk = [0u8; 256];

    loop {
        let n = reader
            .read(&mut chunk)
            .await
            .map_err(|e| LamportError::TransportError(e.to_string()))?;

        if n == 0 {
            break;
        }

        if let Some(pos) = chunk[..n].iter().position(|&b| b == TERMINATOR) {
            frame.extend_from_slice(&chunk[..=pos]);
            if frame.len() > limit {
                return Err(LamportError::FrameTooLarge { limit });
            }
            break;
        }

        frame.extend_from_slice(&chunk[..n]);
        if frame.len() > limit {
            return Err(LamportError::FrameTooLarge { limit });
        }
    }

    if frame.is_empty() {
        Ok(None)
    } else {
        Ok(Some(frame))
    }
}

/// Established outbound connection to a peer.
///
/// Connecting and sending are separate steps so the caller can advance its
/// clock only once the peer is known to be reachable.
pub struct OutboundLink<S = TcpStream> {
    stream: S,
    peer: ProcessId,
}

impl OutboundLink<TcpStream> {
    /// Open a connection to a peer
    pub async fn connect(addr: SocketAddr, peer: ProcessId) -> LamportResult<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| LamportError::ConnectionFailed {
                port: peer,
                reason: e.to_string(),
            })?;

        Ok(OutboundLink { stream, peer })
    }
}

impl<S> OutboundLink<S>
where
    S: AsyncWrite + Unpin,
{
    /// Wrap an already established stream
    pub fn from_stream(stream: S, peer: ProcessId) -> Self {
        OutboundLink { stream, peer }
    }

    pub fn peer(&self) -> ProcessId {
        self.peer
    }

    /// Write the whole payload and close the connection
    pub async fn send(mut self, bytes: &[u8]) -> LamportResult<()> {
        let peer = self.peer;
        let to_error = |e: std::io::Error| LamportError::ConnectionFailed {
            port: peer,
            reason: e.to_string(),
        };

        self.stream.write_all(bytes).await.map_err(to_error)?;
        self.stream.shutdown().await.map_err(to_error)?;
        Ok(())
    }
}

/// Check that an address could be bound right now
pub async fn is_port_available(addr: SocketAddr) -> bool {
    match TcpListener::bind(addr).await {
        Ok(listener) => {
            drop(listener);
            true
        }
        Err(e) => {
            tracing::debug!("Port check for {} failed: {}", addr, e);
            false
        }
    }
}
