//! Endpoint configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use lamport_core::ProcessId;
use lamport_wire::MAX_FRAME_SIZE;

/// Endpoint configuration
#[derive(Clone, Debug)]
pub struct EndpointConfig {
    /// Host shared by this process and its peers
    pub host: IpAddr,
    /// Listening port, also the identity sent to peers
    pub port: ProcessId,
    /// Maximum bytes accepted for one inbound message
    pub max_frame_size: usize,
    /// Buffered feed entries per subscriber before it starts lagging
    pub feed_capacity: usize,
}

impl EndpointConfig {
    pub fn new(port: ProcessId) -> Self {
        EndpointConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port,
            max_frame_size: MAX_FRAME_SIZE,
            feed_capacity: 256,
        }
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    pub fn with_feed_capacity(mut self, feed_capacity: usize) -> Self {
        self.feed_capacity = feed_capacity.max(1);
        self
    }

    /// Address this endpoint listens on
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.port())
    }

    /// Address of a peer on the same host
    pub fn peer_addr(&self, peer: ProcessId) -> SocketAddr {
        SocketAddr::new(self.host, peer.port())
    }
}
