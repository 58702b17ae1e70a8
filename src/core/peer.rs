//! Peer records.

use std::{
    fmt,
    net::{IpAddr, SocketAddr},
};

use crate::core::{id::Id, traits::Contact};

/// The routing information for a single remote participant.
///
/// A peer is never mutated after construction. Marking a peer as recently seen is done by handing
/// the same record to the bucket again, which also replaces its address and port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Peer {
    id: Id,
    addr: IpAddr,
    port: u16,
}

impl Peer {
    /// Creates a new peer, deriving its identifier from `data`.
    ///
    /// Nothing checks that `data` is unique per peer: two peers created from the same bytes will
    /// share an identifier and replace each other in a bucket.
    pub fn new(data: impl AsRef<[u8]>, addr: IpAddr, port: u16) -> Self {
        Self {
            id: Id::derive(data),
            addr,
            port,
        }
    }

    /// Creates a new peer from a socket address.
    pub fn from_socket_addr(data: impl AsRef<[u8]>, socket_addr: SocketAddr) -> Self {
        Self::new(data, socket_addr.ip(), socket_addr.port())
    }
}

impl Contact for Peer {
    fn id(&self) -> Id {
        self.id
    }

    fn addr(&self) -> IpAddr {
        self.addr
    }

    fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.socket_addr())
    }
}
