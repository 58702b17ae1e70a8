use std::net::{IpAddr, SocketAddr};

use crate::core::id::{Distance, Id};

/// A trait describing anything that can be stored in a [`Bucket`](crate::Bucket).
///
/// [`Peer`](crate::Peer) is the provided implementation. Layers built on top of the bucket (e.g. a
/// transport keeping connection state alongside the routing information) can implement this trait
/// on their own peer types; the bucket only ever looks at the identifier.
pub trait Contact {
    /// Returns the identifier used for membership and distance calculations.
    fn id(&self) -> Id;

    /// Returns the IP address of the contact, IPv4 or IPv6.
    fn addr(&self) -> IpAddr;

    /// Returns the port the contact listens on.
    fn port(&self) -> u16;

    /// Returns the address and port as a single socket address.
    fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr(), self.port())
    }

    /// Returns the XOR-based distance to another contact; the provided implementation compares
    /// identifiers.
    fn distance<C: Contact>(&self, other: &C) -> Distance {
        self.id().xor(&other.id())
    }
}
