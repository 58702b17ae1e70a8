use std::net::{IpAddr, Ipv4Addr};

use kademlia_primitives::Peer;
use tracing_subscriber::{fmt, EnvFilter};

#[allow(dead_code)]
pub fn enable_tracing() {
    // Several tests in the same binary may try to install a subscriber.
    let _ = fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[allow(dead_code)]
pub const PORT: u16 = 8080;

// Produces a local peer, the identifier is derived from the address and port.
#[allow(dead_code)]
pub fn localhost_peer(port: u16) -> Peer {
    let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
    Peer::new(format!("{addr}:{port}"), addr, port)
}

// Produces a peer whose identifier is derived from the supplied name.
#[allow(dead_code)]
pub fn named_peer(name: &str) -> Peer {
    Peer::new(name, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)), PORT)
}
