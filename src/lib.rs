//! The identifier space and k-bucket underpinning a [Kademlia](https://pdos.csail.mit.edu/~petar/papers/maymounkov-kademlia-lncs.pdf)
//! routing table.
//!
//! This crate provides two primitives:
//!
//! 1. [`Id`], a 160-bit identifier derived with SHA-1 and compared with the XOR metric. Distances
//!    are ordered as big-endian unsigned integers.
//! 2. [`Bucket`], a bounded set of peers ordered by recency. When a new peer is added to a full
//!    bucket, the least recently seen peer is evicted. [`SyncBucket`] wraps it in a lock to share
//!    it across threads.
//!
//! The routing table itself, lookups, transport and liveness checks are left to the user. Anything
//! implementing [`Contact`] can be stored in a bucket, [`Peer`] is the provided implementation.
//!
//! ## Example
//!
//! ```
//! use std::net::{IpAddr, Ipv4Addr};
//!
//! use kademlia_primitives::{Bucket, Contact, Insertion, Peer};
//!
//! let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
//! let mut bucket = Bucket::new(2);
//!
//! let a = Peer::new("127.0.0.1:4000", addr, 4000);
//! let b = Peer::new("127.0.0.1:4001", addr, 4001);
//! let c = Peer::new("127.0.0.1:4002", addr, 4002);
//!
//! bucket.add(a.clone());
//! bucket.add(b);
//! assert_eq!(bucket.add(c), Insertion::Evicted(a.clone()));
//! assert!(!bucket.contains(&a.id()));
//! ```

#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod core;
mod kbucket;

#[cfg(feature = "sync")]
pub use crate::kbucket::SyncBucket;
pub use crate::{
    core::{
        id::{Distance, Id},
        peer::Peer,
        traits::Contact,
    },
    kbucket::{Bucket, Insertion, DEFAULT_KSIZE},
};
