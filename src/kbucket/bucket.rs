use std::collections::VecDeque;

use time::OffsetDateTime;
use tracing::{debug, trace};

use crate::core::{id::Id, traits::Contact};

/// The bucket capacity used by [`Bucket::default`], the `k` suggested in the Kademlia paper.
pub const DEFAULT_KSIZE: u8 = 20;

/// The outcome of [`Bucket::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<P> {
    /// The peer was new and there was room for it.
    Inserted,
    /// The peer was already present, it has been moved to the tail and its record replaced.
    Refreshed,
    /// The peer was new and the bucket was full, the least-recently-seen peer was dropped.
    Evicted(P),
    /// The bucket has a capacity of zero and can't hold any peers.
    Rejected,
}

#[derive(Debug, Clone)]
struct Entry<P> {
    peer: P,
    last_seen: OffsetDateTime,
}

impl<P> Entry<P> {
    fn new(peer: P) -> Self {
        Self {
            peer,
            last_seen: OffsetDateTime::now_utc(),
        }
    }
}

/// A bounded, recency-ordered set of peers implementing least-recently-seen eviction.
///
/// The entry at the head is the least recently seen and is the first to be evicted, the entry at
/// the tail is the most recently seen. No two entries share an identifier and there are never more
/// than `ksize` entries.
///
/// This type isn't synchronised, see [`SyncBucket`](crate::SyncBucket) for a version that can be
/// shared between threads.
#[derive(Debug, Clone)]
pub struct Bucket<P> {
    // The maximum number of peers the bucket can hold.
    ksize: u8,
    // Head is the least recently seen.
    entries: VecDeque<Entry<P>>,
}

impl<P> Default for Bucket<P> {
    fn default() -> Self {
        Self::new(DEFAULT_KSIZE)
    }
}

impl<P> Bucket<P> {
    /// Creates an empty bucket.
    ///
    /// A `ksize` of 0 is allowed: such a bucket is always full and rejects every peer.
    pub fn new(ksize: u8) -> Self {
        Self {
            ksize,
            entries: VecDeque::with_capacity(ksize.into()),
        }
    }

    /// Returns the maximum number of peers the bucket can hold.
    pub fn ksize(&self) -> u8 {
        self.ksize
    }

    /// Returns the number of peers currently in the bucket.
    pub fn size(&self) -> u8 {
        debug_assert!(self.entries.len() <= self.ksize.into());
        // Can't truncate, the length is bounded by `ksize`.
        self.entries.len() as u8
    }

    /// Returns `true` if the bucket holds no peers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if adding a new peer would evict another.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.ksize.into()
    }

    /// Removes all the peers from the bucket.
    pub fn clear(&mut self) {
        trace!(size = self.entries.len(), "clearing bucket");
        self.entries.clear();
    }
}

impl<P: Contact + Clone> Bucket<P> {
    /// Adds a peer to the tail of the bucket, marking it as the most recently seen.
    ///
    /// If a peer with the same identifier is already present, it is moved to the tail and replaced
    /// with the supplied record (which may carry a new address or port). Otherwise, if the bucket
    /// is full, the peer at the head is evicted first.
    pub fn add(&mut self, peer: P) -> Insertion<P> {
        let id = peer.id();

        if let Some(i) = self.position(&id) {
            let _old = self.entries.remove(i);
            debug_assert!(_old.is_some());
            self.entries.push_back(Entry::new(peer));

            trace!(%id, "refreshed peer");
            return Insertion::Refreshed;
        }

        let insertion = if self.is_full() {
            match self.entries.pop_front() {
                Some(evicted) => {
                    debug!(
                        %id,
                        evicted = %evicted.peer.id(),
                        ksize = self.ksize,
                        "bucket is full, evicting the least recently seen peer"
                    );
                    Insertion::Evicted(evicted.peer)
                }
                // Full and empty, the capacity is 0.
                None => {
                    debug!(%id, "bucket has no capacity, rejecting peer");
                    return Insertion::Rejected;
                }
            }
        } else {
            trace!(%id, "inserted peer");
            Insertion::Inserted
        };

        self.entries.push_back(Entry::new(peer));
        debug_assert!(self.entries.len() <= self.ksize.into());

        insertion
    }

    /// Removes the peer with the supplied identifier, preserving the order of the others. Returns
    /// the removed peer, `None` if it wasn't present.
    pub fn remove(&mut self, id: &Id) -> Option<P> {
        let i = self.position(id)?;
        let removed = self.entries.remove(i).map(|entry| entry.peer);

        trace!(%id, "removed peer");
        removed
    }

    /// Returns `true` if a peer with the supplied identifier is in the bucket.
    pub fn contains(&self, id: &Id) -> bool {
        self.position(id).is_some()
    }

    /// Returns the peer with the supplied identifier, if it exists.
    pub fn get(&self, id: &Id) -> Option<P> {
        self.position(id).map(|i| self.entries[i].peer.clone())
    }

    /// Returns the peers in recency order, least recently seen first.
    pub fn nodes(&self) -> Vec<P> {
        self.entries.iter().map(|entry| entry.peer.clone()).collect()
    }

    /// Returns the peer at the head of the bucket, the next to be evicted.
    pub fn least_recently_seen(&self) -> Option<P> {
        self.entries.front().map(|entry| entry.peer.clone())
    }

    /// Returns the time at which the peer was last added, if it exists.
    pub fn last_seen(&self, id: &Id) -> Option<OffsetDateTime> {
        self.position(id).map(|i| self.entries[i].last_seen)
    }

    /// Returns up to `n` peers sorted by their distance to the target, closest first.
    pub fn closest(&self, target: &Id, n: usize) -> Vec<P> {
        let mut peers = self.nodes();
        // Identifiers are unique within the bucket, so are the distances.
        peers.sort_unstable_by_key(|peer| peer.id().xor(target));
        peers.truncate(n);

        peers
    }

    fn position(&self, id: &Id) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.peer.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::core::peer::Peer;

    const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));
    const PORT: u16 = 8080;

    fn peer(name: &str) -> Peer {
        Peer::new(name, ADDR, PORT)
    }

    fn ids(bucket: &Bucket<Peer>) -> Vec<Id> {
        bucket.nodes().iter().map(|peer| peer.id()).collect()
    }

    #[test]
    fn default() {
        let bucket: Bucket<Peer> = Bucket::default();

        assert_eq!(bucket.ksize(), DEFAULT_KSIZE);
        assert_eq!(bucket.size(), 0);
        assert!(bucket.is_empty());
        assert!(!bucket.is_full());
    }

    #[test]
    fn add() {
        let mut bucket = Bucket::new(3);
        let (p1, p2) = (peer("node_1"), peer("node_2"));

        assert_eq!(bucket.add(p1.clone()), Insertion::Inserted);
        assert_eq!(bucket.add(p2.clone()), Insertion::Inserted);

        assert_eq!(bucket.size(), 2);
        assert!(bucket.contains(&p1.id()));
        assert!(bucket.contains(&p2.id()));
        assert_eq!(bucket.nodes(), vec![p1, p2]);
    }

    #[test]
    fn add_evicts_least_recently_seen() {
        let mut bucket = Bucket::new(3);
        let peers: Vec<_> = (1..=4).map(|i| peer(&format!("node_{i}"))).collect();

        for p in &peers[..3] {
            bucket.add(p.clone());
        }
        assert_eq!(bucket.size(), 3);
        assert!(bucket.is_full());

        assert_eq!(
            bucket.add(peers[3].clone()),
            Insertion::Evicted(peers[0].clone())
        );
        assert_eq!(bucket.size(), 3);
        assert!(!bucket.contains(&peers[0].id()));
        assert_eq!(bucket.nodes(), peers[1..].to_vec());
    }

    #[test]
    fn re_add_refreshes_recency() {
        let mut bucket = Bucket::new(3);
        let peers: Vec<_> = (1..=4).map(|i| peer(&format!("node_{i}"))).collect();

        for p in &peers[..3] {
            bucket.add(p.clone());
        }

        // P1 moves to the tail, P2 becomes the least recently seen.
        assert_eq!(bucket.add(peers[0].clone()), Insertion::Refreshed);
        assert_eq!(bucket.least_recently_seen(), Some(peers[1].clone()));

        assert_eq!(
            bucket.add(peers[3].clone()),
            Insertion::Evicted(peers[1].clone())
        );
        assert_eq!(
            ids(&bucket),
            vec![peers[2].id(), peers[0].id(), peers[3].id()]
        );
    }

    #[test]
    fn re_add_updates_record() {
        let mut bucket = Bucket::new(3);
        let old = Peer::new("node", ADDR, PORT);
        let new = Peer::new("node", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 9090);
        assert_eq!(old.id(), new.id());

        bucket.add(old.clone());
        bucket.add(peer("other"));
        assert_eq!(bucket.add(new.clone()), Insertion::Refreshed);

        assert_eq!(bucket.size(), 2);
        assert_eq!(bucket.get(&old.id()), Some(new.clone()));
        assert_eq!(bucket.nodes().last(), Some(&new));
    }

    #[test]
    fn re_add_when_full_does_not_evict() {
        let mut bucket = Bucket::new(2);
        let (p1, p2) = (peer("node_1"), peer("node_2"));

        bucket.add(p1.clone());
        bucket.add(p2.clone());
        assert_eq!(bucket.add(p1.clone()), Insertion::Refreshed);

        assert_eq!(bucket.nodes(), vec![p2, p1]);
    }

    #[test]
    fn zero_capacity() {
        let mut bucket = Bucket::new(0);
        assert!(bucket.is_full());

        let p = peer("node");
        assert_eq!(bucket.add(p.clone()), Insertion::Rejected);
        assert_eq!(bucket.add(p.clone()), Insertion::Rejected);

        assert_eq!(bucket.size(), 0);
        assert!(!bucket.contains(&p.id()));
        assert!(bucket.is_full());
    }

    #[test]
    fn remove() {
        let mut bucket = Bucket::new(3);
        let peers: Vec<_> = (1..=3).map(|i| peer(&format!("node_{i}"))).collect();
        for p in &peers {
            bucket.add(p.clone());
        }

        assert_eq!(bucket.remove(&peers[1].id()), Some(peers[1].clone()));
        assert!(!bucket.contains(&peers[1].id()));
        // Relative order is preserved.
        assert_eq!(bucket.nodes(), vec![peers[0].clone(), peers[2].clone()]);
    }

    #[test]
    fn remove_non_existant() {
        let mut bucket = Bucket::new(3);
        bucket.add(peer("node_1"));
        let before = bucket.nodes();

        assert_eq!(bucket.remove(&Id::derive("node_2")), None);
        assert_eq!(bucket.nodes(), before);
    }

    #[test]
    fn contains() {
        let mut bucket = Bucket::new(3);
        bucket.add(peer("node_1"));

        assert!(bucket.contains(&Id::derive("node_1")));
        assert!(!bucket.contains(&Id::derive("node_2")));
    }

    #[test]
    fn is_full() {
        let mut bucket = Bucket::new(3);
        bucket.add(peer("node_1"));
        bucket.add(peer("node_2"));
        assert!(!bucket.is_full());

        bucket.add(peer("node_3"));
        assert!(bucket.is_full());
    }

    #[test]
    fn clear() {
        let mut bucket = Bucket::new(3);
        let (p1, p2) = (peer("node_1"), peer("node_2"));
        bucket.add(p1.clone());
        bucket.add(p2.clone());
        assert_eq!(bucket.size(), 2);

        bucket.clear();

        assert_eq!(bucket.size(), 0);
        assert!(!bucket.contains(&p1.id()));
        assert!(!bucket.contains(&p2.id()));
        assert_eq!(bucket.least_recently_seen(), None);
    }

    #[test]
    fn nodes_is_a_snapshot() {
        let mut bucket = Bucket::new(3);
        bucket.add(peer("node_1"));

        let mut nodes = bucket.nodes();
        nodes.clear();

        assert_eq!(bucket.size(), 1);
    }

    #[test]
    fn last_seen() {
        let mut bucket = Bucket::new(3);
        let p = peer("node_1");
        assert!(bucket.last_seen(&p.id()).is_none());

        bucket.add(p.clone());
        let first = bucket.last_seen(&p.id()).unwrap();
        bucket.add(p.clone());
        let second = bucket.last_seen(&p.id()).unwrap();

        assert!(second >= first);
    }

    #[test]
    fn closest() {
        let mut bucket = Bucket::new(10);
        let peers: Vec<_> = (0..10).map(|i| peer(&format!("node_{i}"))).collect();
        for p in &peers {
            bucket.add(p.clone());
        }

        let target = Id::derive("target");
        let closest = bucket.closest(&target, 3);
        assert_eq!(closest.len(), 3);

        let mut expected = peers.clone();
        expected.sort_by_key(|p| p.id().xor(&target));
        assert_eq!(closest, expected[..3].to_vec());

        // A peer is closest to itself.
        assert_eq!(bucket.closest(&peers[4].id(), 1), vec![peers[4].clone()]);
    }

    #[test]
    fn closest_empty() {
        let bucket: Bucket<Peer> = Bucket::new(3);
        assert!(bucket.closest(&Id::rand(), 3).is_empty());
    }
}
