use std::sync::Arc;

use parking_lot::Mutex;
use time::OffsetDateTime;

use crate::{
    core::{id::Id, traits::Contact},
    kbucket::{Bucket, Insertion},
};

#[cfg_attr(doc_cfg, doc(cfg(feature = "sync")))]
#[derive(Debug)]
/// A bucket implementation suitable for use across threads.
///
/// It wraps [`Bucket`] in a single lock, every method holds it for its full duration so calls are
/// linearizable. Clones share the same underlying bucket.
pub struct SyncBucket<P> {
    bucket: Arc<Mutex<Bucket<P>>>,
}

impl<P> Clone for SyncBucket<P> {
    fn clone(&self) -> Self {
        Self {
            bucket: Arc::clone(&self.bucket),
        }
    }
}

impl<P> Default for SyncBucket<P> {
    fn default() -> Self {
        Self::from(Bucket::default())
    }
}

impl<P> From<Bucket<P>> for SyncBucket<P> {
    fn from(bucket: Bucket<P>) -> Self {
        Self {
            bucket: Arc::new(Mutex::new(bucket)),
        }
    }
}

impl<P> SyncBucket<P> {
    pub fn new(ksize: u8) -> Self {
        Self::from(Bucket::new(ksize))
    }

    pub fn ksize(&self) -> u8 {
        self.bucket.lock().ksize()
    }

    pub fn size(&self) -> u8 {
        self.bucket.lock().size()
    }

    pub fn is_empty(&self) -> bool {
        self.bucket.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.bucket.lock().is_full()
    }

    pub fn clear(&self) {
        self.bucket.lock().clear()
    }

    /// Runs the closure with the lock held, useful for decisions spanning several reads.
    pub fn with<R>(&self, f: impl FnOnce(&Bucket<P>) -> R) -> R {
        f(&*self.bucket.lock())
    }

    /// Runs the closure with the lock held, allowing compound updates.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Bucket<P>) -> R) -> R {
        f(&mut *self.bucket.lock())
    }
}

impl<P: Contact + Clone> SyncBucket<P> {
    pub fn add(&self, peer: P) -> Insertion<P> {
        self.bucket.lock().add(peer)
    }

    pub fn remove(&self, id: &Id) -> Option<P> {
        self.bucket.lock().remove(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.bucket.lock().contains(id)
    }

    pub fn get(&self, id: &Id) -> Option<P> {
        self.bucket.lock().get(id)
    }

    /// Returns a copy of the peers in recency order, least recently seen first.
    pub fn nodes(&self) -> Vec<P> {
        self.bucket.lock().nodes()
    }

    pub fn least_recently_seen(&self) -> Option<P> {
        self.bucket.lock().least_recently_seen()
    }

    pub fn last_seen(&self, id: &Id) -> Option<OffsetDateTime> {
        self.bucket.lock().last_seen(id)
    }

    pub fn closest(&self, target: &Id, n: usize) -> Vec<P> {
        self.bucket.lock().closest(target, n)
    }
}
