//! The k-bucket, a bounded container of peers with least-recently-seen eviction.

mod bucket;
#[cfg(feature = "sync")]
mod sync;

pub use bucket::{Bucket, Insertion, DEFAULT_KSIZE};
#[cfg(feature = "sync")]
pub use sync::SyncBucket;
