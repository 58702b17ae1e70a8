//! Foundational and often-reused types.

pub(crate) mod id;
pub(crate) mod peer;
pub(crate) mod traits;
