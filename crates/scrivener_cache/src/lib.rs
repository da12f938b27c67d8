//! Keyed caching with TTL and LRU eviction.
//!
//! The pipeline keeps generated genre style guides here so repeated genres
//! skip regeneration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;

pub use cache::{TtlCache, TtlCacheConfig, TtlCacheConfigBuilder};
