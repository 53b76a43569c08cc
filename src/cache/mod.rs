//! In-memory cache for catalog lookups
//!
//! Memoizes results per distinct call (operation plus arguments) for a bounded
//! time-to-live with a bounded entry count. Expired entries are purged on
//! insertion and the oldest insertion is evicted when the table is full.
//! Concurrent misses on the same key are collapsed into a single computation.
//! Nothing is persisted; the table lives as long as its owner.

mod key;
mod store;

pub use key::{CacheKey, Operation};
pub use store::{CacheStats, TtlCache};
