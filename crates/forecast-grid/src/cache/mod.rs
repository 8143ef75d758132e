//! Cache implementations for grid lookups.

mod header_cache;

pub use header_cache::{HeaderCache, HeaderCacheStats};
