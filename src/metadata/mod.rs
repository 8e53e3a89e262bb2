//! App metadata cache
//!
//! Key features:
//! - Durable: entries persist between runs in a JSON file
//! - Lazy-loading: only apps missing from the cache hit the store API
//! - Permanent "unavailable" sentinels: apps the store does not know are never retried
//! - Batched saves: the file is rewritten every few new entries and at the end of a run

mod cache;
mod types;

pub use cache::{CacheStats, MetadataCache, RetryPolicy};
pub use types::{AppId, CachedItem, ItemStatus};
