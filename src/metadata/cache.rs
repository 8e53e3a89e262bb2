//! Metadata cache with lazy-loading from the store catalog

use crate::catalog::{AppDetails, AppLookup, CatalogClient};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::logging::log_error;
use crate::metadata::types::{AppId, CachedItem};
use crate::storage::{CacheEntries, CacheStore};
use std::time::Duration;

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub api_calls: u64,
    pub api_errors: u64,
    pub fetched: u64,
    pub unavailable: u64,
    pub given_up: u64,
    pub flushes: u64,
}

/// Bounded exponential backoff for store lookups
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Sleep before the first attempt as well, spacing out consecutive lookups
    pub delay_first_attempt: bool,
}

impl RetryPolicy {
    /// Delay to wait before `attempt` (1-based): `base_delay * 2^(attempt-1)`
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 && !self.delay_first_attempt {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        FetchConfig::default().into()
    }
}

impl From<FetchConfig> for RetryPolicy {
    fn from(config: FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay,
            delay_first_attempt: config.delay_first_attempt,
        }
    }
}

/// Durable metadata cache backed by the store catalog
///
/// Cache hits never touch the network. Misses are looked up one at a time
/// with retries; results (including "unavailable" sentinels) are kept and
/// written back to disk every `save_every` insertions.
pub struct MetadataCache<C> {
    /// Store catalog client
    client: C,

    /// Backing cache file
    store: CacheStore,

    /// Cached entries in insertion order
    entries: CacheEntries,

    retry: RetryPolicy,

    /// Insertions between batch flushes
    save_every: usize,

    /// Insertions since the last successful flush
    pending: usize,

    stats: CacheStats,
}

impl<C: CatalogClient> MetadataCache<C> {
    /// Load the cache file and wrap it around `client`
    pub async fn open(
        client: C,
        store: CacheStore,
        retry: RetryPolicy,
        save_every: usize,
    ) -> Result<Self> {
        let entries = store.load().await?;
        Ok(Self::with_entries(client, store, entries, retry, save_every))
    }

    /// Create a cache from already loaded entries
    pub fn with_entries(
        client: C,
        store: CacheStore,
        entries: CacheEntries,
        retry: RetryPolicy,
        save_every: usize,
    ) -> Self {
        tracing::debug!(
            entries = entries.len(),
            max_attempts = retry.max_attempts,
            base_delay_ms = retry.base_delay.as_millis() as u64,
            save_every = save_every,
            "Creating metadata cache"
        );

        Self {
            client,
            store,
            entries,
            retry,
            save_every: save_every.max(1),
            pending: 0,
            stats: CacheStats::default(),
        }
    }

    /// Resolve metadata for `app_id` seen in `collection`
    ///
    /// Returns the cached entry on a hit (sentinels included, unchanged),
    /// the freshly fetched entry on a miss, and `None` when the store reports
    /// the app as unavailable or every attempt failed.
    pub async fn resolve(&mut self, app_id: AppId, collection: &str) -> Option<&CachedItem> {
        if self.entries.contains_key(&app_id) {
            self.stats.hits += 1;
            return self.merge_collection(app_id, collection);
        }

        self.stats.misses += 1;
        tracing::debug!(app_id = %app_id, "Cache miss, fetching from Steam store");

        let mut attempts = 0;
        for attempt in 1..=self.retry.max_attempts {
            attempts = attempt;
            let delay = self.retry.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            self.stats.api_calls += 1;
            match self.client.app_details(app_id).await {
                Ok(AppLookup::Found(details)) => {
                    let item = build_item(app_id, details, collection);
                    tracing::info!(
                        app_id = %app_id,
                        name = %item.display_name(),
                        collection = %collection,
                        "✅ Fetched"
                    );
                    self.stats.fetched += 1;
                    self.insert(item).await;
                    return self.entries.get(&app_id);
                }
                Ok(AppLookup::Unavailable) => {
                    tracing::info!(app_id = %app_id, "App unavailable in store, caching sentinel");
                    self.stats.unavailable += 1;
                    self.insert(CachedItem::unavailable(app_id)).await;
                    return None;
                }
                Err(e) => {
                    self.stats.api_errors += 1;
                    tracing::warn!(
                        app_id = %app_id,
                        attempt = attempt,
                        max_attempts = self.retry.max_attempts,
                        next_delay_ms = self.retry.delay_before(attempt + 1).as_millis() as u64,
                        error = %e,
                        "⚠️ Lookup failed"
                    );
                    if !e.is_transient() {
                        break;
                    }
                }
            }
        }

        self.stats.given_up += 1;
        tracing::warn!(
            app_id = %app_id,
            attempts = attempts,
            "❌ Giving up on app"
        );
        None
    }

    /// Merge a collection name into a cached available entry
    fn merge_collection(&mut self, app_id: AppId, collection: &str) -> Option<&CachedItem> {
        let item = self.entries.get_mut(&app_id)?;
        if item.is_unavailable() {
            tracing::debug!(app_id = %app_id, "Cache hit (unavailable)");
            return Some(&*item);
        }

        let was_empty = item.collection.is_empty();
        if item.add_collection(collection) {
            tracing::info!(
                app_id = %app_id,
                name = %item.display_name(),
                collection = %collection,
                "🗂️ Cache hit, added {}collection info",
                if was_empty { "" } else { "additional " }
            );
        } else {
            tracing::info!(
                app_id = %app_id,
                name = %item.display_name(),
                "🗂️ Cache hit"
            );
        }
        Some(&*item)
    }

    async fn insert(&mut self, item: CachedItem) {
        self.entries.insert(item.appid, item);
        self.pending += 1;

        if self.pending >= self.save_every {
            if let Err(e) = self.flush().await {
                log_error("batch_flush", &e);
            }
        }
    }

    /// Write the whole cache to disk
    pub async fn flush(&mut self) -> Result<()> {
        self.store.save(&self.entries).await?;
        self.stats.flushes += 1;
        self.pending = 0;
        tracing::debug!(
            entries = self.entries.len(),
            path = %self.store.path().display(),
            "💾 Cache saved"
        );
        Ok(())
    }

    pub fn get(&self, app_id: AppId) -> Option<&CachedItem> {
        self.entries.get(&app_id)
    }

    pub fn entries(&self) -> &CacheEntries {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insertions not yet written to disk
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Log cache statistics
    pub fn log_stats(&self) {
        let stats = &self.stats;
        let lookups = stats.hits + stats.misses;
        let hit_rate = if lookups > 0 {
            (stats.hits as f32 / lookups as f32 * 100.0) as u32
        } else {
            0
        };

        tracing::info!(
            entries = self.entries.len(),
            hit_rate = hit_rate,
            fetched = stats.fetched,
            unavailable = stats.unavailable,
            given_up = stats.given_up,
            api_calls = stats.api_calls,
            api_errors = stats.api_errors,
            flushes = stats.flushes,
            "Metadata cache statistics"
        );
    }
}

fn build_item(app_id: AppId, details: AppDetails, collection: &str) -> CachedItem {
    CachedItem {
        appid: app_id,
        name: details.name,
        app_type: details.app_type,
        release_date: details.release_date,
        developers: details.developers,
        publishers: details.publishers,
        genres: details.genres,
        is_free: details.is_free,
        header_image: details.header_image,
        collection: vec![collection.to_string()],
        status: None,
    }
}
