//! Shared lookup cache for suggestions, popular searches and facets
//!
//! The storefront UI this crate descends from fetched suggestion and
//! popular-search lists independently in every component that wanted them.
//! Here they live in one time-boxed cache that every surface reads through:
//! the TUI popup, the picker overlays and the one-shot CLI commands.
//!
//! Invalidation is defined, not accidental: entries age out after the
//! configured TTL, a prefix can be dropped on demand, and switching
//! backends clears everything.

use crate::remote::{Facets, PopularQuery};
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Default entry lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default entry cap
pub const DEFAULT_CAPACITY: u64 = 1000;

/// Cache key: one keyspace for all three lookup kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LookupKey {
    /// Suggestions for a (lowercased) prefix
    Prefix(String),
    Popular,
    Facets,
}

/// Cached payload, Arc-wrapped so hits clone cheaply
#[derive(Clone)]
enum LookupValue {
    Suggestions(Arc<Vec<String>>),
    Popular(Arc<Vec<PopularQuery>>),
    Facets(Arc<Facets>),
}

/// Time-boxed cache shared by every suggestion consumer
pub struct SuggestionCache {
    cache: Cache<LookupKey, LookupValue>,
}

impl SuggestionCache {
    /// Cache with the default TTL and capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    /// Cache with explicit TTL and capacity
    #[must_use]
    pub fn with_config(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();
        Self { cache }
    }

    /// Cached suggestions for a prefix, if fresh
    #[must_use]
    pub fn suggestions(&self, prefix: &str) -> Option<Arc<Vec<String>>> {
        match self.cache.get(&LookupKey::Prefix(normalize(prefix))) {
            Some(LookupValue::Suggestions(list)) => Some(list),
            _ => None,
        }
    }

    /// Store suggestions fetched for a prefix
    pub fn store_suggestions(&self, prefix: &str, suggestions: Vec<String>) {
        self.cache.insert(
            LookupKey::Prefix(normalize(prefix)),
            LookupValue::Suggestions(Arc::new(suggestions)),
        );
    }

    /// Cached popular-search list, if fresh
    #[must_use]
    pub fn popular(&self) -> Option<Arc<Vec<PopularQuery>>> {
        match self.cache.get(&LookupKey::Popular) {
            Some(LookupValue::Popular(list)) => Some(list),
            _ => None,
        }
    }

    /// Store the popular-search list
    pub fn store_popular(&self, popular: Vec<PopularQuery>) {
        self.cache
            .insert(LookupKey::Popular, LookupValue::Popular(Arc::new(popular)));
    }

    /// Cached facet vocabulary, if fresh
    #[must_use]
    pub fn facets(&self) -> Option<Arc<Facets>> {
        match self.cache.get(&LookupKey::Facets) {
            Some(LookupValue::Facets(facets)) => Some(facets),
            _ => None,
        }
    }

    /// Store the facet vocabulary
    pub fn store_facets(&self, facets: Facets) {
        self.cache
            .insert(LookupKey::Facets, LookupValue::Facets(Arc::new(facets)));
    }

    /// Drop the cached list for one prefix
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.cache.invalidate(&LookupKey::Prefix(normalize(prefix)));
    }

    /// Drop everything, e.g. after the backend URL changes
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// (entry count, weighted size) for the status line
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (self.cache.entry_count(), self.cache.weighted_size())
    }
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical form of a lookup prefix, shared with the coordinator
pub(crate) fn normalize(prefix: &str) -> String {
    prefix.trim().to_lowercase()
}
