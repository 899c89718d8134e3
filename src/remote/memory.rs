//! In-process catalog backend
//!
//! A deterministic [`CatalogBackend`] over a fixed set of items, applying
//! the same filter, sort and pagination semantics as the storefront. Tests
//! drive the coordinator against it; library consumers can use it to try a
//! front end without a storefront running.
//!
//! A [`MemoryProbe`] taken before the backend moves onto the coordinator's
//! worker thread keeps visibility into what the backend saw: how many
//! searches ran and the exact request of the newest one.

use super::{BackendError, CatalogBackend, Facets, PopularQuery, Result, SearchRequest};
use crate::catalog::{CatalogItem, SearchPage, SortField, SortOrder};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared view into a [`MemoryBackend`] that has moved to another thread
#[derive(Clone)]
pub struct MemoryProbe {
    search_calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<SearchRequest>>>,
    failures_left: Arc<AtomicUsize>,
}

impl MemoryProbe {
    /// Number of search requests the backend has served or failed
    #[must_use]
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(AtomicOrdering::SeqCst)
    }

    /// The newest request the backend received, if any
    #[must_use]
    pub fn last_request(&self) -> Option<SearchRequest> {
        self.last_request.lock().unwrap().clone()
    }

    /// Make the next `n` searches fail with a network error
    pub fn fail_next_searches(&self, n: usize) {
        self.failures_left.store(n, AtomicOrdering::SeqCst);
    }
}

/// Deterministic catalog over in-memory items
pub struct MemoryBackend {
    items: Vec<CatalogItem>,
    popular: Vec<PopularQuery>,
    latency: Option<Duration>,
    search_calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<SearchRequest>>>,
    failures_left: Arc<AtomicUsize>,
}

impl MemoryBackend {
    /// Build a backend over the given items
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items,
            popular: Vec::new(),
            latency: None,
            search_calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
            failures_left: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the popular-searches list `popular()` serves
    #[must_use]
    pub fn with_popular(mut self, popular: Vec<PopularQuery>) -> Self {
        self.popular = popular;
        self
    }

    /// Add artificial latency to every call
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Take a probe before handing the backend to the coordinator
    #[must_use]
    pub fn probe(&self) -> MemoryProbe {
        MemoryProbe {
            search_calls: Arc::clone(&self.search_calls),
            last_request: Arc::clone(&self.last_request),
            failures_left: Arc::clone(&self.failures_left),
        }
    }

    fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |n| {
                n.checked_sub(1)
            })
            .is_ok()
    }

    fn matches(item: &CatalogItem, request: &SearchRequest) -> bool {
        if !request.query.is_empty() {
            let needle = request.query.to_lowercase();
            let in_title = item.title.to_lowercase().contains(&needle);
            let in_tags = item.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            let in_category = item
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle));
            if !in_title && !in_tags && !in_category {
                return false;
            }
        }

        if let Some(category) = &request.category
            && item.category.as_deref() != Some(category.as_str())
        {
            return false;
        }

        // Every requested tag must be present
        if !request.tags.is_empty()
            && !request.tags.iter().all(|t| item.tags.contains(t))
        {
            return false;
        }

        if let Some((min, max)) = request.price_range
            && (item.price_cents < min || item.price_cents > max)
        {
            return false;
        }

        if let Some(is_free) = request.is_free
            && item.is_free() != is_free
        {
            return false;
        }

        true
    }

    fn compare(a: &CatalogItem, b: &CatalogItem, field: SortField) -> Ordering {
        match field {
            // Insertion order stands in for backend relevance
            SortField::Relevance => Ordering::Equal,
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Price => a.price_cents.cmp(&b.price_cents),
            SortField::Published => a.published_at.cmp(&b.published_at),
        }
    }
}

impl CatalogBackend for MemoryBackend {
    fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        self.simulate_latency();
        self.search_calls.fetch_add(1, AtomicOrdering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if self.take_failure() {
            return Err(BackendError::Network("connection refused".to_string()));
        }

        let mut matched: Vec<&CatalogItem> = self
            .items
            .iter()
            .filter(|item| Self::matches(item, request))
            .collect();

        matched.sort_by(|a, b| {
            let ordering = Self::compare(a, b, request.sort_by);
            match request.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        let start = usize::try_from(request.offset).unwrap_or(usize::MAX);
        let items = matched
            .into_iter()
            .skip(start)
            .take(request.limit as usize)
            .cloned()
            .collect();

        Ok(SearchPage { items, total })
    }

    fn suggest(&self, prefix: &str, limit: u32) -> Result<Vec<String>> {
        self.simulate_latency();
        let needle = prefix.to_lowercase();
        let mut candidates = BTreeSet::new();

        for item in &self.items {
            if item.title.to_lowercase().starts_with(&needle) {
                candidates.insert(item.title.clone());
            }
            for tag in &item.tags {
                if tag.to_lowercase().starts_with(&needle) {
                    candidates.insert(tag.clone());
                }
            }
        }

        Ok(candidates.into_iter().take(limit as usize).collect())
    }

    fn popular(&self, limit: u32) -> Result<Vec<PopularQuery>> {
        self.simulate_latency();
        Ok(self.popular.iter().take(limit as usize).cloned().collect())
    }

    fn facets(&self) -> Result<Facets> {
        self.simulate_latency();
        let categories: BTreeSet<String> = self
            .items
            .iter()
            .filter_map(|item| item.category.clone())
            .collect();
        let tags: BTreeSet<String> = self
            .items
            .iter()
            .flat_map(|item| item.tags.iter().cloned())
            .collect();

        Ok(Facets {
            categories: categories.into_iter().collect(),
            tags: tags.into_iter().collect(),
        })
    }

    fn describe(&self) -> String {
        format!("memory ({} items)", self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryState;
    use crate::testing::seeded_backend as fixture;

    fn request(f: impl FnOnce(&mut QueryState)) -> SearchRequest {
        let mut state = QueryState::new(24);
        f(&mut state);
        SearchRequest::from(&state)
    }

    #[test]
    fn test_text_matches_title_tags_category() {
        let backend = fixture();

        let page = backend.search(&request(|s| {
            s.set_text("borrow");
        })).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "2");

        let page = backend.search(&request(|s| {
            s.set_text("rust");
        })).unwrap();
        assert_eq!(page.total, 2);

        let page = backend.search(&request(|s| {
            s.set_text("fiction");
        })).unwrap();
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_all_tags_must_match() {
        let backend = fixture();
        let page = backend.search(&request(|s| {
            s.toggle_tag("fantasy");
            s.toggle_tag("rust");
        })).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "2");
    }

    #[test]
    fn test_price_and_free_filters() {
        let backend = fixture();

        let page = backend.search(&request(|s| {
            s.set_price_range(Some(crate::query::PriceRange::new(800, 1300).unwrap()));
        })).unwrap();
        assert_eq!(page.total, 2);

        let page = backend.search(&request(|s| {
            s.set_is_free(Some(true));
        })).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "3");

        let page = backend.search(&request(|s| {
            s.set_is_free(Some(false));
        })).unwrap();
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_sort_by_price() {
        let backend = fixture();
        let page = backend.search(&request(|s| {
            s.set_sort_by(SortField::Price);
            s.set_sort_order(SortOrder::Asc);
        })).unwrap();

        let prices: Vec<u32> = page.items.iter().map(|i| i.price_cents).collect();
        assert_eq!(prices, vec![0, 899, 1250, 1999]);
    }

    #[test]
    fn test_pagination_window() {
        let backend = fixture();
        let page = backend.search(&request(|s| {
            s.set_page_size(2);
            s.set_sort_by(SortField::Title);
            s.set_sort_order(SortOrder::Asc);
            s.set_page(2);
        })).unwrap();

        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "The Borrow Chronicles");
    }

    #[test]
    fn test_offset_past_end_returns_empty_page() {
        let backend = fixture();
        let page = backend.search(&request(|s| {
            s.set_page(50);
        })).unwrap();

        assert_eq!(page.total, 4);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_probe_counts_and_records() {
        let backend = fixture();
        let probe = backend.probe();

        assert_eq!(probe.search_calls(), 0);
        backend.search(&request(|s| {
            s.set_text("rust");
        })).unwrap();

        assert_eq!(probe.search_calls(), 1);
        assert_eq!(probe.last_request().unwrap().query, "rust");
    }

    #[test]
    fn test_scripted_failures_then_recovery() {
        let backend = fixture();
        let probe = backend.probe();
        probe.fail_next_searches(1);

        let err = backend.search(&request(|_| {})).unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));

        // Failure budget spent, next call succeeds
        assert!(backend.search(&request(|_| {})).is_ok());
        assert_eq!(probe.search_calls(), 2);
    }

    #[test]
    fn test_suggest_prefix() {
        let backend = fixture();
        let suggestions = backend.suggest("ru", 10).unwrap();
        assert_eq!(suggestions, vec!["Rust in Anger", "rust"]);
    }

    #[test]
    fn test_facets_deduplicated_sorted() {
        let backend = fixture();
        let facets = backend.facets().unwrap();
        assert_eq!(facets.categories, vec!["fiction", "tech"]);
        assert!(facets.tags.contains(&"fantasy".to_string()));
        assert_eq!(
            facets.tags.iter().filter(|t| *t == "rust").count(),
            1
        );
    }
}
