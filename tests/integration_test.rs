//! Integration tests for shelfr
//!
//! These tests drive the complete fetch pipeline: a real coordinator with
//! its worker thread over the in-memory backend, plus the share and history
//! workflows a browse session strings together.

use shelfr::catalog::{CatalogItem, ItemKind, SearchPage, SortField, SortOrder};
use shelfr::coordinator::{CoordinatorOptions, FetchState, QueryCoordinator, SubmitOutcome};
use shelfr::history::SearchHistory;
use shelfr::query::{DEFAULT_PAGE_SIZE, PriceRange, QueryState};
use shelfr::remote::{MemoryBackend, PopularQuery};
use shelfr::share;
use std::time::{Duration, Instant};

/// The catalog every test searches
fn catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("1", "Rust in Anger", ItemKind::Book)
            .with_category("tech")
            .with_tags(["rust", "systems"])
            .priced(1999),
        CatalogItem::new("2", "The Borrow Chronicles", ItemKind::Book)
            .with_category("fiction")
            .with_tags(["fantasy", "rust"])
            .priced(899),
        CatalogItem::new("3", "Starter Pack", ItemKind::Bundle)
            .with_category("tech")
            .with_tags(["beginner"]),
        CatalogItem::new("4", "Zero Cost", ItemKind::Book)
            .with_category("fiction")
            .with_tags(["fantasy"])
            .priced(1250),
    ]
}

fn coordinator_over(backend: MemoryBackend) -> QueryCoordinator {
    QueryCoordinator::new(Box::new(backend), CoordinatorOptions::default()).unwrap()
}

/// Pump until the in-flight fetch lands, one way or the other
fn settle(coordinator: &mut QueryCoordinator) -> FetchState {
    let deadline = Instant::now() + Duration::from_secs(5);
    while coordinator.fetch_state().is_loading() {
        assert!(Instant::now() < deadline, "fetch never settled");
        coordinator.pump(Instant::now());
        std::thread::sleep(Duration::from_millis(2));
    }
    coordinator.fetch_state().clone()
}

fn settle_page(coordinator: &mut QueryCoordinator) -> SearchPage {
    match settle(coordinator) {
        FetchState::Ready(page) => page,
        FetchState::Error(message) => panic!("fetch failed: {message}"),
        FetchState::Loading => unreachable!(),
    }
}

/// Pump until a cached lookup (suggestions, popular, facets) hits
fn poll_until<T>(
    coordinator: &mut QueryCoordinator,
    mut lookup: impl FnMut(&mut QueryCoordinator) -> Option<T>,
) -> T {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        coordinator.pump(Instant::now());
        if let Some(value) = lookup(coordinator) {
            return value;
        }
        assert!(Instant::now() < deadline, "lookup never arrived");
        std::thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn test_first_fetch_settles_with_the_full_catalog() {
    let backend = MemoryBackend::new(catalog());
    let probe = backend.probe();
    let mut coordinator = coordinator_over(backend);

    coordinator.submit(&QueryState::default());
    let page = settle_page(&mut coordinator);

    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 4);
    assert_eq!(probe.search_calls(), 1);

    let request = probe.last_request().unwrap();
    assert_eq!(request.query, "");
    assert_eq!(request.offset, 0);
    assert_eq!(request.limit, DEFAULT_PAGE_SIZE);
}

#[test]
fn test_typing_debounces_into_one_trailing_fetch() {
    let backend = MemoryBackend::new(catalog());
    let probe = backend.probe();
    let mut coordinator = coordinator_over(backend);

    coordinator.submit(&QueryState::default());
    settle_page(&mut coordinator);
    assert_eq!(probe.search_calls(), 1);

    // Seven keystrokes, each re-arming the debounce window
    let now = Instant::now();
    let mut state = QueryState::default();
    for prefix in ["f", "fi", "fic", "fict", "ficti", "fictio", "fiction"] {
        state.set_text(prefix);
        coordinator.note_edit(&state, now);
    }

    // Inside the window nothing is fetched
    coordinator.pump(now + Duration::from_millis(100));
    assert!(coordinator.has_pending_edit());
    assert_eq!(probe.search_calls(), 1);

    // Past the deadline exactly one fetch fires, carrying the final text
    coordinator.pump(now + Duration::from_millis(300));
    assert!(!coordinator.has_pending_edit());
    let page = settle_page(&mut coordinator);

    assert_eq!(page.total, 2);
    assert_eq!(probe.search_calls(), 2);
    assert_eq!(probe.last_request().unwrap().query, "fiction");
}

#[test]
fn test_pagination_moves_the_wire_offset_and_filters_reset_it() {
    let backend = MemoryBackend::new(catalog());
    let probe = backend.probe();
    let mut coordinator = coordinator_over(backend);

    let mut state = QueryState::new(1);
    state.set_text("rust");
    coordinator.submit(&state);
    let page = settle_page(&mut coordinator);
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);

    state.set_page(2);
    coordinator.submit(&state);
    let page = settle_page(&mut coordinator);
    assert_eq!(probe.last_request().unwrap().offset, 1);
    assert_eq!(page.items[0].id, "2");

    // Narrowing the query drops back to the first page
    state.toggle_tag("fantasy");
    assert_eq!(state.page(), 1);
    coordinator.submit(&state);
    let page = settle_page(&mut coordinator);

    let request = probe.last_request().unwrap();
    assert_eq!(request.offset, 0);
    assert_eq!(request.tags, vec!["fantasy".to_string()]);
    assert_eq!(page.total, 1);
}

#[test]
fn test_identical_resubmit_suppressed_but_retry_refetches() {
    let backend = MemoryBackend::new(catalog());
    let probe = backend.probe();
    let mut coordinator = coordinator_over(backend);

    let state = QueryState::default();
    coordinator.submit(&state);
    settle_page(&mut coordinator);

    assert_eq!(coordinator.submit(&state), SubmitOutcome::Deduplicated);
    assert_eq!(probe.search_calls(), 1);

    coordinator.retry().unwrap();
    settle_page(&mut coordinator);
    assert_eq!(probe.search_calls(), 2);
}

#[test]
fn test_backend_failure_surfaces_then_retry_recovers() {
    let backend = MemoryBackend::new(catalog());
    let probe = backend.probe();
    probe.fail_next_searches(1);
    let mut coordinator = coordinator_over(backend);

    coordinator.submit(&QueryState::default());
    let failed = settle(&mut coordinator);
    let message = failed.error_message().expect("expected a failed fetch");
    assert!(message.contains("connection refused"));

    coordinator.retry().unwrap();
    let page = settle_page(&mut coordinator);
    assert_eq!(page.total, 4);
    assert_eq!(probe.search_calls(), 2);
}

#[test]
fn test_slow_response_never_overwrites_a_newer_request() {
    let backend = MemoryBackend::new(catalog()).with_latency(Duration::from_millis(100));
    let probe = backend.probe();
    let mut coordinator = coordinator_over(backend);

    let mut slow = QueryState::default();
    slow.set_text("zero");
    coordinator.submit(&slow);

    // Let the worker pick up the slow search before superseding it
    std::thread::sleep(Duration::from_millis(25));

    let mut fast = QueryState::default();
    fast.set_text("rust");
    coordinator.submit(&fast);

    let page = settle_page(&mut coordinator);
    assert_eq!(page.total, 2, "the newer query's results must win");
    assert_eq!(probe.last_request().unwrap().query, "rust");
    assert_eq!(coordinator.stale_dropped(), 1);
}

#[test]
fn test_suggestions_flow_into_the_shared_cache() {
    let backend = MemoryBackend::new(catalog());
    let mut coordinator = coordinator_over(backend);

    // First ask misses and queues a lookup
    assert!(coordinator.request_suggestions("ru").is_none());

    let hit = poll_until(&mut coordinator, |c| c.request_suggestions("ru"));
    assert_eq!(hit.as_slice(), ["Rust in Anger".to_string(), "rust".to_string()]);

    // Now cached: answered without another round trip
    assert!(coordinator.request_suggestions("ru").is_some());
}

#[test]
fn test_facets_and_popular_arrive_for_the_pickers() {
    let backend = MemoryBackend::new(catalog()).with_popular(vec![
        PopularQuery {
            query: "rust".to_string(),
            count: 42,
        },
        PopularQuery {
            query: "fantasy".to_string(),
            count: 17,
        },
    ]);
    let mut coordinator = coordinator_over(backend);

    assert!(coordinator.request_facets().is_none());
    let facets = poll_until(&mut coordinator, |c| c.request_facets());
    assert_eq!(facets.categories, vec!["fiction", "tech"]);
    assert!(facets.tags.contains(&"fantasy".to_string()));

    let popular = poll_until(&mut coordinator, |c| c.request_popular());
    assert_eq!(popular[0].query, "rust");
    assert_eq!(popular[0].count, 42);
}

#[test]
fn test_share_link_resumes_the_same_browse() {
    let mut state = QueryState::default();
    state.set_text("rust");
    state.toggle_tag("rust");
    state.set_price_range(Some(PriceRange::new(500, 3000).unwrap()));
    state.set_sort_by(SortField::Price);
    state.set_sort_order(SortOrder::Asc);

    let link = share::permalink("https://shop.example.com", &state).unwrap();
    let resumed = share::parse_permalink(&link).unwrap();
    assert_eq!(resumed, state);

    // The resumed state asks the backend for exactly the same view
    let backend = MemoryBackend::new(catalog());
    let probe = backend.probe();
    let mut coordinator = coordinator_over(backend);
    coordinator.submit(&resumed);
    let page = settle_page(&mut coordinator);

    let request = probe.last_request().unwrap();
    assert_eq!(request.price_range, Some((500, 3000)));
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].id, "2", "cheapest first under price/asc");
}

#[test]
fn test_history_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    {
        let mut history = SearchHistory::load(path.clone(), 10);
        history.record("rust books");
        history.record("fiction");
        history.record("rust books");
        history.save().unwrap();
    }

    let reloaded = SearchHistory::load(path, 10);
    assert_eq!(reloaded.recent(5), ["rust books", "fiction"]);
}
