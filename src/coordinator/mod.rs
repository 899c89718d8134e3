//! Query coordination between the front ends and the backend
//!
//! [`QueryCoordinator`] owns the fetch lifecycle: it turns [`QueryState`]
//! changes into backend requests, keeps the UI thread off the network, and
//! guarantees that what the presenter shows always corresponds to the newest
//! request.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐ submit / note_edit ┌──────────────────┐
//! │ UI event loop │ ──────────────────▶│ QueryCoordinator │
//! │  (50ms tick)  │ ◀───────────────── │ seq + debounce   │
//! └───────────────┘   pump() applies   └────────┬─────────┘
//!                                               │ jobs (channel)
//!                                               ▼
//!                                      ┌──────────────────┐
//!                                      │  worker thread   │
//!                                      │  CatalogBackend  │
//!                                      └──────────────────┘
//! ```
//!
//! # Ordering
//!
//! Every issued search carries a sequence number from a monotonically
//! increasing counter. Outcomes are compared against the newest issued
//! number at apply time; anything older is dropped and counted instead of
//! racing the current view. The worker additionally coalesces queued
//! searches, so holding page-down does not fetch every intermediate page.
//!
//! # Debounce
//!
//! Text edits go through [`QueryCoordinator::note_edit`], which arms a
//! deadline instead of fetching. Each edit re-arms it; the fetch fires on
//! the first [`QueryCoordinator::pump`] after the deadline passes. Filter
//! clicks and explicit submits call [`QueryCoordinator::submit`], which
//! cancels any armed edit and fetches immediately.

use crate::catalog::SearchPage;
use crate::query::QueryState;
use crate::remote::{BackendError, CatalogBackend, Facets, PopularQuery, SearchRequest};
use crate::suggest::SuggestionCache;
use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoordinatorError>;

/// Errors from coordinator construction
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("failed to start fetch worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

/// Latest fetch outcome, exactly what the presenter renders
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// A request is in flight and nothing newer has settled
    #[default]
    Loading,

    /// The newest request failed; the message is already human-readable
    Error(String),

    /// The newest request settled. `total == 0` is the empty state.
    Ready(SearchPage),
}

impl FetchState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Error message, when the newest fetch failed
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Settled page, when the newest fetch succeeded
    #[must_use]
    pub const fn page(&self) -> Option<&SearchPage> {
        match self {
            Self::Ready(page) => Some(page),
            _ => None,
        }
    }
}

/// What a submit call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A fetch was issued with this sequence number
    Issued(u64),

    /// State identical to the last issued one; no fetch
    Deduplicated,
}

/// Tuning knobs, normally filled from the config file
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Trailing debounce window for text edits
    pub debounce: Duration,

    /// How many suggestions / popular entries to ask for
    pub suggest_limit: u32,

    /// Lifetime of cached suggestion lookups
    pub suggest_ttl: Duration,

    /// Cap on cached suggestion lookups
    pub suggest_capacity: u64,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            suggest_limit: 8,
            suggest_ttl: crate::suggest::DEFAULT_TTL,
            suggest_capacity: crate::suggest::DEFAULT_CAPACITY,
        }
    }
}

/// Work shipped to the worker thread
enum Job {
    Search { seq: u64, request: SearchRequest },
    Suggest { prefix: String, limit: u32 },
    Popular { limit: u32 },
    Facets,
}

/// Results shipped back from the worker thread
enum Outcome {
    Search {
        seq: u64,
        result: std::result::Result<SearchPage, BackendError>,
    },
    Suggest {
        prefix: String,
        result: std::result::Result<Vec<String>, BackendError>,
    },
    Popular {
        result: std::result::Result<Vec<PopularQuery>, BackendError>,
    },
    Facets {
        result: std::result::Result<Facets, BackendError>,
    },
}

/// A text edit waiting out its debounce window
struct PendingEdit {
    state: QueryState,
    deadline: Instant,
}

/// Coordinates fetches for one browse or search session
pub struct QueryCoordinator {
    jobs: Sender<Job>,
    outcomes: Receiver<Outcome>,
    backend_label: String,

    fetch_state: FetchState,
    cache: SuggestionCache,

    debounce: Duration,
    suggest_limit: u32,
    pending: Option<PendingEdit>,

    last_issued: Option<QueryState>,
    latest_seq: u64,
    stale_dropped: u64,

    suggest_inflight: HashSet<String>,
    popular_inflight: bool,
    facets_inflight: bool,
    lookup_error: Option<String>,
}

impl QueryCoordinator {
    /// Spawn the worker thread and wire up the channels
    ///
    /// The backend moves onto the worker; it exits on its own once the
    /// coordinator is dropped and the job channel closes.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::WorkerSpawn`] if the OS refuses the
    /// thread.
    pub fn new(
        backend: Box<dyn CatalogBackend>,
        options: CoordinatorOptions,
    ) -> Result<Self> {
        let (job_tx, job_rx) = unbounded();
        let (outcome_tx, outcome_rx) = unbounded();
        let backend_label = backend.describe();

        std::thread::Builder::new()
            .name("shelfr-fetch".to_string())
            .spawn(move || run_worker(backend, &job_rx, &outcome_tx))?;

        Ok(Self {
            jobs: job_tx,
            outcomes: outcome_rx,
            backend_label,
            fetch_state: FetchState::Loading,
            cache: SuggestionCache::with_config(options.suggest_ttl, options.suggest_capacity),
            debounce: options.debounce,
            suggest_limit: options.suggest_limit,
            pending: None,
            last_issued: None,
            latest_seq: 0,
            stale_dropped: 0,
            suggest_inflight: HashSet::new(),
            popular_inflight: false,
            facets_inflight: false,
            lookup_error: None,
        })
    }

    // ------------------------------------------------------------------
    // Fetch entry points
    // ------------------------------------------------------------------

    /// Fetch immediately for filter clicks, pagination and explicit submits
    ///
    /// Cancels any armed debounce. A state identical to the last issued one
    /// is deduplicated and does not fetch again.
    pub fn submit(&mut self, state: &QueryState) -> SubmitOutcome {
        self.pending = None;
        if self.last_issued.as_ref() == Some(state) {
            return SubmitOutcome::Deduplicated;
        }
        SubmitOutcome::Issued(self.issue(state))
    }

    /// Re-issue the last submitted state, bypassing deduplication
    ///
    /// This is the retry action on the error screen. Returns the new
    /// sequence number, or `None` when nothing was ever issued.
    pub fn retry(&mut self) -> Option<u64> {
        self.pending = None;
        let state = self.last_issued.clone()?;
        Some(self.issue(&state))
    }

    /// Register a text edit, arming (or re-arming) the debounce deadline
    ///
    /// An edit that lands back on the last issued state disarms the
    /// deadline instead; there is nothing new to fetch.
    pub fn note_edit(&mut self, state: &QueryState, now: Instant) {
        if self.last_issued.as_ref() == Some(state) {
            self.pending = None;
            return;
        }
        self.pending = Some(PendingEdit {
            state: state.clone(),
            deadline: now + self.debounce,
        });
    }

    /// Drive the coordinator: fire due debounced edits, apply outcomes
    ///
    /// Call once per UI tick. Returns whether anything visible changed.
    pub fn pump(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(pending) = self.pending.take_if(|p| now >= p.deadline) {
            if self.last_issued.as_ref() != Some(&pending.state) {
                self.issue(&pending.state);
                changed = true;
            }
        }

        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) => changed |= self.apply(outcome),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        changed
    }

    // ------------------------------------------------------------------
    // Cached lookups (suggestions, popular searches, facets)
    // ------------------------------------------------------------------

    /// Suggestions for a prefix: cache hit now, or a background fetch
    ///
    /// Returns `None` on a miss and enqueues the lookup (once); the list
    /// lands in the shared cache and later calls hit it.
    pub fn request_suggestions(&mut self, prefix: &str) -> Option<Arc<Vec<String>>> {
        let key = crate::suggest::normalize(prefix);
        if key.is_empty() {
            return None;
        }
        if let Some(hit) = self.cache.suggestions(&key) {
            return Some(hit);
        }
        if self.suggest_inflight.insert(key.clone()) {
            self.send_job(Job::Suggest {
                prefix: key,
                limit: self.suggest_limit,
            });
        }
        None
    }

    /// Popular searches: cache hit now, or a background fetch
    pub fn request_popular(&mut self) -> Option<Arc<Vec<PopularQuery>>> {
        if let Some(hit) = self.cache.popular() {
            return Some(hit);
        }
        if !self.popular_inflight {
            self.popular_inflight = true;
            self.send_job(Job::Popular {
                limit: self.suggest_limit,
            });
        }
        None
    }

    /// Facet vocabulary: cache hit now, or a background fetch
    pub fn request_facets(&mut self) -> Option<Arc<Facets>> {
        if let Some(hit) = self.cache.facets() {
            return Some(hit);
        }
        if !self.facets_inflight {
            self.facets_inflight = true;
            self.send_job(Job::Facets);
        }
        None
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn fetch_state(&self) -> &FetchState {
        &self.fetch_state
    }

    #[must_use]
    pub const fn last_issued(&self) -> Option<&QueryState> {
        self.last_issued.as_ref()
    }

    /// Responses dropped for being older than the newest request
    #[must_use]
    pub const fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    #[must_use]
    pub fn has_pending_edit(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn backend_label(&self) -> &str {
        &self.backend_label
    }

    #[must_use]
    pub const fn suggestion_cache(&self) -> &SuggestionCache {
        &self.cache
    }

    /// Most recent lookup failure, if any (best-effort surfaces only)
    pub fn take_lookup_error(&mut self) -> Option<String> {
        self.lookup_error.take()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn issue(&mut self, state: &QueryState) -> u64 {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.last_issued = Some(state.clone());
        self.fetch_state = FetchState::Loading;
        self.send_job(Job::Search {
            seq,
            request: SearchRequest::from(state),
        });
        seq
    }

    fn send_job(&mut self, job: Job) {
        if self.jobs.send(job).is_err() {
            self.fetch_state = FetchState::Error("search worker stopped".to_string());
        }
    }

    fn apply(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Search { seq, result } => {
                if seq < self.latest_seq {
                    self.stale_dropped += 1;
                    return false;
                }
                self.fetch_state = match result {
                    Ok(page) => FetchState::Ready(page),
                    Err(err) => FetchState::Error(err.to_string()),
                };
                true
            }
            Outcome::Suggest { prefix, result } => {
                self.suggest_inflight.remove(&prefix);
                match result {
                    Ok(list) => {
                        self.cache.store_suggestions(&prefix, list);
                        true
                    }
                    Err(err) => {
                        self.lookup_error = Some(err.to_string());
                        false
                    }
                }
            }
            Outcome::Popular { result } => {
                self.popular_inflight = false;
                match result {
                    Ok(list) => {
                        self.cache.store_popular(list);
                        true
                    }
                    Err(err) => {
                        self.lookup_error = Some(err.to_string());
                        false
                    }
                }
            }
            Outcome::Facets { result } => {
                self.facets_inflight = false;
                match result {
                    Ok(facets) => {
                        self.cache.store_facets(facets);
                        true
                    }
                    Err(err) => {
                        self.lookup_error = Some(err.to_string());
                        false
                    }
                }
            }
        }
    }
}

/// Worker loop: drain the queue, coalesce searches, answer everything else
fn run_worker(
    backend: Box<dyn CatalogBackend>,
    jobs: &Receiver<Job>,
    outcomes: &Sender<Outcome>,
) {
    while let Ok(first) = jobs.recv() {
        let mut batch = vec![first];
        while let Ok(next) = jobs.try_recv() {
            batch.push(next);
        }

        // Only the newest queued search matters; its sequence number covers
        // the skipped ones. Lookups are all answered, before the search.
        let mut search: Option<(u64, SearchRequest)> = None;
        for job in batch {
            let outcome = match job {
                Job::Search { seq, request } => {
                    search = Some((seq, request));
                    continue;
                }
                Job::Suggest { prefix, limit } => Outcome::Suggest {
                    result: backend.suggest(&prefix, limit),
                    prefix,
                },
                Job::Popular { limit } => Outcome::Popular {
                    result: backend.popular(limit),
                },
                Job::Facets => Outcome::Facets {
                    result: backend.facets(),
                },
            };
            if outcomes.send(outcome).is_err() {
                return;
            }
        }

        if let Some((seq, request)) = search {
            let result = backend.search(&request);
            if outcomes.send(Outcome::Search { seq, result }).is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_page, seeded_backend};

    /// Backend that never answers within a test's lifetime, so apply-path
    /// tests stay fully deterministic.
    fn stalled_coordinator() -> QueryCoordinator {
        let backend = seeded_backend().with_latency(Duration::from_secs(120));
        QueryCoordinator::new(Box::new(backend), CoordinatorOptions::default()).unwrap()
    }

    fn issued(outcome: SubmitOutcome) -> u64 {
        match outcome {
            SubmitOutcome::Issued(seq) => seq,
            SubmitOutcome::Deduplicated => panic!("expected a fetch to be issued"),
        }
    }

    #[test]
    fn test_submit_sets_loading_immediately() {
        let mut coordinator = stalled_coordinator();
        let state = QueryState::default();

        issued(coordinator.submit(&state));
        assert!(coordinator.fetch_state().is_loading());
        assert_eq!(coordinator.last_issued(), Some(&state));
    }

    #[test]
    fn test_identical_submit_deduplicated() {
        let mut coordinator = stalled_coordinator();
        let state = QueryState::default();

        issued(coordinator.submit(&state));
        assert_eq!(coordinator.submit(&state), SubmitOutcome::Deduplicated);

        // A real change issues again
        let mut changed = state.clone();
        changed.set_text("rust");
        issued(coordinator.submit(&changed));
    }

    #[test]
    fn test_retry_bypasses_dedup_and_reissues_identical_state() {
        let mut coordinator = stalled_coordinator();
        let state = QueryState::default();

        let first = issued(coordinator.submit(&state));
        let retried = coordinator.retry().unwrap();

        assert!(retried > first, "retry must issue a fresh request");
        assert_eq!(coordinator.last_issued(), Some(&state));
    }

    #[test]
    fn test_retry_without_history_is_noop() {
        let mut coordinator = stalled_coordinator();
        assert_eq!(coordinator.retry(), None);
    }

    #[test]
    fn test_stale_outcome_dropped_at_apply() {
        let mut coordinator = stalled_coordinator();

        let mut first = QueryState::default();
        first.set_text("slow");
        let old_seq = issued(coordinator.submit(&first));

        let mut second = QueryState::default();
        second.set_text("fast");
        let new_seq = issued(coordinator.submit(&second));

        // Old response arrives after the newer request was issued
        let applied = coordinator.apply(Outcome::Search {
            seq: old_seq,
            result: Ok(SearchPage::empty()),
        });
        assert!(!applied);
        assert_eq!(coordinator.stale_dropped(), 1);
        assert!(coordinator.fetch_state().is_loading(), "stale data must not render");

        // The newest response lands
        let page = sample_page();
        let applied = coordinator.apply(Outcome::Search {
            seq: new_seq,
            result: Ok(page.clone()),
        });
        assert!(applied);
        assert_eq!(coordinator.fetch_state().page(), Some(&page));
    }

    #[test]
    fn test_error_outcome_becomes_error_state() {
        let mut coordinator = stalled_coordinator();
        let state = QueryState::default();
        let seq = issued(coordinator.submit(&state));

        coordinator.apply(Outcome::Search {
            seq,
            result: Err(BackendError::Network("connection refused".into())),
        });

        let message = coordinator.fetch_state().error_message().unwrap();
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_note_edit_arms_and_rearms_deadline() {
        let mut coordinator = stalled_coordinator();
        let start = Instant::now();

        let mut state = QueryState::default();
        for (i, prefix) in ["f", "fi", "fic", "fict", "ficti", "fictio", "fiction"]
            .iter()
            .enumerate()
        {
            state.set_text(*prefix);
            coordinator.note_edit(&state, start + Duration::from_millis(10 * i as u64));
        }
        assert!(coordinator.has_pending_edit());

        // Inside the window nothing fires
        assert!(!coordinator.pump(start + Duration::from_millis(100)));
        assert!(coordinator.has_pending_edit());

        // Past the final deadline exactly one fetch fires, with the final text
        coordinator.pump(start + Duration::from_millis(60 + 250));
        assert!(!coordinator.has_pending_edit());
        assert_eq!(coordinator.last_issued().unwrap().text(), "fiction");
        assert_eq!(coordinator.latest_seq, 1);
    }

    #[test]
    fn test_edit_back_to_issued_state_disarms() {
        let mut coordinator = stalled_coordinator();
        let now = Instant::now();

        let mut state = QueryState::default();
        state.set_text("rust");
        issued(coordinator.submit(&state));

        let mut edited = state.clone();
        edited.set_text("rustt");
        coordinator.note_edit(&edited, now);
        assert!(coordinator.has_pending_edit());

        // Backspace returns to what is already on screen
        edited.set_text("rust");
        coordinator.note_edit(&edited, now);
        assert!(!coordinator.has_pending_edit());

        assert!(!coordinator.pump(now + Duration::from_secs(1)));
        assert_eq!(coordinator.latest_seq, 1);
    }

    #[test]
    fn test_submit_cancels_pending_edit() {
        let mut coordinator = stalled_coordinator();
        let now = Instant::now();

        let mut typed = QueryState::default();
        typed.set_text("fic");
        coordinator.note_edit(&typed, now);

        let mut clicked = QueryState::default();
        clicked.set_category(Some("fiction".into()));
        issued(coordinator.submit(&clicked));

        assert!(!coordinator.has_pending_edit());
        // Later pumps must not resurrect the typed state
        coordinator.pump(now + Duration::from_secs(1));
        assert_eq!(coordinator.last_issued(), Some(&clicked));
    }

    #[test]
    fn test_suggest_requests_deduplicate_in_flight() {
        let mut coordinator = stalled_coordinator();

        assert!(coordinator.request_suggestions("fic").is_none());
        assert!(coordinator.request_suggestions("fic").is_none());
        assert!(coordinator.request_suggestions("FIC ").is_none());
        assert_eq!(coordinator.suggest_inflight.len(), 1);

        assert!(coordinator.request_suggestions("").is_none());
        assert_eq!(coordinator.suggest_inflight.len(), 1);
    }

    #[test]
    fn test_suggest_outcome_fills_shared_cache() {
        let mut coordinator = stalled_coordinator();
        assert!(coordinator.request_suggestions("fic").is_none());

        coordinator.apply(Outcome::Suggest {
            prefix: "fic".to_string(),
            result: Ok(vec!["fiction".to_string()]),
        });

        let hit = coordinator.request_suggestions("fic").unwrap();
        assert_eq!(hit.as_slice(), ["fiction".to_string()]);
        assert!(coordinator.suggest_inflight.is_empty());
    }

    #[test]
    fn test_lookup_error_surfaced_once() {
        let mut coordinator = stalled_coordinator();
        coordinator.request_popular();

        coordinator.apply(Outcome::Popular {
            result: Err(BackendError::Network("down".into())),
        });

        assert!(coordinator.take_lookup_error().is_some());
        assert!(coordinator.take_lookup_error().is_none());
        // Failure cleared the in-flight flag, a later call re-requests
        assert!(!coordinator.popular_inflight);
    }
}
