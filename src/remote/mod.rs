//! Backend client layer
//!
//! [`CatalogBackend`] is the seam between the query coordinator and the
//! storefront: one synchronous trait covering search, suggestions, popular
//! queries and facet listings. The coordinator's worker thread owns a boxed
//! backend, so implementations are free to block.
//!
//! # Implementations
//!
//! - [`HttpBackend`] - the real storefront search API over JSON
//! - [`MemoryBackend`] - deterministic in-process catalog for tests, demos
//!   and library consumers wiring up their own front end
//!
//! # Wire format
//!
//! The search endpoint takes a JSON body with camelCase fields:
//!
//! ```json
//! { "query": "fiction", "tags": ["fantasy"], "priceRange": [500, 2000],
//!   "limit": 24, "offset": 0, "sortBy": "relevance", "sortOrder": "desc" }
//! ```
//!
//! and answers `{ "items": [...], "total": 240 }`. Optional filters are
//! omitted entirely rather than sent as null.

mod error;
mod http;
mod memory;

pub use error::BackendError;
pub use http::HttpBackend;
pub use memory::{MemoryBackend, MemoryProbe};

use crate::catalog::{SearchPage, SortField, SortOrder};
use crate::query::QueryState;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, BackendError>;

/// Everything the coordinator needs from a storefront
///
/// Implementations must be `Send`: the coordinator moves the backend onto
/// its worker thread.
pub trait CatalogBackend: Send {
    /// Run a catalog search for one page of results
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] for transport failures, non-2xx responses
    /// and undecodable bodies. Zero matches is `Ok` with `total == 0`.
    fn search(&self, request: &SearchRequest) -> Result<SearchPage>;

    /// Completion candidates for a typed prefix
    ///
    /// # Errors
    ///
    /// Same failure classes as [`CatalogBackend::search`].
    fn suggest(&self, prefix: &str, limit: u32) -> Result<Vec<String>>;

    /// Most-searched queries, storefront-wide
    ///
    /// # Errors
    ///
    /// Same failure classes as [`CatalogBackend::search`].
    fn popular(&self, limit: u32) -> Result<Vec<PopularQuery>>;

    /// Known categories and tags, for the filter pickers
    ///
    /// # Errors
    ///
    /// Same failure classes as [`CatalogBackend::search`].
    fn facets(&self) -> Result<Facets>;

    /// Short human-readable identity for the status line
    fn describe(&self) -> String;
}

/// Search request as the endpoint accepts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,

    /// Inclusive `[minCents, maxCents]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<(u32, u32)>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,

    pub limit: u32,
    pub offset: u64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl From<&QueryState> for SearchRequest {
    fn from(state: &QueryState) -> Self {
        Self {
            query: state.text().to_string(),
            category: state.category().map(str::to_string),
            tags: state.tags().iter().cloned().collect(),
            price_range: state
                .price_range()
                .map(|r| (r.min_cents(), r.max_cents())),
            is_free: state.is_free(),
            limit: state.page_size(),
            offset: state.offset(),
            sort_by: state.sort_by(),
            sort_order: state.sort_order(),
        }
    }
}

/// One entry of the popular-searches list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularQuery {
    pub query: String,
    pub count: u64,
}

/// Category and tag vocabulary the storefront knows about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Error payload shape the storefront uses for non-2xx answers
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
}

/// Suggestion list payload
#[derive(Debug, Deserialize)]
pub(crate) struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Popular-searches payload
#[derive(Debug, Deserialize)]
pub(crate) struct PopularResponse {
    #[serde(default)]
    pub queries: Vec<PopularQuery>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PriceRange;

    #[test]
    fn test_request_from_query_state() {
        let mut state = QueryState::new(24);
        state.set_text("fiction");
        state.set_category(Some("books".into()));
        state.toggle_tag("fantasy");
        state.set_price_range(Some(PriceRange::new(500, 2000).unwrap()));
        state.set_page(3);

        let request = SearchRequest::from(&state);
        assert_eq!(request.query, "fiction");
        assert_eq!(request.category.as_deref(), Some("books"));
        assert_eq!(request.tags, vec!["fantasy"]);
        assert_eq!(request.price_range, Some((500, 2000)));
        assert_eq!(request.limit, 24);
        assert_eq!(request.offset, 48);
    }

    #[test]
    fn test_request_wire_shape() {
        let mut state = QueryState::new(12);
        state.set_text("rust");
        let request = SearchRequest::from(&state);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["query"], "rust");
        assert_eq!(json["sortBy"], "relevance");
        assert_eq!(json["sortOrder"], "desc");
        assert_eq!(json["limit"], 12);
        assert_eq!(json["offset"], 0);
        // Unset filters stay off the wire entirely
        assert!(json.get("category").is_none());
        assert!(json.get("tags").is_none());
        assert!(json.get("priceRange").is_none());
        assert!(json.get("isFree").is_none());
    }

    #[test]
    fn test_request_tags_ordered() {
        let mut state = QueryState::new(24);
        state.toggle_tag("zebra");
        state.toggle_tag("aardvark");

        let request = SearchRequest::from(&state);
        assert_eq!(request.tags, vec!["aardvark", "zebra"]);
    }
}
