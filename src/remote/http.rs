//! HTTP implementation of [`CatalogBackend`]
//!
//! Talks to the storefront search API with a blocking reqwest client. The
//! coordinator calls this from its worker thread, never from the UI thread,
//! so blocking here is fine.

use super::{
    ApiErrorBody, BackendError, CatalogBackend, Facets, PopularQuery, PopularResponse, Result,
    SearchRequest, SuggestResponse,
};
use crate::catalog::SearchPage;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const SEARCH_PATH: &str = "/api/catalog/search";
const SUGGEST_PATH: &str = "/api/catalog/suggest";
const POPULAR_PATH: &str = "/api/catalog/popular";
const FACETS_PATH: &str = "/api/catalog/facets";

/// Storefront search API client
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    /// Build a client for the given base URL
    ///
    /// The URL is taken without a trailing slash; endpoint paths are
    /// appended verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] for non-http(s) URLs and
    /// [`BackendError::Network`] if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(BackendError::InvalidUrl(base_url));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    /// Base URL this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }
        Ok(response.json::<T>()?)
    }
}

impl CatalogBackend for HttpBackend {
    fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let response = self
            .client
            .post(self.endpoint(SEARCH_PATH))
            .json(request)
            .send()?;
        Self::decode(response)
    }

    fn suggest(&self, prefix: &str, limit: u32) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint(SUGGEST_PATH))
            .query(&[("prefix", prefix), ("limit", &limit.to_string())])
            .send()?;
        let body: SuggestResponse = Self::decode(response)?;
        Ok(body.suggestions)
    }

    fn popular(&self, limit: u32) -> Result<Vec<PopularQuery>> {
        let response = self
            .client
            .get(self.endpoint(POPULAR_PATH))
            .query(&[("limit", &limit.to_string())])
            .send()?;
        let body: PopularResponse = Self::decode(response)?;
        Ok(body.queries)
    }

    fn facets(&self) -> Result<Facets> {
        let response = self.client.get(self.endpoint(FACETS_PATH)).send()?;
        Self::decode(response)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Pull a human-readable message out of a non-2xx body
///
/// The storefront answers errors as `{"error": "..."}`; anything else falls
/// back to the HTTP status.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|payload| payload.error)
        .unwrap_or_else(|_| format!("HTTP status {status}"))
}
