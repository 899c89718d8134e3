//! Shareable permalinks for catalog queries
//!
//! A permalink is the storefront's `/search` page with the query state
//! spelled out in the query string, e.g.
//!
//! ```text
//! https://shop.example.com/search?q=fiction&tag=fantasy&price=5.00..20.00&page=2
//! ```
//!
//! Only non-default fields are written, so a fresh query shares as a bare
//! `/search`. Parsing is tolerant of unknown parameters (trackers and the
//! like) but rejects malformed values for the ones it owns.

use crate::catalog::{SortField, SortOrder};
use crate::query::{DEFAULT_PAGE_SIZE, PriceRange, QueryState};
use reqwest::Url;
use std::collections::BTreeSet;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShareError>;

/// Errors from encoding or decoding a permalink
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("invalid share url: {0}")]
    InvalidUrl(String),

    #[error("invalid value `{value}` for `{name}`: {reason}")]
    InvalidParam {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Build a permalink for `state` on the storefront at `base`
///
/// # Errors
///
/// Returns [`ShareError::InvalidUrl`] when `base` does not parse as an
/// absolute URL.
pub fn permalink(base: &str, state: &QueryState) -> Result<String> {
    let mut url = Url::parse(base).map_err(|err| ShareError::InvalidUrl(err.to_string()))?;
    url.set_path("/search");
    url.set_query(None);

    {
        let mut pairs = url.query_pairs_mut();
        if !state.text().is_empty() {
            pairs.append_pair("q", state.text());
        }
        if let Some(category) = state.category() {
            pairs.append_pair("category", category);
        }
        for tag in state.tags() {
            pairs.append_pair("tag", tag);
        }
        if let Some(range) = state.price_range() {
            pairs.append_pair(
                "price",
                &format!("{}..{}", dollars(range.min_cents()), dollars(range.max_cents())),
            );
        }
        if let Some(is_free) = state.is_free() {
            pairs.append_pair("free", if is_free { "true" } else { "false" });
        }
        if state.sort_by() != SortField::default() {
            pairs.append_pair("sort", state.sort_by().as_str());
        }
        if state.sort_order() != SortOrder::default() {
            pairs.append_pair("order", state.sort_order().as_str());
        }
        if state.page_size() != DEFAULT_PAGE_SIZE {
            pairs.append_pair("limit", &state.page_size().to_string());
        }
        if state.page() > 1 {
            pairs.append_pair("page", &state.page().to_string());
        }
    }

    // A defaulted state leaves an empty query string behind
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url.to_string())
}

/// Reconstruct a [`QueryState`] from a permalink
///
/// Unknown parameters are ignored. The page is applied last, after every
/// other field, since filter and text changes reset it.
///
/// # Errors
///
/// Returns [`ShareError::InvalidUrl`] for an unparseable URL and
/// [`ShareError::InvalidParam`] for a malformed known parameter.
pub fn parse_permalink(link: &str) -> Result<QueryState> {
    let url = Url::parse(link).map_err(|err| ShareError::InvalidUrl(err.to_string()))?;

    let mut state = QueryState::default();
    let mut tags = BTreeSet::new();
    let mut page = None;

    for (name, value) in url.query_pairs() {
        match name.as_ref() {
            "q" => {
                state.set_text(value.as_ref());
            }
            "category" => {
                state.set_category(Some(value.to_string()));
            }
            "tag" => {
                tags.insert(value.to_string());
            }
            "price" => {
                let range: PriceRange = value.parse().map_err(|err| invalid("price", &value, err))?;
                state.set_price_range(Some(range));
            }
            "free" => match value.as_ref() {
                "true" => {
                    state.set_is_free(Some(true));
                }
                "false" => {
                    state.set_is_free(Some(false));
                }
                _ => return Err(invalid("free", &value, "expected `true` or `false`")),
            },
            "sort" => {
                let field = SortField::parse(&value)
                    .ok_or_else(|| invalid("sort", &value, "unknown sort field"))?;
                state.set_sort_by(field);
            }
            "order" => {
                let order = SortOrder::parse(&value)
                    .ok_or_else(|| invalid("order", &value, "expected `asc` or `desc`"))?;
                state.set_sort_order(order);
            }
            "limit" => {
                let limit: u32 = value
                    .parse()
                    .map_err(|_| invalid("limit", &value, "expected a number"))?;
                state.set_page_size(limit);
            }
            "page" => {
                let number: u32 = value
                    .parse()
                    .map_err(|_| invalid("page", &value, "expected a number"))?;
                page = Some(number);
            }
            _ => {}
        }
    }

    if !tags.is_empty() {
        state.set_tags(tags);
    }
    if let Some(number) = page {
        state.set_page(number);
    }
    Ok(state)
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ShareError {
    ShareError::InvalidParam {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn dollars(cents: u32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
