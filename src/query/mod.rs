//! Query state for catalog searches
//!
//! [`QueryState`] is the single record the coordinator turns into a backend
//! request: free text, structured filters, sort controls and the pagination
//! cursor. Fields are private so every change goes through a mutator, which
//! is where the pagination invariant lives: changing anything except `page`
//! snaps `page` back to 1. Only the explicit page mutators move the cursor
//! without a reset.
//!
//! Mutators report whether they actually changed the state, so callers can
//! skip re-fetching when an interaction was a no-op (clicking the already
//! selected category, retyping the same text).

use crate::catalog::{SortField, SortOrder};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default page size when the config does not say otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Smallest accepted page size
pub const MIN_PAGE_SIZE: u32 = 1;

/// Largest page size the backend accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors from parsing query components
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid price range '{0}': expected MIN..MAX in dollars, e.g. 5..19.99")]
    InvalidPriceRange(String),

    #[error("invalid price range: min {min} exceeds max {max} (cents)")]
    PriceBoundsReversed { min: u32, max: u32 },
}

/// Inclusive price window in integer cents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min_cents: u32,
    max_cents: u32,
}

impl PriceRange {
    /// Build a range, rejecting reversed bounds
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::PriceBoundsReversed`] when `min > max`.
    pub fn new(min_cents: u32, max_cents: u32) -> Result<Self, QueryError> {
        if min_cents > max_cents {
            return Err(QueryError::PriceBoundsReversed {
                min: min_cents,
                max: max_cents,
            });
        }
        Ok(Self {
            min_cents,
            max_cents,
        })
    }

    #[must_use]
    pub const fn min_cents(self) -> u32 {
        self.min_cents
    }

    #[must_use]
    pub const fn max_cents(self) -> u32 {
        self.max_cents
    }

    /// Whether a price in cents falls inside the window
    #[must_use]
    pub const fn contains(self, cents: u32) -> bool {
        cents >= self.min_cents && cents <= self.max_cents
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", dollars(self.min_cents), dollars(self.max_cents))
    }
}

impl FromStr for PriceRange {
    type Err = QueryError;

    /// Parse `MIN..MAX` in dollars: `5..20`, `0.99..4.50`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once("..")
            .ok_or_else(|| QueryError::InvalidPriceRange(s.to_string()))?;

        let min_cents =
            parse_dollars(min).ok_or_else(|| QueryError::InvalidPriceRange(s.to_string()))?;
        let max_cents =
            parse_dollars(max).ok_or_else(|| QueryError::InvalidPriceRange(s.to_string()))?;

        Self::new(min_cents, max_cents)
    }
}

fn dollars(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn parse_dollars(s: &str) -> Option<u32> {
    let value: f64 = s.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX / 100) {
        return None;
    }
    // Round half-cents up so "4.995" does not undercut a 4.99 minimum
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some((value * 100.0).round() as u32)
}

/// The full query record the coordinator fetches against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    text: String,
    category: Option<String>,
    tags: BTreeSet<String>,
    price_range: Option<PriceRange>,
    is_free: Option<bool>,
    sort_by: SortField,
    sort_order: SortOrder,
    page: u32,
    page_size: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    /// Fresh state: empty text, no filters, default sort, page 1
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            text: String::new(),
            category: None,
            tags: BTreeSet::new(),
            price_range: None,
            is_free: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    #[must_use]
    pub const fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    #[must_use]
    pub const fn is_free(&self) -> Option<bool> {
        self.is_free
    }

    #[must_use]
    pub const fn sort_by(&self) -> SortField {
        self.sort_by
    }

    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Zero-based item offset for the current page
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    // ------------------------------------------------------------------
    // Mutators (everything except the page mutators resets page to 1)
    // ------------------------------------------------------------------

    /// Replace the free-text query. Returns whether the state changed.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.text == text {
            return false;
        }
        self.text = text;
        self.reset_page();
        true
    }

    /// Select or clear the category
    pub fn set_category(&mut self, category: Option<String>) -> bool {
        if self.category == category {
            return false;
        }
        self.category = category;
        self.reset_page();
        true
    }

    /// Add the tag if absent, remove it if present. Always a change.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
        self.reset_page();
        true
    }

    /// Replace the whole tag set
    pub fn set_tags(&mut self, tags: BTreeSet<String>) -> bool {
        if self.tags == tags {
            return false;
        }
        self.tags = tags;
        self.reset_page();
        true
    }

    /// Set or clear the price window
    pub fn set_price_range(&mut self, range: Option<PriceRange>) -> bool {
        if self.price_range == range {
            return false;
        }
        self.price_range = range;
        self.reset_page();
        true
    }

    /// Set the free/paid filter directly
    pub fn set_is_free(&mut self, is_free: Option<bool>) -> bool {
        if self.is_free == is_free {
            return false;
        }
        self.is_free = is_free;
        self.reset_page();
        true
    }

    /// Cycle the free/paid filter: both -> free only -> paid only -> both
    pub fn cycle_free(&mut self) {
        let next = match self.is_free {
            None => Some(true),
            Some(true) => Some(false),
            Some(false) => None,
        };
        self.is_free = next;
        self.reset_page();
    }

    pub fn set_sort_by(&mut self, field: SortField) -> bool {
        if self.sort_by == field {
            return false;
        }
        self.sort_by = field;
        self.reset_page();
        true
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        if self.sort_order == order {
            return false;
        }
        self.sort_order = order;
        self.reset_page();
        true
    }

    /// Advance to the next sort field
    pub fn cycle_sort(&mut self) {
        self.sort_by.cycle();
        self.reset_page();
    }

    /// Flip the sort direction
    pub fn flip_order(&mut self) {
        self.sort_order.flip();
        self.reset_page();
    }

    /// Change how many items a page holds (clamped). Resets to page 1.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        let page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        if self.page_size == page_size {
            return false;
        }
        self.page_size = page_size;
        self.reset_page();
        true
    }

    /// Jump to a page. The only mutator that leaves everything else alone.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if self.page == page {
            return false;
        }
        self.page = page;
        true
    }

    /// Drop every filter and the sort, keep the text, back to page 1
    ///
    /// Returns whether anything was actually cleared.
    pub fn clear_filters(&mut self) -> bool {
        let defaults = Self::new(self.page_size);
        let changed = self.category.is_some()
            || !self.tags.is_empty()
            || self.price_range.is_some()
            || self.is_free.is_some()
            || self.sort_by != defaults.sort_by
            || self.sort_order != defaults.sort_order;

        if changed {
            self.category = None;
            self.tags.clear();
            self.price_range = None;
            self.is_free = None;
            self.sort_by = defaults.sort_by;
            self.sort_order = defaults.sort_order;
            self.reset_page();
        }
        changed
    }

    const fn reset_page(&mut self) {
        self.page = 1;
    }

    // ------------------------------------------------------------------
    // Summaries
    // ------------------------------------------------------------------

    /// Whether any filter field differs from its default
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.category.is_some()
            || !self.tags.is_empty()
            || self.price_range.is_some()
            || self.is_free.is_some()
    }

    /// Short chip strings for the filter bar and CLI echo
    #[must_use]
    pub fn filter_chips(&self) -> Vec<String> {
        let mut chips = Vec::new();

        if let Some(category) = &self.category {
            chips.push(format!("category:{category}"));
        }
        for tag in &self.tags {
            chips.push(format!("#{tag}"));
        }
        if let Some(range) = self.price_range {
            chips.push(format!("price:{range}"));
        }
        match self.is_free {
            Some(true) => chips.push("free".to_string()),
            Some(false) => chips.push("paid".to_string()),
            None => {}
        }
        if self.sort_by != SortField::default() || self.sort_order != SortOrder::default() {
            chips.push(format!(
                "sort:{}{}",
                self.sort_by.as_str(),
                self.sort_order.arrow()
            ));
        }
        chips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page_three() -> QueryState {
        let mut state = QueryState::default();
        state.set_page(3);
        state
    }

    #[test]
    fn test_text_change_resets_page() {
        let mut state = on_page_three();
        assert!(state.set_text("fiction"));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_every_filter_field_resets_page() {
        let mut state = on_page_three();
        state.set_category(Some("fiction".into()));
        assert_eq!(state.page(), 1);

        state.set_page(3);
        state.toggle_tag("fantasy");
        assert_eq!(state.page(), 1);

        state.set_page(3);
        state.set_price_range(Some(PriceRange::new(500, 2000).unwrap()));
        assert_eq!(state.page(), 1);

        state.set_page(3);
        state.set_is_free(Some(true));
        assert_eq!(state.page(), 1);

        state.set_page(3);
        state.cycle_sort();
        assert_eq!(state.page(), 1);

        state.set_page(3);
        state.flip_order();
        assert_eq!(state.page(), 1);

        state.set_page(3);
        state.set_page_size(12);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_page_only_change_touches_nothing_else() {
        let mut state = QueryState::default();
        state.set_text("rust");
        state.set_category(Some("tech".into()));

        let before = state.clone();
        assert!(state.set_page(4));

        assert_eq!(state.page(), 4);
        assert_eq!(state.text(), before.text());
        assert_eq!(state.category(), before.category());
        assert_eq!(state.tags(), before.tags());
    }

    #[test]
    fn test_offset_derivation() {
        let mut state = QueryState::new(24);
        assert_eq!(state.offset(), 0);

        state.set_page(4);
        assert_eq!(state.offset(), 72);

        let mut small = QueryState::new(10);
        small.set_page(7);
        assert_eq!(small.offset(), 60);
    }

    #[test]
    fn test_noop_mutation_reports_unchanged() {
        let mut state = on_page_three();
        assert!(!state.set_text(""));
        assert_eq!(state.page(), 3, "no-op set must not reset the page");

        state.set_text("rust");
        state.set_page(2);
        assert!(!state.set_text("rust"));
        assert_eq!(state.page(), 2);

        assert!(!state.set_category(None));
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_toggle_tag_round_trip() {
        let mut state = QueryState::default();
        state.toggle_tag("fantasy");
        assert!(state.tags().contains("fantasy"));

        state.toggle_tag("fantasy");
        assert!(state.tags().is_empty());
    }

    #[test]
    fn test_cycle_free_covers_all_three() {
        let mut state = QueryState::default();
        assert_eq!(state.is_free(), None);
        state.cycle_free();
        assert_eq!(state.is_free(), Some(true));
        state.cycle_free();
        assert_eq!(state.is_free(), Some(false));
        state.cycle_free();
        assert_eq!(state.is_free(), None);
    }

    #[test]
    fn test_clear_filters_keeps_text() {
        let mut state = QueryState::default();
        state.set_text("compiler");
        state.set_category(Some("tech".into()));
        state.toggle_tag("rust");
        state.set_price_range(Some(PriceRange::new(0, 1000).unwrap()));
        state.set_is_free(Some(false));
        state.cycle_sort();
        state.set_page(5);

        assert!(state.clear_filters());

        assert_eq!(state.text(), "compiler");
        assert_eq!(state.category(), None);
        assert!(state.tags().is_empty());
        assert_eq!(state.price_range(), None);
        assert_eq!(state.is_free(), None);
        assert_eq!(state.sort_by(), SortField::default());
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_clear_filters_noop_when_clean() {
        let mut state = QueryState::default();
        state.set_text("still here");
        state.set_page(2);

        assert!(!state.clear_filters());
        assert_eq!(state.page(), 2, "nothing cleared, page must survive");
    }

    #[test]
    fn test_page_size_clamped() {
        let mut state = QueryState::new(0);
        assert_eq!(state.page_size(), MIN_PAGE_SIZE);

        state.set_page_size(10_000);
        assert_eq!(state.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_price_range_parsing() {
        let range: PriceRange = "5..20".parse().unwrap();
        assert_eq!(range.min_cents(), 500);
        assert_eq!(range.max_cents(), 2000);

        let range: PriceRange = "0.99..4.50".parse().unwrap();
        assert_eq!(range.min_cents(), 99);
        assert_eq!(range.max_cents(), 450);

        assert!("20..5".parse::<PriceRange>().is_err());
        assert!("cheap..expensive".parse::<PriceRange>().is_err());
        assert!("12".parse::<PriceRange>().is_err());
        assert!("-1..5".parse::<PriceRange>().is_err());
    }

    #[test]
    fn test_price_range_contains() {
        let range = PriceRange::new(500, 2000).unwrap();
        assert!(range.contains(500));
        assert!(range.contains(2000));
        assert!(!range.contains(499));
        assert!(!range.contains(2001));
    }

    #[test]
    fn test_filter_chips() {
        let mut state = QueryState::default();
        assert!(state.filter_chips().is_empty());

        state.set_category(Some("fiction".into()));
        state.toggle_tag("magic");
        state.set_is_free(Some(true));
        state.flip_order();

        let chips = state.filter_chips();
        assert!(chips.contains(&"category:fiction".to_string()));
        assert!(chips.contains(&"#magic".to_string()));
        assert!(chips.contains(&"free".to_string()));
        assert!(chips.iter().any(|c| c.starts_with("sort:")));
    }
}
