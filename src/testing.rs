//! Testing utilities for shelfr
//!
//! This module provides a shared catalog fixture for unit tests, so the
//! coordinator, backend and rendering tests all speak about the same four
//! well-known items instead of each inventing their own.
//!
//! Only available when compiled with `cfg(test)`.

use crate::catalog::{CatalogItem, ItemKind, SearchPage};
use crate::remote::MemoryBackend;

/// The canonical test catalog
///
/// Four items chosen to cover the filter axes: two categories (`tech` and
/// `fiction`), overlapping tags (`rust` appears in both categories), one
/// free bundle, and distinct prices for sort assertions.
///
/// # Examples
/// ```
/// # use shelfr::testing::sample_items;
/// let items = sample_items();
/// assert_eq!(items.len(), 4);
/// assert!(items.iter().any(|item| item.is_free()));
/// ```
#[must_use]
pub fn sample_items() -> Vec<CatalogItem> {
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

/// A settled result page over the whole canonical catalog
#[must_use]
pub fn sample_page() -> SearchPage {
    let items = sample_items();
    let total = items.len() as u64;
    SearchPage { items, total }
}

/// A deterministic backend seeded with the canonical catalog
///
/// Chain [`MemoryBackend::with_latency`] or take a probe before handing it
/// to a coordinator.
#[must_use]
pub fn seeded_backend() -> MemoryBackend {
    MemoryBackend::new(sample_items())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::CatalogBackend;

    #[test]
    fn test_sample_items_cover_filter_axes() {
        let items = sample_items();

        assert_eq!(items.len(), 4);
        assert_eq!(items.iter().filter(|i| i.is_free()).count(), 1);
        assert_eq!(
            items
                .iter()
                .filter(|i| i.category.as_deref() == Some("fiction"))
                .count(),
            2
        );

        // Unique ids, or request assertions get ambiguous
        let mut ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_sample_page_total_matches_items() {
        let page = sample_page();
        assert_eq!(page.total, page.items.len() as u64);
    }

    #[test]
    fn test_seeded_backend_serves_the_catalog() {
        let backend = seeded_backend();
        let facets = backend.facets().unwrap();
        assert_eq!(facets.categories, vec!["fiction", "tech"]);
    }
}
