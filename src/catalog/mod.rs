//! Domain types for the storefront catalog
//!
//! Pure data structures shared by the backend client, the query coordinator
//! and both front ends. Conversions live on the types themselves; business
//! logic does not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Domain Types
// ============================================================================

/// A single catalog entry as the storefront returns it
///
/// Fields map one-to-one onto the JSON the search endpoint emits. Display
/// concerns (price formatting, tag coloring) live in the UI layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable identifier assigned by the storefront
    pub id: String,

    /// Title shown in listings
    pub title: String,

    /// Whether this is a single title or a bundle
    #[serde(default)]
    pub kind: ItemKind,

    /// Category the item is filed under, if any
    #[serde(default)]
    pub category: Option<String>,

    /// Tags attached by the storefront
    #[serde(default)]
    pub tags: Vec<String>,

    /// Price in integer cents; zero means free
    pub price_cents: u32,

    /// Publication timestamp, when the storefront exposes one
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    /// Web page for the item, used by the open-in-browser action
    #[serde(default)]
    pub link: Option<String>,
}

/// Catalog entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Book,
    Bundle,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Items for the requested page, in backend order
    pub items: Vec<CatalogItem>,

    /// Total matches across all pages
    pub total: u64,
}

// ============================================================================
// Sort Controls
// ============================================================================

/// Field the backend sorts results by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Relevance,
    Title,
    Price,
    Published,
}

/// Direction the backend sorts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

// ============================================================================
// Implementations
// ============================================================================

impl CatalogItem {
    /// Create an item with the fields every entry carries
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            category: None,
            tags: Vec::new(),
            price_cents: 0,
            published_at: None,
            link: None,
        }
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the tags
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the price in cents
    #[must_use]
    pub const fn priced(mut self, cents: u32) -> Self {
        self.price_cents = cents;
        self
    }

    /// Set the publication timestamp
    #[must_use]
    pub const fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Set the item's web page
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Whether the item costs nothing
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.price_cents == 0
    }

    /// Price rendered for display (`free`, `$12.50`)
    #[must_use]
    pub fn price_display(&self) -> String {
        format_price(self.price_cents)
    }
}

impl ItemKind {
    /// Short label for listings
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Bundle => "bundle",
        }
    }
}

impl SearchPage {
    /// Empty page with a zero total
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Whether the query matched nothing at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl SortField {
    /// Wire name, also used in permalinks
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Title => "title",
            Self::Price => "price",
            Self::Published => "published",
        }
    }

    /// Advance to the next field, wrapping around
    pub const fn cycle(&mut self) {
        *self = match self {
            Self::Relevance => Self::Title,
            Self::Title => Self::Price,
            Self::Price => Self::Published,
            Self::Published => Self::Relevance,
        };
    }

    /// Parse a wire/permalink name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "relevance" => Some(Self::Relevance),
            "title" => Some(Self::Title),
            "price" => Some(Self::Price),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("unknown sort field '{s}' (expected relevance, title, price or published)")
        })
    }
}

impl SortOrder {
    /// Wire name, also used in permalinks
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Flip direction in place
    pub const fn flip(&mut self) {
        *self = match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        };
    }

    /// Arrow glyph for the filter bar
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }

    /// Parse a wire/permalink name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown sort order '{s}' (expected asc or desc)"))
    }
}

/// Render cents as a display price
#[must_use]
pub fn format_price(cents: u32) -> String {
    if cents == 0 {
        "free".to_string()
    } else {
        format!("${}.{:02}", cents / 100, cents % 100)
    }
}
