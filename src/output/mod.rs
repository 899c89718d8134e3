//! Output formatting for CLI display
//!
//! This module renders search results and lookups for the one-shot
//! commands: colored text for people, JSON and CSV for pipes. The browse
//! TUI has its own widgets and does not come through here.

use crate::catalog::{CatalogItem, ItemKind, SearchPage, format_price};
use crate::query::QueryState;
use crate::remote::PopularQuery;
use clap::ValueEnum;
use colored::Colorize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutputError>;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to encode results as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode results as CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Wire format for one-shot search output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable listing
    #[default]
    Text,
    /// The page as pretty-printed JSON
    Json,
    /// One row per item
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
        };
        write!(f, "{name}")
    }
}

/// Render a result page in the requested format
///
/// # Errors
///
/// Returns [`OutputError`] when JSON or CSV encoding fails.
pub fn render_page(
    format: OutputFormat,
    page: &SearchPage,
    state: &QueryState,
    quiet: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_page_text(page, state, quiet)),
        OutputFormat::Json => render_page_json(page),
        OutputFormat::Csv => render_page_csv(page),
    }
}

/// Human-readable listing with a one-line header
#[must_use]
pub fn render_page_text(page: &SearchPage, state: &QueryState, quiet: bool) -> String {
    let mut out = String::new();

    if page.items.is_empty() {
        if !quiet {
            out.push_str("No items matched.\n");
            if state.has_active_filters() {
                out.push_str("Hint: drop filters with `shelfr search` or adjust them.\n");
            }
        }
        return out;
    }

    if !quiet {
        let pages = total_pages(page.total, state.page_size());
        out.push_str(&format!(
            "Found {} item(s) (page {} of {}):\n",
            page.total,
            state.page(),
            pages
        ));
    }

    for item in &page.items {
        out.push_str(&item_line(item, quiet));
        out.push('\n');
    }

    out
}

/// One listing line per item
#[must_use]
pub fn item_line(item: &CatalogItem, quiet: bool) -> String {
    let price = format_price(item.price_cents);

    if quiet {
        return format!("{}\t{}\t{}", item.id, item.title, price);
    }

    let mut line = format!("  {}", item.title.bold());

    if let Some(category) = &item.category {
        line.push_str(&format!(" [{}]", category.blue()));
    }
    if item.kind != ItemKind::Book {
        line.push_str(&format!(" ({})", item.kind.label()));
    }
    if !item.tags.is_empty() {
        line.push_str(&format!(" {}", item.tags.join(", ").dimmed()));
    }

    let price_colored = if item.is_free() {
        price.green().to_string()
    } else {
        price.yellow().to_string()
    };
    line.push_str(&format!("  {price_colored}"));

    line
}

/// The whole page as pretty-printed JSON, wire field names included
///
/// # Errors
///
/// Returns [`OutputError::Json`] when serialization fails.
pub fn render_page_json(page: &SearchPage) -> Result<String> {
    Ok(serde_json::to_string_pretty(page)?)
}

/// One CSV row per item; tags are semicolon-joined
///
/// # Errors
///
/// Returns [`OutputError::Csv`] when a row cannot be written.
pub fn render_page_csv(page: &SearchPage) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "title",
        "kind",
        "category",
        "tags",
        "priceCents",
        "publishedAt",
        "link",
    ])?;

    for item in &page.items {
        writer.write_record([
            item.id.as_str(),
            item.title.as_str(),
            item.kind.label(),
            item.category.as_deref().unwrap_or(""),
            &item.tags.join(";"),
            &item.price_cents.to_string(),
            &item
                .published_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
            item.link.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Suggestion list for `shelfr suggest`
#[must_use]
pub fn render_suggestions(prefix: &str, suggestions: &[String], quiet: bool) -> String {
    let mut out = String::new();

    if suggestions.is_empty() {
        if !quiet {
            out.push_str(&format!("No suggestions for '{prefix}'\n"));
        }
        return out;
    }

    if !quiet {
        out.push_str(&format!("Suggestions for '{prefix}':\n"));
    }
    for suggestion in suggestions {
        if quiet {
            out.push_str(suggestion);
        } else {
            out.push_str(&format!("  {suggestion}"));
        }
        out.push('\n');
    }

    out
}

/// Popular-searches list for `shelfr popular`
#[must_use]
pub fn render_popular(popular: &[PopularQuery], quiet: bool) -> String {
    let mut out = String::new();

    if popular.is_empty() {
        if !quiet {
            out.push_str("No popular searches yet\n");
        }
        return out;
    }

    if !quiet {
        out.push_str("Popular searches:\n");
    }
    for entry in popular {
        if quiet {
            out.push_str(&format!("{}\t{}\n", entry.query, entry.count));
        } else {
            out.push_str(&format!(
                "  {} {}\n",
                entry.query,
                format!("({} searches)", entry.count).dimmed()
            ));
        }
    }

    out
}

/// Number of pages needed for `total` results
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    let size = u64::from(page_size.max(1));
    total.div_ceil(size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> SearchPage {
        SearchPage {
            items: vec![
                CatalogItem::new("1", "Rust in Anger", ItemKind::Book)
                    .with_category("tech")
                    .with_tags(["rust", "systems"])
                    .priced(1999),
                CatalogItem::new("2", "Starter Pack", ItemKind::Bundle),
            ],
            total: 2,
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 24), 1);
        assert_eq!(total_pages(24, 24), 1);
        assert_eq!(total_pages(25, 24), 2);
        assert_eq!(total_pages(100, 24), 5);
    }

    #[test]
    fn test_quiet_item_line_is_tab_separated() {
        let page = page();
        let line = item_line(&page.items[0], true);
        assert_eq!(line, "1\tRust in Anger\t$19.99");
    }

    #[test]
    fn test_text_lists_every_item() {
        let rendered = render_page_text(&page(), &QueryState::default(), false);
        assert!(rendered.contains("Found 2 item(s)"));
        assert!(rendered.contains("Rust in Anger"));
        assert!(rendered.contains("Starter Pack"));
        assert!(rendered.contains("free"));
    }

    #[test]
    fn test_empty_page_text() {
        let empty = SearchPage::empty();
        let rendered = render_page_text(&empty, &QueryState::default(), false);
        assert!(rendered.contains("No items matched."));

        let quiet = render_page_text(&empty, &QueryState::default(), true);
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_json_uses_wire_field_names() {
        let rendered = render_page_json(&page()).unwrap();
        assert!(rendered.contains("\"priceCents\""));
        assert!(rendered.contains("\"total\""));
        assert!(!rendered.contains("price_cents"));
    }

    #[test]
    fn test_csv_header_and_rows() {
        let rendered = render_page_csv(&page()).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,title,kind"));
        assert!(lines[1].contains("rust;systems"));
        assert!(lines[2].contains("bundle"));
    }

    #[test]
    fn test_render_popular_quiet() {
        let popular = vec![PopularQuery {
            query: "rust".to_string(),
            count: 42,
        }];
        assert_eq!(render_popular(&popular, true), "rust\t42\n");
    }
}
