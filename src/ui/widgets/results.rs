//! Result list, the main content region
//!
//! Renders one of four states: loading placeholder, error with a retry
//! hint, empty page with a filter hint, or the rows of the current page.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::catalog::{format_price, CatalogItem, ItemKind};
use crate::coordinator::FetchState;
use crate::query::QueryState;
use crate::ui::theme::Theme;

const KIND_WIDTH: usize = 7;
const PRICE_WIDTH: usize = 10;

pub struct ResultList<'a> {
    fetch: &'a FetchState,
    query: &'a QueryState,
    cursor: usize,
    scroll_offset: usize,
    theme: &'a Theme,
}

impl<'a> ResultList<'a> {
    #[must_use]
    pub const fn new(
        fetch: &'a FetchState,
        query: &'a QueryState,
        cursor: usize,
        scroll_offset: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            fetch,
            query,
            cursor,
            scroll_offset,
            theme,
        }
    }

    fn title(&self) -> String {
        match self.fetch {
            FetchState::Ready(page) => {
                format!(" Results ({}/{}) ", page.items.len(), page.total)
            }
            FetchState::Loading | FetchState::Error(_) => " Results ".to_string(),
        }
    }

    fn placeholder(&self, inner: Rect, buf: &mut Buffer, lines: Vec<Line>) {
        let top_pad = usize::from(inner.height / 3);
        let mut padded = vec![Line::raw(""); top_pad];
        padded.extend(lines);
        Paragraph::new(padded)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }

    fn item_line(&self, item: &CatalogItem, selected: bool, width: usize) -> Line<'static> {
        let marker = if selected { "> " } else { "  " };
        let name_width = width.saturating_sub(2 + KIND_WIDTH + PRICE_WIDTH + 2);

        let mut title: String = item.title.chars().take(name_width).collect();
        let pad = name_width.saturating_sub(title.chars().count());
        title.push_str(&" ".repeat(pad));

        let kind_style = match item.kind {
            ItemKind::Bundle => self.theme.accent_style(),
            ItemKind::Book => self.theme.dim_style(),
        };
        let row_style = if selected {
            self.theme.selected_style()
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(marker.to_string(), self.theme.accent_style()),
            Span::raw(title),
            Span::styled(
                format!(" {:<width$}", item.kind.label(), width = KIND_WIDTH),
                kind_style,
            ),
            Span::styled(
                format!(
                    "{:>width$}",
                    format_price(item.price_cents),
                    width = PRICE_WIDTH
                ),
                self.theme.price_style(item.price_cents == 0),
            ),
        ])
        .style(row_style)
    }
}

impl Widget for ResultList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        match self.fetch {
            FetchState::Loading => {
                self.placeholder(
                    inner,
                    buf,
                    vec![Line::styled("searching...", self.theme.dim_style())],
                );
            }
            FetchState::Error(message) => {
                self.placeholder(
                    inner,
                    buf,
                    vec![
                        Line::styled(
                            format!("✗ {message}"),
                            Style::default().fg(self.theme.error),
                        ),
                        Line::raw(""),
                        Line::styled("press ctrl-r to retry", self.theme.dim_style()),
                    ],
                );
            }
            FetchState::Ready(page) if page.items.is_empty() => {
                let hint = if self.query.has_active_filters() {
                    "press ctrl-x to clear filters"
                } else {
                    "try a different search"
                };
                self.placeholder(
                    inner,
                    buf,
                    vec![
                        Line::styled("No results.", self.theme.dim_style()),
                        Line::raw(""),
                        Line::styled(hint, self.theme.dim_style()),
                    ],
                );
            }
            FetchState::Ready(page) => {
                let height = inner.height as usize;
                let width = inner.width as usize;
                let lines: Vec<Line> = page
                    .items
                    .iter()
                    .enumerate()
                    .skip(self.scroll_offset)
                    .take(height)
                    .map(|(i, item)| self.item_line(item, i == self.cursor, width))
                    .collect();
                Paragraph::new(lines).render(inner, buf);
            }
        }
    }
}
