//! Status bar: transient messages on the left, page position on the right.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::coordinator::FetchState;
use crate::output::total_pages;
use crate::query::QueryState;
use crate::ui::state::{MessageLevel, StatusMessage};
use crate::ui::theme::Theme;

pub struct StatusBar<'a> {
    messages: &'a [&'a StatusMessage],
    fetch: &'a FetchState,
    query: &'a QueryState,
    /// Dim fallback shown while no message is active
    idle: &'a str,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    #[must_use]
    pub const fn new(
        messages: &'a [&'a StatusMessage],
        fetch: &'a FetchState,
        query: &'a QueryState,
        idle: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            messages,
            fetch,
            query,
            idle,
            theme,
        }
    }

    const fn icon(level: MessageLevel) -> &'static str {
        match level {
            MessageLevel::Success => "✓",
            MessageLevel::Error => "✗",
            MessageLevel::Warning => "⚠",
            MessageLevel::Info => "ℹ",
        }
    }

    fn left_span(&self) -> Span<'_> {
        match self.messages.last() {
            Some(message) => Span::styled(
                format!("{} {}", Self::icon(message.level), message.text),
                self.theme.message_style(message.level),
            ),
            None => Span::styled(self.idle, self.theme.dim_style()),
        }
    }

    fn right_text(&self) -> String {
        match self.fetch {
            FetchState::Ready(page) => {
                let pages = total_pages(page.total, self.query.page_size());
                format!("page {}/{} · {} results", self.query.page(), pages, page.total)
            }
            FetchState::Loading => "fetching".to_string(),
            FetchState::Error(_) => String::new(),
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let left = self.left_span();
        let right = self.right_text();

        let width = inner.width as usize;
        let used = left.content.chars().count() + right.chars().count() + 2;
        let gap = width.saturating_sub(used).max(1);

        let line = Line::from(vec![
            Span::raw(" "),
            left,
            Span::raw(" ".repeat(gap)),
            Span::styled(right, self.theme.dim_style()),
        ]);

        Paragraph::new(line).render(inner, buf);
    }
}
