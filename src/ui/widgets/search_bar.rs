//! Search input bar with a visible cursor.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct SearchBar<'a> {
    input: &'a str,
    /// Byte index of the cursor in `input`
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    #[must_use]
    pub const fn new(input: &'a str, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            input,
            cursor,
            theme,
        }
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(self.theme.accent_style());

        // cursor lands on a char boundary, input editing guarantees it
        let (before, after) = self.input.split_at(self.cursor.min(self.input.len()));
        let line = Line::from(vec![
            Span::styled("> ", self.theme.accent_style()),
            Span::raw(before),
            Span::styled("▏", self.theme.accent_style()),
            Span::raw(after),
        ]);

        Paragraph::new(line).block(block).render(area, buf);
    }
}
