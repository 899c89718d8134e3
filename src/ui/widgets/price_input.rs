//! Small centered modal for editing the price range filter.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::ui::state::PriceInputState;
use crate::ui::theme::Theme;

use super::fixed_rect;

pub struct PriceInputOverlay<'a> {
    input: &'a PriceInputState,
    theme: &'a Theme,
}

impl<'a> PriceInputOverlay<'a> {
    #[must_use]
    pub const fn new(input: &'a PriceInputState, theme: &'a Theme) -> Self {
        Self { input, theme }
    }
}

impl Widget for PriceInputOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = fixed_rect(44, 4, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Price range ")
            .border_style(self.theme.accent_style());
        let inner = block.inner(popup);
        block.render(popup, buf);

        let cursor = self.input.cursor.min(self.input.buffer.len());
        let (before, after) = self.input.buffer.split_at(cursor);
        let lines = vec![
            Line::from(vec![
                Span::styled("> ", self.theme.accent_style()),
                Span::raw(before.to_string()),
                Span::styled("▏", self.theme.accent_style()),
                Span::raw(after.to_string()),
            ]),
            Line::styled(
                " dollars as min..max, empty clears the filter",
                self.theme.dim_style(),
            ),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
