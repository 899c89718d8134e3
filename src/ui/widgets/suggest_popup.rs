//! Suggestion popup anchored under the search bar.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct SuggestPopup<'a> {
    suggestions: &'a [String],
    theme: &'a Theme,
}

impl<'a> SuggestPopup<'a> {
    #[must_use]
    pub const fn new(suggestions: &'a [String], theme: &'a Theme) -> Self {
        Self { suggestions, theme }
    }
}

impl Widget for SuggestPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" tab completes ")
            .border_style(self.theme.dim_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .suggestions
            .iter()
            .take(usize::from(inner.height))
            .enumerate()
            .map(|(i, suggestion)| {
                if i == 0 {
                    Line::from(vec![
                        Span::styled("▶ ", self.theme.accent_style()),
                        Span::raw(suggestion.clone()),
                    ])
                } else {
                    Line::styled(format!("  {suggestion}"), self.theme.dim_style())
                }
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
