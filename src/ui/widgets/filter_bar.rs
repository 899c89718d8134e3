//! Single-line bar showing the active filter chips.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct FilterBar<'a> {
    chips: &'a [String],
    theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    #[must_use]
    pub const fn new(chips: &'a [String], theme: &'a Theme) -> Self {
        Self { chips, theme }
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = if self.chips.is_empty() {
            Line::from(Span::styled(" no filters", self.theme.dim_style()))
        } else {
            let mut spans = vec![Span::raw(" ")];
            for (i, chip) in self.chips.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw("  "));
                }
                spans.push(Span::styled(format!("[{chip}]"), self.theme.chip_style()));
            }
            Line::from(spans)
        };

        Paragraph::new(line).render(area, buf);
    }
}
