//! One-line keybind hint bar at the bottom of the screen.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct HelpBar<'a> {
    /// (key, short label) pairs, rendered in order
    hints: &'a [(String, String)],
    theme: &'a Theme,
}

impl<'a> HelpBar<'a> {
    #[must_use]
    pub const fn new(hints: &'a [(String, String)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, label)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(key.clone(), self.theme.accent_style()));
            spans.push(Span::styled(format!(":{label}"), self.theme.dim_style()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
