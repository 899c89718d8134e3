//! Centered picker overlay for categories, tags and popular searches.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::ui::state::PickerState;
use crate::ui::theme::Theme;

use super::fixed_rect;

/// Rows the picker list shows at once. The event loop uses the same
/// number to keep the highlighted row scrolled into view.
pub const PICKER_LIST_ROWS: usize = 11;

const PICKER_WIDTH: u16 = 46;

pub struct PickerOverlay<'a> {
    picker: &'a PickerState,
    theme: &'a Theme,
}

impl<'a> PickerOverlay<'a> {
    #[must_use]
    pub const fn new(picker: &'a PickerState, theme: &'a Theme) -> Self {
        Self { picker, theme }
    }

    fn row(&self, index: usize, item: &str) -> Line<'static> {
        let marker = if index == self.picker.cursor { "> " } else { "  " };
        let mut spans = vec![Span::styled(
            marker.to_string(),
            self.theme.accent_style(),
        )];

        if self.picker.kind.is_multi() {
            let mark = if self.picker.selected.contains(item) {
                "[x] "
            } else {
                "[ ] "
            };
            spans.push(Span::styled(mark.to_string(), self.theme.chip_style()));
        }

        spans.push(Span::raw(item.to_string()));
        let line = Line::from(spans);
        if index == self.picker.cursor {
            line.style(self.theme.selected_style())
        } else {
            line
        }
    }
}

impl Widget for PickerOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // input line + list rows + hint line, inside the borders
        let height = (PICKER_LIST_ROWS as u16) + 4;
        let popup = fixed_rect(PICKER_WIDTH, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.picker.kind.title()))
            .border_style(self.theme.accent_style());
        let inner = block.inner(popup);
        block.render(popup, buf);

        if inner.height == 0 {
            return;
        }

        let mut lines = vec![Line::from(vec![
            Span::styled("> ", self.theme.accent_style()),
            Span::raw(self.picker.query.clone()),
            Span::styled("▏", self.theme.accent_style()),
        ])];

        if self.picker.filtered.is_empty() {
            lines.push(Line::styled(
                "  nothing matches",
                self.theme.dim_style(),
            ));
        } else {
            let visible = self
                .picker
                .filtered
                .iter()
                .enumerate()
                .skip(self.picker.scroll_offset)
                .take(PICKER_LIST_ROWS);
            for (index, item) in visible {
                lines.push(self.row(index, item));
            }
        }

        // pad so the hint stays on the bottom row
        while lines.len() < usize::from(inner.height) - 1 {
            lines.push(Line::raw(""));
        }
        let hint = if self.picker.kind.is_multi() {
            "tab:mark  enter:apply  esc:cancel"
        } else {
            "enter:pick  esc:cancel"
        };
        lines.push(Line::styled(format!(" {hint}"), self.theme.dim_style()));

        Paragraph::new(lines).render(inner, buf);
    }
}
