//! Full-screen help overlay listing every keybind.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::ui::theme::Theme;

use super::centered_rect;

/// Hardwired keys that are not part of the configurable action set.
const EDITING_KEYS: &[(&str, &str)] = &[
    ("type", "edit the search text"),
    ("Enter", "search now"),
    ("Ctrl+U", "clear the search text"),
    ("Ctrl+W", "delete the last word"),
    ("←/→", "move the text cursor"),
    ("↑/↓", "move the result cursor"),
    ("PgUp/PgDn", "jump a window of rows"),
    ("Home/End", "first / last row"),
    ("Esc", "dismiss, then quit"),
];

pub struct HelpOverlay<'a> {
    /// (key, description) pairs for the configurable actions
    binds: &'a [(String, String)],
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    #[must_use]
    pub const fn new(binds: &'a [(String, String)], theme: &'a Theme) -> Self {
        Self { binds, theme }
    }

    fn help_line(&self, key: &str, description: &str) -> Line<'static> {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{key:<14}"), self.theme.accent_style()),
            Span::raw(description.to_string()),
        ])
    }

    fn section(&self, title: &str) -> Line<'static> {
        Line::from(Span::styled(
            format!(" {title}"),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ))
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(60, 80, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(self.theme.accent_style());

        let mut lines = vec![self.section("Editing and navigation")];
        for (key, description) in EDITING_KEYS {
            lines.push(self.help_line(key, description));
        }

        lines.push(Line::raw(""));
        lines.push(self.section("Actions"));
        for (key, description) in self.binds {
            lines.push(self.help_line(key, description));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            " Press any key to close",
            self.theme.dim_style(),
        )));

        Paragraph::new(lines).block(block).render(popup, buf);
    }
}
