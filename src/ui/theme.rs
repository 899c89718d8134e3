//! Colors and shared styles for the browser.

use ratatui::style::{Color, Modifier, Style};

use super::state::MessageLevel;

/// Color scheme for the browser widgets.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Borders of focused regions, cursors and key hints
    pub accent: Color,
    /// Regular text
    pub text: Color,
    /// Secondary text: kinds, counts, placeholder states
    pub dim: Color,
    /// Background of the highlighted result row
    pub highlight_bg: Color,
    /// Prices
    pub price: Color,
    /// The "free" price label
    pub free: Color,
    /// Filter chips
    pub chip: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Theme {
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(45, 50, 60),
            price: Color::Yellow,
            free: Color::Green,
            chip: Color::Magenta,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
        }
    }

    #[must_use]
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    #[must_use]
    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    #[must_use]
    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a price column entry. Free items get their own color.
    #[must_use]
    pub fn price_style(&self, is_free: bool) -> Style {
        if is_free {
            Style::default().fg(self.free)
        } else {
            Style::default().fg(self.price)
        }
    }

    #[must_use]
    pub fn chip_style(&self) -> Style {
        Style::default().fg(self.chip)
    }

    #[must_use]
    pub fn message_style(&self, level: MessageLevel) -> Style {
        let color = match level {
            MessageLevel::Success => self.success,
            MessageLevel::Error => self.error,
            MessageLevel::Warning => self.warning,
            MessageLevel::Info => self.info,
        };
        Style::default().fg(color)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
