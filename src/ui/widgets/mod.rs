//! Ratatui widgets for the browser
//!
//! One widget per screen region, plus the overlays. Widgets borrow the
//! state they render and never mutate it; all transitions happen in the
//! event handlers.

mod filter_bar;
mod help_bar;
mod help_overlay;
mod picker;
mod price_input;
mod results;
mod search_bar;
mod status_bar;
mod suggest_popup;

pub use filter_bar::FilterBar;
pub use help_bar::HelpBar;
pub use help_overlay::HelpOverlay;
pub use picker::{PickerOverlay, PICKER_LIST_ROWS};
pub use price_input::PriceInputOverlay;
pub use results::ResultList;
pub use search_bar::SearchBar;
pub use status_bar::StatusBar;
pub use suggest_popup::SuggestPopup;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Centered rect taking the given percentage of the area.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centered rect with a fixed size, clamped to the area.
fn fixed_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
