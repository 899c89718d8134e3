//! Interactive catalog browser
//!
//! Full-screen terminal session for searching the storefront: type to
//! search (debounced), page through results, stack filters from pickers
//! and copy a permalink to the current view. All fetching goes through
//! [`crate::coordinator::QueryCoordinator`], so the input never blocks
//! on the network.
//!
//! # Screen layout
//!
//! ```text
//! ┌─ Search ─────────────────────────────────────┐
//! │ > dungeon maps▏                              │  search bar
//! ├─ Filters ────────────────────────────────────┤
//! │ category:maps  #fantasy  price:$5.00..$20.00 │  filter chips
//! ├─ Results (24/172) ───────────────────────────┤
//! │ > Cartographer's Atlas          maps  $12.00 │
//! │   Dungeon Tiles Bundle        bundle  $30.00 │  result list
//! │   ...                                        │
//! ├──────────────────────────────────────────────┤
//! │ ✓ Link copied              page 2/8 · 172 hit│  status bar
//! ├──────────────────────────────────────────────┤
//! │ ctrl-g:category ctrl-t:tags f1:help          │  help bar
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Overlays (help, pickers, price input) draw on top of this layout and
//! grab all key events while open.
//!
//! # Module organization
//!
//! - [`browser`] - terminal lifecycle and the tick loop
//! - [`state`] - session state and its transitions, no terminal I/O
//! - [`events`] - key and mouse handling per mode
//! - [`theme`] - colors and shared styles
//! - [`widgets`] - ratatui widgets for each screen region

mod browser;
mod events;
mod state;
mod theme;
mod widgets;

use thiserror::Error;

pub use browser::run;

/// Errors from the interactive browser.
#[derive(Error, Debug)]
pub enum UiError {
    /// Terminal setup, drawing or event polling failed
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// The fetch worker could not be started
    #[error(transparent)]
    Coordinator(#[from] crate::coordinator::CoordinatorError),
}

/// Result type for UI operations.
pub type Result<T> = std::result::Result<T, UiError>;
