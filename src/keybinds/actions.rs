//! Action types for browse mode keybinds.

/// Actions that can be triggered by keybinds in browse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowseAction {
    /// Pick a category filter - Ctrl+G
    PickCategory,
    /// Toggle tag filters - Ctrl+T
    PickTags,
    /// Edit the price range filter - Ctrl+E
    EditPrice,
    /// Cycle the free/paid filter - Ctrl+F
    ToggleFree,
    /// Drop all filters, keep the search text - Ctrl+X
    ClearFilters,

    /// Cycle the sort field - Ctrl+S
    CycleSort,
    /// Flip the sort direction - Ctrl+O
    FlipOrder,

    /// Go to the next page - Ctrl+N
    NextPage,
    /// Go to the previous page - Ctrl+B
    PrevPage,
    /// Open the highlighted item in the browser - Ctrl+L
    OpenItem,
    /// Copy a permalink for the current query - Ctrl+Y
    CopyLink,

    /// Re-issue the last request after an error - Ctrl+R
    Retry,
    /// Show popular searches - Ctrl+P
    ShowPopular,
    /// Show help screen - F1
    ShowHelp,
}

impl BrowseAction {
    /// Returns whether this action needs a highlighted result to work.
    #[must_use]
    pub const fn needs_highlight(&self) -> bool {
        matches!(self, Self::OpenItem)
    }

    /// Returns a human-readable description of the action.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::PickCategory => "Pick a category filter",
            Self::PickTags => "Toggle tag filters",
            Self::EditPrice => "Set a price range filter",
            Self::ToggleFree => "Cycle free / paid / all",
            Self::ClearFilters => "Clear filters, keep search text",
            Self::CycleSort => "Cycle sort field",
            Self::FlipOrder => "Flip sort direction",
            Self::NextPage => "Next page of results",
            Self::PrevPage => "Previous page of results",
            Self::OpenItem => "Open item in web browser",
            Self::CopyLink => "Copy permalink to clipboard",
            Self::Retry => "Retry the failed request",
            Self::ShowPopular => "Show popular searches",
            Self::ShowHelp => "Show help",
        }
    }
}
