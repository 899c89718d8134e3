//! Terminal lifecycle and the browse tick loop
//!
//! Each tick pumps the coordinator, redraws, then handles at most one
//! event with a 50ms poll. The terminal is always restored on the way
//! out, error or not.

use std::collections::BTreeSet;
use std::io::Stdout;
use std::time::{Duration, Instant};

use arboard::Clipboard;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::{Frame, Terminal};

use crate::config::ShelfrConfig;
use crate::coordinator::{FetchState, QueryCoordinator};
use crate::history::SearchHistory;
use crate::keybinds::help::generate_overlay_binds;
use crate::keybinds::{ActionRegistry, BrowseAction, KeybindConfig};
use crate::output::total_pages;
use crate::query::{PriceRange, QueryState};
use crate::remote::CatalogBackend;
use crate::share;

use super::events::{self, EventResult, KeybindMap};
use super::state::{BrowserState, MessageLevel, Mode, PickerKind, PickerState};
use super::theme::Theme;
use super::widgets::{
    FilterBar, HelpBar, HelpOverlay, PickerOverlay, PriceInputOverlay, ResultList, SearchBar,
    StatusBar, SuggestPopup, PICKER_LIST_ROWS,
};
use super::Result;

const TICK: Duration = Duration::from_millis(50);
const SUGGEST_ROWS: usize = 8;

/// Picker row that clears the category filter.
const CATEGORY_NONE: &str = "(none)";

/// Launch the interactive browser and block until the user quits.
///
/// The first fetch for `initial` is issued before the terminal goes
/// into raw mode, so results are often ready by the first draw.
///
/// # Errors
///
/// Returns [`super::UiError`] if the terminal cannot be prepared or the
/// fetch worker cannot be started. The terminal is restored either way.
pub fn run(
    config: &ShelfrConfig,
    backend: Box<dyn CatalogBackend>,
    initial: QueryState,
) -> Result<()> {
    let keybinds = KeybindConfig::load_or_default().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load keybinds, using defaults: {e}");
        KeybindConfig::default()
    });

    let history_path = SearchHistory::default_path().unwrap_or_default();
    let history = SearchHistory::load(history_path, config.history_limit);

    let mut coordinator = QueryCoordinator::new(backend, config.coordinator_options())?;
    coordinator.submit(&initial);
    coordinator.request_facets();
    coordinator.request_popular();

    let mut session = BrowserSession {
        state: BrowserState::new(initial, keybinds.display.show_hints),
        coordinator,
        history,
        binds: ActionRegistry::event_map(&keybinds),
        theme: Theme::dark(),
        bar_hints: bar_hints(&keybinds),
        overlay_binds: generate_overlay_binds(&keybinds),
    };

    let mut terminal = setup_terminal()?;
    let result = session.run_loop(&mut terminal);
    cleanup_terminal(&mut terminal);

    if let Err(e) = session.history.save() {
        eprintln!("Warning: failed to save search history: {e}");
    }

    result
}

struct BrowserSession {
    state: BrowserState,
    coordinator: QueryCoordinator,
    history: SearchHistory,
    binds: KeybindMap,
    theme: Theme,
    bar_hints: Vec<(String, String)>,
    overlay_binds: Vec<(String, String)>,
}

impl BrowserSession {
    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            let now = Instant::now();
            if self.coordinator.pump(now) {
                self.sync_results();
            }
            if let Some(warning) = self.coordinator.take_lookup_error() {
                self.state.add_message(MessageLevel::Warning, warning);
            }
            self.refresh_suggestions();

            terminal.draw(|f| self.render(f))?;

            match events::poll_and_handle(&mut self.state, &self.binds, TICK)? {
                EventResult::Continue | EventResult::Ignored => {}
                EventResult::InputChanged => self.on_input_changed(),
                EventResult::Submit => self.submit_input(),
                EventResult::AcceptSuggestion => self.accept_suggestion(),
                EventResult::Action(action) => self.dispatch(action),
                EventResult::PickerConfirmed => self.apply_picker(),
                EventResult::PriceSubmitted => self.apply_price(),
                EventResult::Exit => self.state.should_exit = true,
            }

            if let Some(picker) = self.state.picker.as_mut() {
                picker.adjust_scroll(PICKER_LIST_ROWS);
            }

            if self.state.should_exit {
                return Ok(());
            }
            self.state.cleanup_messages();
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        let mut constraints = vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(3),
        ];
        if self.state.show_hints {
            constraints.push(Constraint::Length(1));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.state
            .set_visible_height(usize::from(chunks[2].height.saturating_sub(2)));

        let chips = self.state.query.filter_chips();
        let messages = self.state.active_messages();

        f.render_widget(
            SearchBar::new(&self.state.input, self.state.input_cursor, &self.theme),
            chunks[0],
        );
        f.render_widget(FilterBar::new(&chips, &self.theme), chunks[1]);
        f.render_widget(
            ResultList::new(
                self.coordinator.fetch_state(),
                &self.state.query,
                self.state.cursor,
                self.state.scroll_offset,
                &self.theme,
            ),
            chunks[2],
        );
        f.render_widget(
            StatusBar::new(
                &messages,
                self.coordinator.fetch_state(),
                &self.state.query,
                self.coordinator.backend_label(),
                &self.theme,
            ),
            chunks[3],
        );
        if self.state.show_hints {
            f.render_widget(HelpBar::new(&self.bar_hints, &self.theme), chunks[4]);
        }

        self.render_overlays(f, area);
    }

    fn render_overlays(&self, f: &mut Frame, area: Rect) {
        match self.state.mode {
            Mode::Normal => {
                let suggestions = self.state.visible_suggestions();
                if !suggestions.is_empty() {
                    let rect = suggest_rect(area, suggestions.len());
                    if rect.width > 2 && rect.height > 2 {
                        f.render_widget(SuggestPopup::new(suggestions, &self.theme), rect);
                    }
                }
            }
            Mode::Help => {
                f.render_widget(HelpOverlay::new(&self.overlay_binds, &self.theme), area);
            }
            Mode::Picker => {
                if let Some(picker) = &self.state.picker {
                    f.render_widget(PickerOverlay::new(picker, &self.theme), area);
                }
            }
            Mode::PriceInput => {
                if let Some(input) = &self.state.price_input {
                    f.render_widget(PriceInputOverlay::new(input, &self.theme), area);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Fetch plumbing
    // ------------------------------------------------------------------

    fn sync_results(&mut self) {
        let count = match self.coordinator.fetch_state() {
            FetchState::Ready(page) => page.items.len(),
            FetchState::Loading | FetchState::Error(_) => 0,
        };
        self.state.set_result_count(count);
    }

    fn on_input_changed(&mut self) {
        let text = self.state.input.clone();
        self.state.query.set_text(text);
        self.coordinator.note_edit(&self.state.query, Instant::now());

        self.state.arm_suggestions();
        if !self.state.input.trim().is_empty() {
            self.coordinator.request_suggestions(&self.state.input);
        }
    }

    /// Feed the popup from the cache (or history while the input is
    /// empty). Runs every tick so background lookups land without
    /// another keystroke.
    fn refresh_suggestions(&mut self) {
        if !self.state.suggest_armed || self.state.mode != Mode::Normal {
            return;
        }
        if self.state.input.trim().is_empty() {
            let recent: Vec<String> = self
                .history
                .recent(SUGGEST_ROWS)
                .into_iter()
                .map(str::to_string)
                .collect();
            self.state.set_suggestions(recent);
        } else if let Some(hit) = self
            .coordinator
            .suggestion_cache()
            .suggestions(&self.state.input)
        {
            self.state.set_suggestions(hit.as_ref().clone());
        }
    }

    fn submit_input(&mut self) {
        let text = self.state.input.clone();
        self.state.query.set_text(text);
        self.coordinator.submit(&self.state.query);
        self.state.hide_suggestions();
        self.history.record(&self.state.input);
    }

    fn accept_suggestion(&mut self) {
        if let Some(pick) = self.state.first_suggestion().map(str::to_string) {
            self.state.set_input(pick);
            self.submit_input();
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    fn dispatch(&mut self, action: BrowseAction) {
        match action {
            BrowseAction::PickCategory => self.open_category_picker(),
            BrowseAction::PickTags => self.open_tags_picker(),
            BrowseAction::EditPrice => {
                let initial = self
                    .state
                    .query
                    .price_range()
                    .map(|range| {
                        format!(
                            "{}..{}",
                            dollars(range.min_cents()),
                            dollars(range.max_cents())
                        )
                    })
                    .unwrap_or_default();
                self.state.open_price_input(&initial);
            }
            BrowseAction::ToggleFree => {
                self.state.query.cycle_free();
                self.coordinator.submit(&self.state.query);
            }
            BrowseAction::ClearFilters => {
                if self.state.query.clear_filters() {
                    self.coordinator.submit(&self.state.query);
                    self.state.add_message(MessageLevel::Info, "Filters cleared");
                }
            }
            BrowseAction::CycleSort => {
                self.state.query.cycle_sort();
                self.coordinator.submit(&self.state.query);
            }
            BrowseAction::FlipOrder => {
                self.state.query.flip_order();
                self.coordinator.submit(&self.state.query);
            }
            BrowseAction::NextPage => self.next_page(),
            BrowseAction::PrevPage => self.prev_page(),
            BrowseAction::OpenItem => self.open_item(),
            BrowseAction::CopyLink => self.copy_link(),
            BrowseAction::Retry => {
                if self.coordinator.retry().is_some() {
                    self.state.add_message(MessageLevel::Info, "Retrying...");
                }
            }
            BrowseAction::ShowPopular => self.open_popular_picker(),
            BrowseAction::ShowHelp => {
                self.state.hide_suggestions();
                self.state.mode = Mode::Help;
            }
        }
    }

    fn next_page(&mut self) {
        let total = match self.coordinator.fetch_state() {
            FetchState::Ready(page) => Some(page.total),
            FetchState::Loading | FetchState::Error(_) => None,
        };
        let Some(total) = total else { return };

        let pages = total_pages(total, self.state.query.page_size());
        if u64::from(self.state.query.page()) < pages {
            let next = self.state.query.page() + 1;
            self.state.query.set_page(next);
            self.coordinator.submit(&self.state.query);
        } else {
            self.state
                .add_message(MessageLevel::Info, "Already on the last page");
        }
    }

    fn prev_page(&mut self) {
        if self.state.query.page() > 1 {
            let prev = self.state.query.page() - 1;
            self.state.query.set_page(prev);
            self.coordinator.submit(&self.state.query);
        } else {
            self.state
                .add_message(MessageLevel::Info, "Already on the first page");
        }
    }

    fn open_item(&mut self) {
        let target = match self.coordinator.fetch_state() {
            FetchState::Ready(page) => page
                .items
                .get(self.state.cursor)
                .map(|item| (item.title.clone(), item.link.clone())),
            FetchState::Loading | FetchState::Error(_) => None,
        };

        match target {
            Some((title, Some(link))) => match open::that(&link) {
                Ok(()) => self
                    .state
                    .add_message(MessageLevel::Success, format!("Opened {title}")),
                Err(e) => self
                    .state
                    .add_message(MessageLevel::Error, format!("Failed to open browser: {e}")),
            },
            Some((title, None)) => {
                self.state
                    .add_message(MessageLevel::Info, format!("{title} has no web page"));
            }
            None => {}
        }
    }

    fn copy_link(&mut self) {
        match share::permalink(self.coordinator.backend_label(), &self.state.query) {
            Ok(link) => match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(link)) {
                Ok(()) => self
                    .state
                    .add_message(MessageLevel::Success, "Link copied to clipboard"),
                Err(e) => self
                    .state
                    .add_message(MessageLevel::Error, format!("Clipboard failed: {e}")),
            },
            Err(e) => self.state.add_message(MessageLevel::Error, e.to_string()),
        }
    }

    // ------------------------------------------------------------------
    // Pickers and the price modal
    // ------------------------------------------------------------------

    fn open_category_picker(&mut self) {
        match self.coordinator.request_facets() {
            Some(facets) => {
                if facets.categories.is_empty() {
                    self.state
                        .add_message(MessageLevel::Info, "No categories to pick from");
                    return;
                }
                let mut items = vec![CATEGORY_NONE.to_string()];
                items.extend(facets.categories.iter().cloned());
                self.state.open_picker(PickerState::new(
                    PickerKind::Category,
                    items,
                    BTreeSet::new(),
                ));
            }
            None => self
                .state
                .add_message(MessageLevel::Info, "Loading categories..."),
        }
    }

    fn open_tags_picker(&mut self) {
        match self.coordinator.request_facets() {
            Some(facets) => {
                if facets.tags.is_empty() {
                    self.state
                        .add_message(MessageLevel::Info, "No tags to pick from");
                    return;
                }
                let selected = self.state.query.tags().clone();
                let picker = PickerState::new(PickerKind::Tags, facets.tags.clone(), selected);
                self.state.open_picker(picker);
            }
            None => self.state.add_message(MessageLevel::Info, "Loading tags..."),
        }
    }

    fn open_popular_picker(&mut self) {
        match self.coordinator.request_popular() {
            Some(popular) if popular.is_empty() => {
                self.state
                    .add_message(MessageLevel::Info, "No popular searches yet");
            }
            Some(popular) => {
                let items: Vec<String> = popular.iter().map(|p| p.query.clone()).collect();
                let picker = PickerState::new(PickerKind::Popular, items, BTreeSet::new());
                self.state.open_picker(picker);
            }
            None => self
                .state
                .add_message(MessageLevel::Info, "Loading popular searches..."),
        }
    }

    fn apply_picker(&mut self) {
        let Some(picker) = self.state.picker.take() else {
            self.state.mode = Mode::Normal;
            return;
        };
        self.state.mode = Mode::Normal;

        match picker.kind {
            PickerKind::Category => {
                let Some(choice) = picker.current() else {
                    return;
                };
                let category = if choice == CATEGORY_NONE {
                    None
                } else {
                    Some(choice.to_string())
                };
                if self.state.query.set_category(category) {
                    self.coordinator.submit(&self.state.query);
                }
            }
            PickerKind::Tags => {
                if self.state.query.set_tags(picker.selected) {
                    self.coordinator.submit(&self.state.query);
                }
            }
            PickerKind::Popular => {
                let Some(choice) = picker.current() else {
                    return;
                };
                self.state.set_input(choice);
                self.submit_input();
            }
        }
    }

    fn apply_price(&mut self) {
        let Some(input) = self.state.price_input.as_ref() else {
            self.state.mode = Mode::Normal;
            return;
        };
        let buffer = input.buffer.trim().to_string();

        if buffer.is_empty() {
            self.state.close_price_input();
            if self.state.query.set_price_range(None) {
                self.coordinator.submit(&self.state.query);
            }
            return;
        }

        match buffer.parse::<PriceRange>() {
            Ok(range) => {
                self.state.close_price_input();
                if self.state.query.set_price_range(Some(range)) {
                    self.coordinator.submit(&self.state.query);
                }
            }
            // leave the modal open so the buffer can be fixed
            Err(e) => self.state.add_message(MessageLevel::Error, e.to_string()),
        }
    }
}

// ----------------------------------------------------------------------
// Terminal plumbing
// ----------------------------------------------------------------------

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    if let Err(e) = restore_terminal(terminal) {
        eprintln!("Warning: terminal cleanup failed: {e}");
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Popup anchored under the search bar, clamped to the screen.
fn suggest_rect(area: Rect, count: usize) -> Rect {
    let height = count.min(SUGGEST_ROWS) as u16 + 2;
    let width = 42.min(area.width.saturating_sub(4));
    let raw = Rect {
        x: area.x + 2,
        y: area.y + 3,
        width,
        height,
    };
    raw.intersection(area)
}

/// Short hints for the bottom bar; the full list lives in the help overlay.
fn bar_hints(config: &KeybindConfig) -> Vec<(String, String)> {
    let picks: &[(BrowseAction, &str)] = &[
        (BrowseAction::PickCategory, "category"),
        (BrowseAction::PickTags, "tags"),
        (BrowseAction::EditPrice, "price"),
        (BrowseAction::CycleSort, "sort"),
        (BrowseAction::NextPage, "next"),
        (BrowseAction::ShowHelp, "help"),
    ];

    let mut hints: Vec<(String, String)> = picks
        .iter()
        .filter_map(|(action, label)| {
            ActionRegistry::get(*action)
                .map(|meta| (meta.primary_key_human(config), (*label).to_string()))
        })
        .collect();
    hints.push(("esc".to_string(), "quit".to_string()));
    hints
}

/// Cents to plain dollars, the form the price modal edits.
fn dollars(cents: u32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
