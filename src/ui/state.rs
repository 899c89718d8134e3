//! Browse session state
//!
//! Everything the tick loop tracks between draws: the query being edited,
//! the input line and its cursor, the result list cursor, transient status
//! messages and whichever overlay is open. Pure state and transitions with
//! no terminal I/O, so all of it is unit-testable.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher};

use crate::query::QueryState;

/// How long a status message stays visible.
const MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Interaction mode of the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Typing in the search bar, navigating results
    #[default]
    Normal,
    /// Help overlay open
    Help,
    /// List picker overlay open (category, tags or popular searches)
    Picker,
    /// Price range input overlay open
    PriceInput,
}

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub level: MessageLevel,
    pub text: String,
    pub created_at: Instant,
}

impl StatusMessage {
    fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            created_at: Instant::now(),
        }
    }

    /// Check whether this message has outlived its TTL.
    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Which list the picker overlay is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Category,
    Tags,
    Popular,
}

impl PickerKind {
    /// Title rendered in the overlay border.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Category => "Pick a category",
            Self::Tags => "Toggle tags",
            Self::Popular => "Popular searches",
        }
    }

    /// Whether the picker accumulates a selection set instead of
    /// closing on the first choice.
    #[must_use]
    pub const fn is_multi(self) -> bool {
        matches!(self, Self::Tags)
    }
}

/// State of the list picker overlay.
#[derive(Debug, Clone)]
pub struct PickerState {
    pub kind: PickerKind,
    /// Full list the picker was opened with
    items: Vec<String>,
    /// Filter text typed into the picker
    pub query: String,
    /// Cursor position in `query` (byte index)
    pub query_cursor: usize,
    /// Items matching the filter, best match first
    pub filtered: Vec<String>,
    /// Highlighted row in `filtered`
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Marked entries, used by multi-select pickers
    pub selected: BTreeSet<String>,
}

impl PickerState {
    #[must_use]
    pub fn new(kind: PickerKind, items: Vec<String>, selected: BTreeSet<String>) -> Self {
        let filtered = items.clone();
        Self {
            kind,
            items,
            query: String::new(),
            query_cursor: 0,
            filtered,
            cursor: 0,
            scroll_offset: 0,
            selected,
        }
    }

    /// Re-rank `filtered` against the current filter text.
    pub fn refilter(&mut self) {
        if self.query.is_empty() {
            self.filtered = self.items.clone();
        } else {
            let mut matcher = Matcher::new(Config::DEFAULT);
            let pattern = Pattern::parse(&self.query, CaseMatching::Ignore, Normalization::Smart);
            self.filtered = pattern
                .match_list(self.items.iter(), &mut matcher)
                .into_iter()
                .map(|(item, _)| item.clone())
                .collect();
        }
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    pub fn push(&mut self, c: char) {
        self.query.insert(self.query_cursor, c);
        self.query_cursor += c.len_utf8();
        self.refilter();
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.query[..self.query_cursor].char_indices().next_back() {
            self.query.remove(idx);
            self.query_cursor = idx;
            self.refilter();
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if !self.filtered.is_empty() && self.cursor + 1 < self.filtered.len() {
            self.cursor += 1;
        }
    }

    /// Keep the highlighted row inside the rendered window.
    pub fn adjust_scroll(&mut self, visible_height: usize) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if visible_height > 0 && self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor + 1 - visible_height;
        }
    }

    /// The highlighted entry, if the filtered list is non-empty.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.filtered.get(self.cursor).map(String::as_str)
    }

    /// Toggle the highlighted entry in the selection set.
    pub fn toggle_current(&mut self) {
        let Some(item) = self.current().map(str::to_string) else {
            return;
        };
        if !self.selected.remove(&item) {
            self.selected.insert(item);
        }
    }
}

/// State of the price range input overlay.
///
/// The buffer holds dollars in `min..max` form, same as the `--price`
/// flag. An empty buffer clears the filter on submit.
#[derive(Debug, Clone)]
pub struct PriceInputState {
    pub buffer: String,
    /// Cursor position in `buffer` (byte index)
    pub cursor: usize,
}

impl PriceInputState {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            buffer: initial.to_string(),
            cursor: initial.len(),
        }
    }

    pub fn push(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.buffer[..self.cursor].char_indices().next_back() {
            self.buffer.remove(idx);
            self.cursor = idx;
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some((idx, _)) = self.buffer[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }
}

/// Everything the browse loop tracks between ticks.
#[derive(Debug)]
pub struct BrowserState {
    /// Query the session is editing and submitting
    pub query: QueryState,
    /// Search text being typed
    pub input: String,
    /// Cursor position in `input` (byte index)
    pub input_cursor: usize,
    /// Current interaction mode
    pub mode: Mode,
    /// Highlighted row in the result list
    pub cursor: usize,
    /// First visible row of the result list
    pub scroll_offset: usize,
    /// Rows the list area showed on the last draw
    pub visible_height: usize,
    /// Rows on the current page, set after each fetch
    pub result_count: usize,
    /// Suggestions for the current input
    pub suggestions: Vec<String>,
    /// Whether the suggestion popup is visible
    pub show_suggestions: bool,
    /// Set by typing, cleared by dismissal; gates the popup refresh
    pub suggest_armed: bool,
    /// List picker overlay, when open
    pub picker: Option<PickerState>,
    /// Price input overlay, when open
    pub price_input: Option<PriceInputState>,
    /// Render the keybind hint bar
    pub show_hints: bool,
    /// Exit flag checked by the run loop
    pub should_exit: bool,
    messages: Vec<StatusMessage>,
    message_ttl: Duration,
}

impl BrowserState {
    #[must_use]
    pub fn new(initial: QueryState, show_hints: bool) -> Self {
        let input = initial.text().to_string();
        let input_cursor = input.len();
        Self {
            query: initial,
            input,
            input_cursor,
            mode: Mode::Normal,
            cursor: 0,
            scroll_offset: 0,
            visible_height: 0,
            result_count: 0,
            suggestions: Vec::new(),
            show_suggestions: false,
            suggest_armed: false,
            picker: None,
            price_input: None,
            show_hints,
            should_exit: false,
            messages: Vec::new(),
            message_ttl: MESSAGE_TTL,
        }
    }

    // ------------------------------------------------------------------
    // Search input editing
    // ------------------------------------------------------------------

    pub fn input_push(&mut self, c: char) {
        self.input.insert(self.input_cursor, c);
        self.input_cursor += c.len_utf8();
    }

    pub fn input_backspace(&mut self) {
        if let Some((idx, _)) = self.input[..self.input_cursor].char_indices().next_back() {
            self.input.remove(idx);
            self.input_cursor = idx;
        }
    }

    pub fn input_delete(&mut self) {
        if self.input_cursor < self.input.len() {
            self.input.remove(self.input_cursor);
        }
    }

    /// Delete the word before the cursor, including trailing spaces.
    pub fn input_delete_word(&mut self) {
        let trimmed = self.input[..self.input_cursor].trim_end();
        let start = trimmed.rfind(' ').map_or(0, |i| i + 1);
        self.input.replace_range(start..self.input_cursor, "");
        self.input_cursor = start;
    }

    pub fn input_clear(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    pub fn input_cursor_left(&mut self) {
        if let Some((idx, _)) = self.input[..self.input_cursor].char_indices().next_back() {
            self.input_cursor = idx;
        }
    }

    pub fn input_cursor_right(&mut self) {
        if let Some(c) = self.input[self.input_cursor..].chars().next() {
            self.input_cursor += c.len_utf8();
        }
    }

    /// Replace the input line, cursor at the end.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.input_cursor = self.input.len();
    }

    // ------------------------------------------------------------------
    // Result list navigation
    // ------------------------------------------------------------------

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.adjust_scroll();
    }

    pub fn move_down(&mut self) {
        if self.result_count > 0 && self.cursor + 1 < self.result_count {
            self.cursor += 1;
        }
        self.adjust_scroll();
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.visible_height.max(1));
        self.adjust_scroll();
    }

    pub fn page_down(&mut self) {
        if self.result_count > 0 {
            let jump = self.visible_height.max(1);
            self.cursor = (self.cursor + jump).min(self.result_count - 1);
        }
        self.adjust_scroll();
    }

    pub fn move_to_top(&mut self) {
        self.cursor = 0;
        self.adjust_scroll();
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor = self.result_count.saturating_sub(1);
        self.adjust_scroll();
    }

    /// Clamp the cursor after a new page of results lands.
    pub fn set_result_count(&mut self, count: usize) {
        self.result_count = count;
        if count == 0 {
            self.cursor = 0;
            self.scroll_offset = 0;
        } else if self.cursor >= count {
            self.cursor = count - 1;
        }
        self.adjust_scroll();
    }

    /// Record the list height from the last draw and re-clamp the scroll.
    pub fn set_visible_height(&mut self, height: usize) {
        self.visible_height = height;
        self.adjust_scroll();
    }

    fn adjust_scroll(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.visible_height > 0 && self.cursor >= self.scroll_offset + self.visible_height
        {
            self.scroll_offset = self.cursor + 1 - self.visible_height;
        }
    }

    // ------------------------------------------------------------------
    // Suggestions
    // ------------------------------------------------------------------

    /// Let typing bring the popup (back) up.
    pub fn arm_suggestions(&mut self) {
        self.suggest_armed = true;
    }

    /// Install new suggestions. The popup only shows in normal mode and
    /// after typing armed it; a dismissed popup stays dismissed.
    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.show_suggestions =
            !suggestions.is_empty() && self.suggest_armed && self.mode == Mode::Normal;
        self.suggestions = suggestions;
    }

    /// Dismiss the popup until the next edit.
    pub fn hide_suggestions(&mut self) {
        self.show_suggestions = false;
        self.suggest_armed = false;
    }

    /// Suggestions to render, empty while the popup is hidden.
    #[must_use]
    pub fn visible_suggestions(&self) -> &[String] {
        if self.show_suggestions {
            &self.suggestions
        } else {
            &[]
        }
    }

    /// The suggestion Tab would accept.
    #[must_use]
    pub fn first_suggestion(&self) -> Option<&str> {
        if self.show_suggestions {
            self.suggestions.first().map(String::as_str)
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------

    pub fn open_picker(&mut self, picker: PickerState) {
        self.hide_suggestions();
        self.picker = Some(picker);
        self.mode = Mode::Picker;
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
        self.mode = Mode::Normal;
    }

    pub fn open_price_input(&mut self, initial: &str) {
        self.hide_suggestions();
        self.price_input = Some(PriceInputState::new(initial));
        self.mode = Mode::PriceInput;
    }

    pub fn close_price_input(&mut self) {
        self.price_input = None;
        self.mode = Mode::Normal;
    }

    // ------------------------------------------------------------------
    // Status messages
    // ------------------------------------------------------------------

    pub fn add_message(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.messages.push(StatusMessage::new(level, text));
    }

    /// Messages still within their TTL, oldest first.
    #[must_use]
    pub fn active_messages(&self) -> Vec<&StatusMessage> {
        self.messages
            .iter()
            .filter(|m| !m.is_expired(self.message_ttl))
            .collect()
    }

    /// Drop expired messages.
    pub fn cleanup_messages(&mut self) {
        let ttl = self.message_ttl;
        self.messages.retain(|m| !m.is_expired(ttl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state() -> BrowserState {
        BrowserState::new(QueryState::default(), true)
    }

    #[test]
    fn test_new_state_mirrors_initial_query_text() {
        let mut query = QueryState::default();
        query.set_text("dungeon maps");
        let state = BrowserState::new(query, true);

        assert_eq!(state.input, "dungeon maps");
        assert_eq!(state.input_cursor, "dungeon maps".len());
        assert_eq!(state.mode, Mode::Normal);
        assert!(!state.should_exit);
    }

    #[test]
    fn test_input_push_at_cursor() {
        let mut state = make_state();
        state.input_push('a');
        state.input_push('c');
        state.input_cursor_left();
        state.input_push('b');

        assert_eq!(state.input, "abc");
        assert_eq!(state.input_cursor, 2);
    }

    #[test]
    fn test_input_editing_is_utf8_safe() {
        let mut state = make_state();
        state.input_push('é');
        state.input_push('ク');
        assert_eq!(state.input, "éク");
        assert_eq!(state.input_cursor, state.input.len());

        state.input_backspace();
        assert_eq!(state.input, "é");
        state.input_backspace();
        assert_eq!(state.input, "");
        assert_eq!(state.input_cursor, 0);
    }

    #[test]
    fn test_input_backspace_at_start_is_noop() {
        let mut state = make_state();
        state.set_input("abc");
        state.input_cursor = 0;
        state.input_backspace();

        assert_eq!(state.input, "abc");
        assert_eq!(state.input_cursor, 0);
    }

    #[test]
    fn test_input_delete_removes_char_at_cursor() {
        let mut state = make_state();
        state.set_input("abc");
        state.input_cursor = 1;
        state.input_delete();

        assert_eq!(state.input, "ac");
        assert_eq!(state.input_cursor, 1);

        // at the end there is nothing to delete
        state.input_cursor = state.input.len();
        state.input_delete();
        assert_eq!(state.input, "ac");
    }

    #[test]
    fn test_input_delete_word() {
        let mut state = make_state();
        state.set_input("fantasy maps  ");
        state.input_delete_word();
        assert_eq!(state.input, "fantasy ");
        assert_eq!(state.input_cursor, 8);

        state.input_delete_word();
        assert_eq!(state.input, "");
        assert_eq!(state.input_cursor, 0);
    }

    #[test]
    fn test_input_cursor_steps_over_multibyte_chars() {
        let mut state = make_state();
        state.set_input("aé");
        state.input_cursor_left();
        assert_eq!(state.input_cursor, 1);
        state.input_cursor_left();
        assert_eq!(state.input_cursor, 0);
        state.input_cursor_left();
        assert_eq!(state.input_cursor, 0);

        state.input_cursor_right();
        assert_eq!(state.input_cursor, 1);
        state.input_cursor_right();
        assert_eq!(state.input_cursor, 3);
    }

    #[test]
    fn test_move_down_clamps_to_result_count() {
        let mut state = make_state();
        state.set_result_count(3);
        state.move_down();
        state.move_down();
        state.move_down();
        state.move_down();
        assert_eq!(state.cursor, 2);

        state.move_up();
        state.move_up();
        state.move_up();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_set_result_count_clamps_cursor() {
        let mut state = make_state();
        state.set_result_count(10);
        state.cursor = 9;
        state.set_result_count(4);
        assert_eq!(state.cursor, 3);

        state.set_result_count(0);
        assert_eq!(state.cursor, 0);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut state = make_state();
        state.set_result_count(20);
        state.set_visible_height(5);

        for _ in 0..7 {
            state.move_down();
        }
        assert_eq!(state.cursor, 7);
        assert_eq!(state.scroll_offset, 3);

        state.move_to_top();
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_page_down_jumps_by_visible_height() {
        let mut state = make_state();
        state.set_result_count(20);
        state.set_visible_height(6);

        state.page_down();
        assert_eq!(state.cursor, 6);

        state.move_to_bottom();
        state.page_down();
        assert_eq!(state.cursor, 19);

        state.page_up();
        assert_eq!(state.cursor, 13);
    }

    #[test]
    fn test_messages_expire() {
        let mut state = make_state();
        state.add_message(MessageLevel::Info, "fresh");
        state.messages.push(StatusMessage {
            level: MessageLevel::Error,
            text: "stale".to_string(),
            created_at: Instant::now() - Duration::from_secs(60),
        });

        let active = state.active_messages();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "fresh");

        state.cleanup_messages();
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_suggestions_only_show_in_normal_mode() {
        let mut state = make_state();
        state.arm_suggestions();
        state.set_suggestions(vec!["fantasy".to_string()]);
        assert!(state.show_suggestions);
        assert_eq!(state.first_suggestion(), Some("fantasy"));

        state.mode = Mode::Help;
        state.set_suggestions(vec!["fantasy".to_string()]);
        assert!(!state.show_suggestions);
        assert_eq!(state.first_suggestion(), None);
    }

    #[test]
    fn test_suggestions_stay_dismissed_until_rearmed() {
        let mut state = make_state();
        state.set_suggestions(vec!["fantasy".to_string()]);
        assert!(!state.show_suggestions);

        state.arm_suggestions();
        state.set_suggestions(vec!["fantasy".to_string()]);
        assert!(state.show_suggestions);

        state.hide_suggestions();
        state.set_suggestions(vec!["fantasy".to_string()]);
        assert!(!state.show_suggestions);
    }

    #[test]
    fn test_empty_suggestions_hide_popup() {
        let mut state = make_state();
        state.arm_suggestions();
        state.set_suggestions(vec!["maps".to_string()]);
        state.set_suggestions(Vec::new());
        assert!(!state.show_suggestions);
        assert!(state.visible_suggestions().is_empty());
    }

    #[test]
    fn test_open_picker_switches_mode_and_hides_suggestions() {
        let mut state = make_state();
        state.arm_suggestions();
        state.set_suggestions(vec!["maps".to_string()]);

        let picker = PickerState::new(PickerKind::Category, vec!["art".to_string()], BTreeSet::new());
        state.open_picker(picker);

        assert_eq!(state.mode, Mode::Picker);
        assert!(!state.show_suggestions);

        state.close_picker();
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.picker.is_none());
    }

    #[test]
    fn test_picker_refilter_ranks_matches() {
        let items = vec![
            "fantasy".to_string(),
            "scifi".to_string(),
            "fan art".to_string(),
        ];
        let mut picker = PickerState::new(PickerKind::Tags, items, BTreeSet::new());
        assert_eq!(picker.filtered.len(), 3);

        picker.push('f');
        picker.push('a');
        picker.push('n');
        assert_eq!(picker.filtered.len(), 2);
        assert!(picker.filtered.iter().all(|t| t.contains("fan")));
        assert_eq!(picker.cursor, 0);

        picker.backspace();
        picker.backspace();
        picker.backspace();
        assert_eq!(picker.filtered.len(), 3);
    }

    #[test]
    fn test_picker_toggle_current() {
        let items = vec!["maps".to_string(), "tokens".to_string()];
        let mut picker = PickerState::new(PickerKind::Tags, items, BTreeSet::new());

        picker.toggle_current();
        assert!(picker.selected.contains("maps"));

        picker.toggle_current();
        assert!(picker.selected.is_empty());

        picker.move_down();
        picker.toggle_current();
        assert!(picker.selected.contains("tokens"));
    }

    #[test]
    fn test_picker_cursor_clamps() {
        let items = vec!["a".to_string(), "b".to_string()];
        let mut picker = PickerState::new(PickerKind::Category, items, BTreeSet::new());

        picker.move_down();
        picker.move_down();
        assert_eq!(picker.cursor, 1);
        assert_eq!(picker.current(), Some("b"));

        picker.move_up();
        picker.move_up();
        assert_eq!(picker.cursor, 0);
    }

    #[test]
    fn test_picker_scroll_window() {
        let items: Vec<String> = (0..20).map(|i| format!("tag{i}")).collect();
        let mut picker = PickerState::new(PickerKind::Tags, items, BTreeSet::new());

        for _ in 0..12 {
            picker.move_down();
        }
        picker.adjust_scroll(8);
        assert_eq!(picker.scroll_offset, 5);

        picker.cursor = 2;
        picker.adjust_scroll(8);
        assert_eq!(picker.scroll_offset, 2);
    }

    #[test]
    fn test_price_input_editing() {
        let mut input = PriceInputState::new("5.00..20.00");
        assert_eq!(input.cursor, 11);

        input.backspace();
        input.backspace();
        assert_eq!(input.buffer, "5.00..20.");

        input.cursor_left();
        input.cursor_left();
        input.push('1');
        assert_eq!(input.buffer, "5.00..210.");
        assert_eq!(input.cursor, 8);
    }

    #[test]
    fn test_only_tags_picker_is_multi() {
        assert!(PickerKind::Tags.is_multi());
        assert!(!PickerKind::Category.is_multi());
        assert!(!PickerKind::Popular.is_multi());
    }
}
