//! Action metadata registry - single source of truth for keybind information

use crate::keybinds::actions::BrowseAction;
use crate::keybinds::config::{KeybindConfig, parse_key_string};
use crossterm::event::KeyEvent;
use std::collections::HashMap;

/// Metadata for a browse action - single source of truth
#[derive(Debug, Clone)]
pub struct ActionMetadata {
    /// Action enum variant
    pub action: BrowseAction,

    /// Internal action identifier (e.g., "pick_tags")
    pub id: &'static str,

    /// Default keybind(s) in internal format (e.g., "ctrl-t")
    pub default_keys: &'static [&'static str],

    /// Short human-readable name (e.g., "Tags")
    pub short_name: &'static str,

    /// Full description (e.g., "Toggle tag filters")
    pub description: &'static str,

    /// Category for grouping in help
    pub category: ActionCategory,
}

/// Category for organizing actions in help displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    /// Filter actions
    Filters,
    /// Sort actions
    Sorting,
    /// Result list actions
    Results,
    /// System actions (retry, help, etc.)
    System,
}

impl ActionMetadata {
    /// Convert internal key format to human-readable (e.g., "ctrl-t" -> "Ctrl+T")
    #[must_use]
    pub fn format_key(key: &str) -> String {
        key.split('-')
            .map(|part| match part {
                "ctrl" => "Ctrl".to_string(),
                "alt" => "Alt".to_string(),
                "shift" => "Shift".to_string(),
                "pgup" => "PgUp".to_string(),
                "pgdn" => "PgDn".to_string(),
                "bspace" => "Backspace".to_string(),
                "btab" => "Shift+Tab".to_string(),
                other if other.len() == 1 => other.to_uppercase(),
                other => {
                    let mut chars = other.chars();
                    match chars.next() {
                        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                        None => other.to_string(),
                    }
                }
            })
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Get configured keybind(s) from config, falling back to defaults
    #[must_use]
    pub fn get_keys(&self, config: &KeybindConfig) -> Vec<String> {
        let configured = config.get(self.id);
        if configured.is_empty() {
            self.default_keys.iter().map(|s| (*s).to_string()).collect()
        } else {
            configured
        }
    }

    /// Get human-readable keybind(s)
    #[must_use]
    pub fn get_keys_human(&self, config: &KeybindConfig) -> Vec<String> {
        self.get_keys(config)
            .iter()
            .map(|k| Self::format_key(k))
            .collect()
    }

    /// Get primary keybind (first one) in human format
    #[must_use]
    pub fn primary_key_human(&self, config: &KeybindConfig) -> String {
        self.get_keys_human(config)
            .first()
            .cloned()
            .unwrap_or_else(|| "None".to_string())
    }
}

/// Global registry of all action metadata
pub struct ActionRegistry;

impl ActionRegistry {
    /// Get all registered actions
    #[must_use]
    pub const fn all() -> &'static [ActionMetadata] {
        ALL_ACTIONS
    }

    /// Get metadata for a specific action
    #[must_use]
    pub fn get(action: BrowseAction) -> Option<&'static ActionMetadata> {
        ALL_ACTIONS.iter().find(|m| m.action == action)
    }

    /// Get metadata by action ID
    #[must_use]
    pub fn get_by_id(id: &str) -> Option<&'static ActionMetadata> {
        ALL_ACTIONS.iter().find(|m| m.id == id)
    }

    /// Get actions by category
    #[must_use]
    pub fn by_category(category: ActionCategory) -> Vec<&'static ActionMetadata> {
        ALL_ACTIONS
            .iter()
            .filter(|m| m.category == category)
            .collect()
    }

    /// Resolve the configured keybinds into a concrete event lookup
    ///
    /// Disabled actions and unparseable key strings are skipped.
    #[must_use]
    pub fn event_map(config: &KeybindConfig) -> HashMap<KeyEvent, BrowseAction> {
        let mut map = HashMap::new();
        for meta in ALL_ACTIONS {
            if config.is_disabled(meta.id) {
                continue;
            }
            for key in meta.get_keys(config) {
                if let Some(event) = parse_key_string(&key) {
                    map.insert(event, meta.action);
                }
            }
        }
        map
    }
}

/// Static registry - compile-time constant with all action metadata
static ALL_ACTIONS: &[ActionMetadata] = &[
    // Filters
    ActionMetadata {
        action: BrowseAction::PickCategory,
        id: "pick_category",
        default_keys: &["ctrl-g"],
        short_name: "Category",
        description: "Pick a category filter",
        category: ActionCategory::Filters,
    },
    ActionMetadata {
        action: BrowseAction::PickTags,
        id: "pick_tags",
        default_keys: &["ctrl-t"],
        short_name: "Tags",
        description: "Toggle tag filters",
        category: ActionCategory::Filters,
    },
    ActionMetadata {
        action: BrowseAction::EditPrice,
        id: "edit_price",
        default_keys: &["ctrl-e"],
        short_name: "Price",
        description: "Set a price range filter",
        category: ActionCategory::Filters,
    },
    ActionMetadata {
        action: BrowseAction::ToggleFree,
        id: "toggle_free",
        default_keys: &["ctrl-f"],
        short_name: "Free/Paid",
        description: "Cycle free / paid / all",
        category: ActionCategory::Filters,
    },
    ActionMetadata {
        action: BrowseAction::ClearFilters,
        id: "clear_filters",
        default_keys: &["ctrl-x"],
        short_name: "Clear Filters",
        description: "Clear filters, keep search text",
        category: ActionCategory::Filters,
    },
    // Sorting
    ActionMetadata {
        action: BrowseAction::CycleSort,
        id: "cycle_sort",
        default_keys: &["ctrl-s"],
        short_name: "Sort",
        description: "Cycle sort field",
        category: ActionCategory::Sorting,
    },
    ActionMetadata {
        action: BrowseAction::FlipOrder,
        id: "flip_order",
        default_keys: &["ctrl-o"],
        short_name: "Order",
        description: "Flip sort direction",
        category: ActionCategory::Sorting,
    },
    // Results
    ActionMetadata {
        action: BrowseAction::NextPage,
        id: "next_page",
        default_keys: &["ctrl-n"],
        short_name: "Next Page",
        description: "Next page of results",
        category: ActionCategory::Results,
    },
    ActionMetadata {
        action: BrowseAction::PrevPage,
        id: "prev_page",
        default_keys: &["ctrl-b"],
        short_name: "Prev Page",
        description: "Previous page of results",
        category: ActionCategory::Results,
    },
    ActionMetadata {
        action: BrowseAction::OpenItem,
        id: "open_item",
        default_keys: &["ctrl-l"],
        short_name: "Open",
        description: "Open item in web browser",
        category: ActionCategory::Results,
    },
    ActionMetadata {
        action: BrowseAction::CopyLink,
        id: "copy_link",
        default_keys: &["ctrl-y"],
        short_name: "Copy Link",
        description: "Copy permalink to clipboard",
        category: ActionCategory::Results,
    },
    // System
    ActionMetadata {
        action: BrowseAction::Retry,
        id: "retry",
        default_keys: &["ctrl-r"],
        short_name: "Retry",
        description: "Retry the failed request",
        category: ActionCategory::System,
    },
    ActionMetadata {
        action: BrowseAction::ShowPopular,
        id: "show_popular",
        default_keys: &["ctrl-p"],
        short_name: "Popular",
        description: "Show popular searches",
        category: ActionCategory::System,
    },
    ActionMetadata {
        action: BrowseAction::ShowHelp,
        id: "show_help",
        default_keys: &["f1"],
        short_name: "Help",
        description: "Show help",
        category: ActionCategory::System,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinds::config::KeybindDef;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_registry_covers_every_action() {
        for meta in ActionRegistry::all() {
            assert_eq!(ActionRegistry::get(meta.action).unwrap().id, meta.id);
            assert_eq!(ActionRegistry::get_by_id(meta.id).unwrap().id, meta.id);
        }
    }

    #[test]
    fn test_format_key() {
        assert_eq!(ActionMetadata::format_key("ctrl-t"), "Ctrl+T");
        assert_eq!(ActionMetadata::format_key("f1"), "F1");
        assert_eq!(ActionMetadata::format_key("ctrl-pgup"), "Ctrl+PgUp");
    }

    #[test]
    fn test_event_map_default_bindings() {
        let config = KeybindConfig::default();
        let map = ActionRegistry::event_map(&config);

        let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(map.get(&ctrl_t), Some(&BrowseAction::PickTags));

        let f1 = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(map.get(&f1), Some(&BrowseAction::ShowHelp));
    }

    #[test]
    fn test_event_map_skips_disabled() {
        let mut config = KeybindConfig::default();
        config
            .keybinds
            .insert("pick_tags".to_string(), KeybindDef::Single("none".to_string()));

        let map = ActionRegistry::event_map(&config);
        assert!(!map.values().any(|a| *a == BrowseAction::PickTags));
    }

    #[test]
    fn test_event_map_honors_overrides() {
        let mut config = KeybindConfig::default();
        config
            .keybinds
            .insert("retry".to_string(), KeybindDef::Multiple(vec!["f5".to_string()]));

        let map = ActionRegistry::event_map(&config);
        let f5 = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(map.get(&f5), Some(&BrowseAction::Retry));

        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(!map.contains_key(&ctrl_r));
    }

    #[test]
    fn test_default_keys_do_not_collide() {
        let config = KeybindConfig::default();
        let map = ActionRegistry::event_map(&config);

        let bound: usize = ActionRegistry::all()
            .iter()
            .map(|m| m.get_keys(&config).len())
            .sum();
        assert_eq!(map.len(), bound, "two actions share a default key");
    }
}
