//! Help text generation from keybind metadata

use crate::keybinds::config::KeybindConfig;
use crate::keybinds::metadata::{ActionCategory, ActionRegistry};

/// Generate formatted help text for the F1 screen based on configured keybinds
#[must_use]
pub fn generate_help_text(config: &KeybindConfig) -> String {
    let mut output = String::new();

    output.push_str("╔═══════════════════════════════════════════════════════════╗\n");
    output.push_str("║             Shelfr Browse Mode - Keybind Reference        ║\n");
    output.push_str("╚═══════════════════════════════════════════════════════════╝\n\n");

    // Built-in keys (not configurable)
    output.push_str("SEARCH BOX:\n");
    output.push_str("  type          Edit the search text (fetch is debounced)\n");
    output.push_str("  Enter         Search now\n");
    output.push_str("  ←/→           Move cursor in the search text\n");
    output.push_str("  Ctrl+U        Clear the search text\n");
    output.push_str("  Ctrl+W        Delete word backwards\n");
    output.push_str("  Tab           Accept the highlighted suggestion\n\n");

    output.push_str("RESULTS:\n");
    output.push_str("  ↑/↓ or Ctrl+K/J   Move the highlight\n");
    output.push_str("  PgUp/PgDn     Previous / next page\n");
    output.push_str("  Home/End      Jump to start/end of the page\n");
    output.push_str("  ESC           Close popup, or quit\n\n");

    // Generate sections for each category
    for category in [
        ActionCategory::Filters,
        ActionCategory::Sorting,
        ActionCategory::Results,
        ActionCategory::System,
    ] {
        let actions = ActionRegistry::by_category(category);
        let actions_enabled: Vec<_> = actions
            .iter()
            .filter(|m| !config.is_disabled(m.id))
            .collect();

        if actions_enabled.is_empty() {
            continue;
        }

        output.push_str(&format!("{}:\n", category_name(category)));

        for meta in actions_enabled {
            let keys = meta.primary_key_human(config);
            output.push_str(&format!("  {:<14}{}\n", keys, meta.description));
        }
        output.push('\n');
    }

    output.push_str("Press any key to close this help screen\n");

    output
}

/// Get category display name
const fn category_name(category: ActionCategory) -> &'static str {
    match category {
        ActionCategory::Filters => "FILTERS",
        ActionCategory::Sorting => "SORTING",
        ActionCategory::Results => "RESULTS",
        ActionCategory::System => "SYSTEM",
    }
}

/// Generate keybind list for the TUI help overlay
///
/// Returns a vector of (key, description) tuples that can be displayed
/// in the help overlay. Uses the configured keybinds from the user's config.
#[must_use]
pub fn generate_overlay_binds(config: &KeybindConfig) -> Vec<(String, String)> {
    let mut binds: Vec<(String, String)> = ActionRegistry::all()
        .iter()
        .filter(|m| !config.is_disabled(m.id))
        .flat_map(|meta| {
            let keys = meta.get_keys_human(config);
            keys.into_iter()
                .map(|k| (k, meta.short_name.to_string()))
                .collect::<Vec<_>>()
        })
        .collect();

    // Sort by key for consistent display
    binds.sort_by(|a, b| a.0.cmp(&b.0));

    // Suggestion popup hint (always available)
    binds.push(("Tab".to_string(), "accept suggestion".to_string()));

    binds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinds::config::KeybindDef;

    #[test]
    fn test_generate_help_includes_categories() {
        let config = KeybindConfig::default();
        let help = generate_help_text(&config);

        assert!(help.contains("FILTERS:"));
        assert!(help.contains("SORTING:"));
        assert!(help.contains("RESULTS:"));
        assert!(help.contains("SYSTEM:"));
    }

    #[test]
    fn test_generate_help_includes_builtin_keys() {
        let config = KeybindConfig::default();
        let help = generate_help_text(&config);

        assert!(help.contains("Ctrl+U        Clear the search text"));
        assert!(help.contains("Tab           Accept the highlighted suggestion"));
    }

    #[test]
    fn test_disabled_actions_left_out() {
        let mut config = KeybindConfig::default();
        config
            .keybinds
            .insert("show_popular".to_string(), KeybindDef::Single("none".to_string()));

        let help = generate_help_text(&config);
        assert!(!help.contains("Show popular searches"));
    }

    #[test]
    fn test_generate_overlay_binds_not_empty() {
        let config = KeybindConfig::default();
        let binds = generate_overlay_binds(&config);

        assert!(!binds.is_empty());
        assert!(binds.iter().any(|(k, _)| k.contains("Ctrl")));
    }

    #[test]
    fn test_generate_overlay_includes_suggestion_hint() {
        let config = KeybindConfig::default();
        let binds = generate_overlay_binds(&config);

        assert!(
            binds
                .iter()
                .any(|(k, d)| k == "Tab" && d == "accept suggestion")
        );
    }
}
