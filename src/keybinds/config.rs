//! Configuration for keybinds.

use config::{Config, ConfigError, File, FileFormat};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration for keybinds and related settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeybindConfig {
    /// Keybind mappings
    #[serde(default = "default_keybinds")]
    pub keybinds: HashMap<String, KeybindDef>,

    /// Display settings
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Keybind definition - can be single key, multiple keys, or disabled.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeybindDef {
    /// Single keybind
    Single(String),
    /// Multiple alternative keybinds for the same action
    Multiple(Vec<String>),
}

/// Display-related settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// Show keybind hints at the bottom of the browser
    #[serde(default = "default_true")]
    pub show_hints: bool,
}

impl Default for KeybindConfig {
    fn default() -> Self {
        Self {
            keybinds: default_keybinds(),
            display: DisplaySettings::default(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { show_hints: true }
    }
}

fn default_keybinds() -> HashMap<String, KeybindDef> {
    let mut keybinds = HashMap::new();

    // Filters
    keybinds.insert("pick_category".to_string(), KeybindDef::Single("ctrl-g".to_string()));
    keybinds.insert("pick_tags".to_string(), KeybindDef::Single("ctrl-t".to_string()));
    keybinds.insert("edit_price".to_string(), KeybindDef::Single("ctrl-e".to_string()));
    keybinds.insert("toggle_free".to_string(), KeybindDef::Single("ctrl-f".to_string()));
    keybinds.insert("clear_filters".to_string(), KeybindDef::Single("ctrl-x".to_string()));

    // Sorting
    keybinds.insert("cycle_sort".to_string(), KeybindDef::Single("ctrl-s".to_string()));
    keybinds.insert("flip_order".to_string(), KeybindDef::Single("ctrl-o".to_string()));

    // Results
    keybinds.insert("next_page".to_string(), KeybindDef::Single("ctrl-n".to_string()));
    keybinds.insert("prev_page".to_string(), KeybindDef::Single("ctrl-b".to_string()));
    keybinds.insert("open_item".to_string(), KeybindDef::Single("ctrl-l".to_string()));
    keybinds.insert("copy_link".to_string(), KeybindDef::Single("ctrl-y".to_string()));

    // System
    keybinds.insert("retry".to_string(), KeybindDef::Single("ctrl-r".to_string()));
    keybinds.insert("show_popular".to_string(), KeybindDef::Single("ctrl-p".to_string()));
    keybinds.insert("show_help".to_string(), KeybindDef::Multiple(vec!["f1".to_string()]));

    keybinds
}

fn default_true() -> bool {
    true
}

impl KeybindConfig {
    /// Path to the keybinds file, next to the main config
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("shelfr").join("keybinds.toml"))
    }

    /// Load the keybinds file, falling back to defaults when it is absent
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an existing file cannot be read or parsed.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Get the keybind(s) for a given action name.
    ///
    /// Returns an empty slice if the action is not configured.
    #[must_use]
    pub fn get(&self, action: &str) -> Vec<String> {
        self.keybinds.get(action).map_or_else(Vec::new, |def| {
            match def {
                KeybindDef::Single(key) => vec![key.clone()],
                KeybindDef::Multiple(keys) => keys.clone(),
            }
        })
    }

    /// Check if a keybind is disabled for an action.
    #[must_use]
    pub fn is_disabled(&self, action: &str) -> bool {
        self.keybinds.get(action).is_some_and(|def| {
            match def {
                KeybindDef::Single(key) => key == "none",
                KeybindDef::Multiple(keys) => keys.iter().all(|k| k == "none"),
            }
        })
    }
}

/// Parse a key string like "ctrl-t" into a `KeyEvent`
#[must_use]
pub fn parse_key_string(s: &str) -> Option<KeyEvent> {
    let parts: Vec<&str> = s.split('-').collect();

    let mut modifiers = KeyModifiers::NONE;
    let key_part = parts.last()?;

    for part in &parts[..parts.len().saturating_sub(1)] {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => {}
        }
    }

    let code = match key_part.to_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "btab" | "backtab" => KeyCode::BackTab,
        "bspace" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" | "pageup" => KeyCode::PageUp,
        "pgdn" | "pagedown" => KeyCode::PageDown,
        s if s.starts_with('f') && s.len() > 1 => s[1..].parse().ok().map(KeyCode::F)?,
        s if s.len() == 1 => KeyCode::Char(s.chars().next()?),
        _ => return None,
    };

    Some(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keybinds() {
        let config = KeybindConfig::default();
        assert_eq!(config.get("pick_tags"), vec!["ctrl-t"]);
        assert_eq!(config.get("retry"), vec!["ctrl-r"]);
        assert_eq!(config.get("show_help"), vec!["f1"]);
    }

    #[test]
    fn test_keybind_def_parsing() {
        let toml = r#"
            [keybinds]
            pick_tags = "ctrl-t"
            retry = ["ctrl-r", "f5"]
        "#;

        let config: KeybindConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.get("pick_tags"), vec!["ctrl-t"]);
        assert_eq!(config.get("retry"), vec!["ctrl-r", "f5"]);
    }

    #[test]
    fn test_is_disabled() {
        let mut keybinds = HashMap::new();
        keybinds.insert("disabled".to_string(), KeybindDef::Single("none".to_string()));
        keybinds.insert("enabled".to_string(), KeybindDef::Single("ctrl-t".to_string()));

        let config = KeybindConfig {
            keybinds,
            ..Default::default()
        };

        assert!(config.is_disabled("disabled"));
        assert!(!config.is_disabled("enabled"));
    }

    #[test]
    fn test_parse_key_string() {
        let key = parse_key_string("ctrl-t").unwrap();
        assert_eq!(key.code, KeyCode::Char('t'));
        assert!(key.modifiers.contains(KeyModifiers::CONTROL));

        let key = parse_key_string("f1").unwrap();
        assert_eq!(key.code, KeyCode::F(1));
        assert_eq!(key.modifiers, KeyModifiers::NONE);

        assert!(parse_key_string("ctrl-bogus").is_none());
    }

    #[test]
    fn test_display_defaults() {
        let config = KeybindConfig::default();
        assert!(config.display.show_hints);
    }
}
