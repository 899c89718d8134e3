//! Config command - manage application settings

use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;

use crate::{
    ShelfrError,
    cli::ConfigCommands,
    config::ShelfrConfig,
};

use config::ConfigError;

type Result<T> = std::result::Result<T, ShelfrError>;

/// Execute the config command
///
/// # Errors
/// Returns an error for an unknown key, an unparseable value, or when the
/// config file cannot be read or written
pub fn execute(command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = ShelfrConfig::load()?;
            let rendered = toml::to_string_pretty(&config).map_err(|e| {
                ConfigError::Message(format!("Failed to serialize config: {e}"))
            })?;
            print!("{rendered}");
        }
        ConfigCommands::Path => {
            println!("{}", ShelfrConfig::config_path()?.display());
        }
        ConfigCommands::Set { setting } => {
            let (key, value) = split_setting(setting)?;
            let mut config = ShelfrConfig::load()?;
            config.set_value(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {value}");
            }
        }
        ConfigCommands::Get { key } => {
            let config = ShelfrConfig::load()?;
            println!("{}", config.get_value(key)?);
        }
        ConfigCommands::Reset { yes } => {
            let confirmed = *yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt("Restore the default configuration?")
                    .default(false)
                    .interact()?;

            if !confirmed {
                if !quiet {
                    println!("Cancelled.");
                }
                return Ok(());
            }

            ShelfrConfig::default().save()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
    }

    Ok(())
}

/// Splits a `key=value` pair, trimming whitespace around both halves.
fn split_setting(setting: &str) -> Result<(&str, &str)> {
    setting
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| {
            ShelfrError::InvalidInput("Invalid format. Use: shelfr config set key=value".into())
        })
}

// ============================================================================
// Tests
// ============================================================================
