//! History command - show or clear recent searches

use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;

use crate::{
    ShelfrError,
    cli::HistoryCommands,
    config::ShelfrConfig,
    history::SearchHistory,
};

type Result<T> = std::result::Result<T, ShelfrError>;

/// Execute the history command
///
/// # Errors
/// Returns an error if the data directory cannot be determined or the
/// history file cannot be written
pub fn execute(config: &ShelfrConfig, command: &HistoryCommands, quiet: bool) -> Result<()> {
    let path = SearchHistory::default_path().ok_or_else(|| {
        ShelfrError::InvalidInput("Could not determine data directory".into())
    })?;
    let mut history = SearchHistory::load(path, config.history_limit);

    match command {
        HistoryCommands::Show => {
            if history.is_empty() {
                if !quiet {
                    println!("No recent searches.");
                }
                return Ok(());
            }

            if !quiet {
                println!("Recent searches:");
            }
            for entry in history.entries() {
                if quiet {
                    println!("{}", entry.query);
                } else {
                    println!("  {}  ({})", entry.query, entry.at.format("%Y-%m-%d %H:%M"));
                }
            }
        }
        HistoryCommands::Clear { yes } => {
            if history.is_empty() {
                if !quiet {
                    println!("History is already empty.");
                }
                return Ok(());
            }

            let confirmed = *yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!(
                        "Forget {} recent search(es)?",
                        history.entries().len()
                    ))
                    .default(false)
                    .interact()?;

            if !confirmed {
                if !quiet {
                    println!("Cancelled.");
                }
                return Ok(());
            }

            history.clear();
            history.save()?;
            if !quiet {
                println!("Search history cleared.");
            }
        }
    }

    Ok(())
}
