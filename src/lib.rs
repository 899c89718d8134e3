//! Shelfr - terminal client for browsing a storefront catalog
//!
//! Search, filter and page through a storefront's catalog from the
//! terminal: an interactive browser with debounced as-you-type fetching,
//! one-shot subcommands for scripts, shareable permalinks and a cached
//! suggestion sidecar.

use thiserror::Error;

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod history;
pub mod keybinds;
pub mod output;
pub mod query;
pub mod remote;
pub mod share;
pub mod suggest;
pub mod ui;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum ShelfrError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// The storefront backend failed or answered with garbage
    #[error("Backend error: {0}")]
    Backend(#[from] remote::BackendError),
    /// A permalink could not be built or parsed
    #[error("Share link error: {0}")]
    Share(#[from] share::ShareError),
    /// The search history file could not be read or written
    #[error("History error: {0}")]
    History(#[from] history::HistoryError),
    /// Results could not be rendered
    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
    /// The interactive browser failed
    #[error("Browser error: {0}")]
    Ui(#[from] ui::UiError),
    /// Clipboard access failed
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
    /// An interactive prompt failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
