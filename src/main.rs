//! Shelfr CLI application entry point
//!
//! This is the main executable for the shelfr catalog browser. It provides a
//! command-line interface for searching a storefront catalog and an
//! interactive terminal browser for exploring it.
//!
//! # Features
//!
//! - **Browse Mode**: Interactive browser with live search, filter pickers
//!   and suggestion completion
//! - **One-shot Search**: Print matching items in text, JSON or CSV form
//! - **Suggestions**: Complete a search prefix from the backend
//! - **Sharing**: Turn any query into a permalink (and back)
//! - **Quiet Mode**: Suppress informational output for scripting
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog interactively (default command)
//! shelfr
//! shelfr browse gardening
//!
//! # One-shot search with filters
//! shelfr search rust -c programming -t beginner --price 5..30
//! shelfr -q search rust --format json
//!
//! # Complete a prefix / see what others search for
//! shelfr suggest fant
//! shelfr popular -n 5
//!
//! # Share a query, or resume someone else's
//! shelfr share rust --free --copy
//! shelfr browse --from-url "https://shop.example.com/search?q=rust&free=1"
//!
//! # Recent searches
//! shelfr history show
//! shelfr history clear -y
//! ```
//!
//! # Configuration
//!
//! On first run, shelfr prompts for the backend URL. Configuration is stored
//! in the user's config directory (`~/.config/shelfr/config.toml` on Linux).

use shelfr::{
    ShelfrError,
    cli::{Cli, Commands},
    commands,
    config::ShelfrConfig,
};

type Result<T> = std::result::Result<T, ShelfrError>;

/// Main entry point for the shelfr application
///
/// Parses command-line arguments, loads configuration, and dispatches to the
/// appropriate command handler.
///
/// # Errors
///
/// Returns `ShelfrError` if configuration loading fails, the backend cannot
/// be reached, or any command handler returns an error.
fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let cli_quiet = cli.quiet;
    let backend_override = cli.backend.clone();

    let command = cli.get_command();

    // Completions and config management never contact the backend, and both
    // must work before any configuration file exists.
    if let Commands::Completions { shell } = &command {
        commands::completions(*shell);
        return Ok(());
    }
    if let Commands::Config { command } = &command {
        return commands::config(command, cli_quiet);
    }

    let config = ShelfrConfig::load_or_setup()?;

    let quiet = cli_quiet || config.quiet;
    let backend = backend_override.as_deref();

    match &command {
        Commands::Browse { query, from_url } => {
            commands::browse(&config, backend, query, from_url.as_deref())?;
        }
        Commands::Search { query, format } => {
            commands::search(&config, backend, query, *format, quiet)?;
        }
        Commands::Suggest { prefix, limit } => {
            commands::suggest(&config, backend, prefix, *limit, quiet)?;
        }
        Commands::Popular { limit } => {
            commands::popular(&config, backend, *limit, quiet)?;
        }
        Commands::Share { query, copy } => {
            commands::share(&config, backend, query, *copy, quiet)?;
        }
        Commands::History { command } => {
            commands::history(&config, command, quiet)?;
        }
        Commands::Config { .. } | Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
