//! Command-line interface definition using clap's derive API.
//!
//! # Commands
//!
//! - `browse` (alias: `b`) - Interactive catalog browser (default when no
//!   subcommand is given)
//! - `search` (alias: `s`) - Run one query and print the results
//! - `suggest` - Ask the backend to complete a search prefix
//! - `popular` - Show what other people are searching for
//! - `share` - Print a permalink for a query
//! - `history` - Show or clear recent searches
//! - `config` - Manage configuration settings
//! - `completions` - Generate shell completions
//!
//! # Design Features
//!
//! - Global flags: `--quiet` and `--backend` work with every subcommand
//! - Shared filter arguments: `browse`, `search` and `share` accept the
//!   same query flags through [`QueryArgs`]
//! - Typed values: `--price`, `--sort` and `--order` are validated during
//!   argument parsing, not at request time
//!
//! # Examples
//!
//! ```
//! use shelfr::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_args();
//! match cli.get_command() {
//!     Commands::Search { query, format } => {
//!         // run a one-shot search
//!     }
//!     _ => {}
//! }
//! ```

use clap::{Parser, Subcommand};

use crate::catalog::{SortField, SortOrder};
use crate::output::OutputFormat;
use crate::query::{PriceRange, QueryState};

/// Terminal storefront catalog browser
#[derive(Parser, Debug)]
#[command(name = "shelfr")]
#[command(about = "Browse and search a storefront catalog from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Suppress informational output (print only results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Backend URL for this invocation (overrides the configured one)
    #[arg(long = "backend", value_name = "URL", global = true)]
    pub backend: Option<String>,
}

/// Filter flags shared by `browse`, `search` and `share`.
///
/// Flattened into each subcommand so `shelfr search -t rust --free` and
/// `shelfr share -t rust --free` describe the same query.
#[derive(Parser, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Search text (omit to match everything)
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Only items in this category
    #[arg(short = 'c', long = "category", value_name = "NAME")]
    pub category: Option<String>,

    /// Only items carrying this tag (repeatable; all must match)
    #[arg(short = 't', long = "tag", value_name = "TAG", num_args = 0..)]
    pub tags: Vec<String>,

    /// Price window in dollars (e.g. 5..19.99)
    #[arg(long = "price", value_name = "MIN..MAX")]
    pub price: Option<PriceRange>,

    /// Only free items
    #[arg(long = "free", conflicts_with = "paid")]
    pub free: bool,

    /// Only paid items
    #[arg(long = "paid", conflicts_with = "free")]
    pub paid: bool,

    /// Sort field (relevance, title, price, published)
    #[arg(long = "sort", value_name = "FIELD")]
    pub sort: Option<SortField>,

    /// Sort direction (asc, desc)
    #[arg(long = "order", value_name = "DIR")]
    pub order: Option<SortOrder>,

    /// Page to fetch (1-based)
    #[arg(short = 'p', long = "page", value_name = "N")]
    pub page: Option<u32>,

    /// Results per page (1-100, overrides the configured page size)
    #[arg(short = 'n', long = "limit", value_name = "N")]
    pub limit: Option<u32>,
}

impl QueryArgs {
    /// Builds the query these flags describe.
    ///
    /// `default_page_size` fills in when `--limit` was not given. The page
    /// number is applied after every filter because filter changes reset
    /// pagination.
    pub fn to_query_state(&self, default_page_size: u32) -> QueryState {
        let mut state = QueryState::new(self.limit.unwrap_or(default_page_size));
        if let Some(query) = &self.query {
            state.set_text(query.clone());
        }
        if let Some(category) = &self.category {
            state.set_category(Some(category.clone()));
        }
        if !self.tags.is_empty() {
            state.set_tags(self.tags.iter().cloned().collect());
        }
        if let Some(price) = self.price {
            state.set_price_range(Some(price));
        }
        if self.free {
            state.set_is_free(Some(true));
        } else if self.paid {
            state.set_is_free(Some(false));
        }
        if let Some(sort) = self.sort {
            state.set_sort_by(sort);
        }
        if let Some(order) = self.order {
            state.set_sort_order(order);
        }
        if let Some(page) = self.page {
            state.set_page(page);
        }
        state
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the catalog interactively (default)
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        query: QueryArgs,

        /// Start from a shared permalink instead of flag arguments
        #[arg(long = "from-url", value_name = "URL", conflicts_with = "query")]
        from_url: Option<String>,
    },

    /// Run one query and print the results
    #[command(visible_alias = "s", alias = "find")]
    Search {
        #[command(flatten)]
        query: QueryArgs,

        /// Output format
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Ask the backend to complete a search prefix
    Suggest {
        /// Prefix to complete
        #[arg(value_name = "PREFIX")]
        prefix: String,

        /// Maximum number of suggestions
        #[arg(short = 'n', long = "limit", value_name = "N", default_value_t = 8)]
        limit: u32,
    },

    /// Show what other people are searching for
    Popular {
        /// Maximum number of queries
        #[arg(short = 'n', long = "limit", value_name = "N", default_value_t = 10)]
        limit: u32,
    },

    /// Print a shareable permalink for a query
    Share {
        #[command(flatten)]
        query: QueryArgs,

        /// Also copy the link to the clipboard
        #[arg(long = "copy")]
        copy: bool,
    },

    /// Show or clear recent searches
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List recent searches
    Show,

    /// Forget all recent searches
    #[command(visible_alias = "rm")]
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the active configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key=value pair (e.g., page_size=48)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., page_size)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Restore the default configuration
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the requested command, defaulting to an unfiltered browse.
    pub fn get_command(self) -> Commands {
        self.command.unwrap_or(Commands::Browse {
            query: QueryArgs::default(),
            from_url: None,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
