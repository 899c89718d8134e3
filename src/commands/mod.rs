//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation against the configured backend.

use crate::config::ShelfrConfig;
use crate::remote::HttpBackend;

pub mod browse;
pub mod completions;
pub mod config;
pub mod history;
pub mod popular;
pub mod search;
pub mod share;
pub mod suggest;

// Re-export execute functions for convenience
pub use browse::execute as browse;
pub use completions::execute as completions;
pub use config::execute as config;
pub use history::execute as history;
pub use popular::execute as popular;
pub use search::execute as search;
pub use share::execute as share;
pub use suggest::execute as suggest;

/// Builds the HTTP backend for one invocation, honoring `--backend`.
pub(crate) fn connect(
    config: &ShelfrConfig,
    backend_override: Option<&str>,
) -> crate::remote::Result<HttpBackend> {
    let url = backend_override.unwrap_or(&config.backend_url);
    HttpBackend::new(url, config.request_timeout())
}
