//! Suggest command - prefix completion from the backend

use crate::{
    ShelfrError,
    config::ShelfrConfig,
    output,
    remote::CatalogBackend,
};

type Result<T> = std::result::Result<T, ShelfrError>;

/// Execute the suggest command
///
/// # Errors
/// Returns an error if the backend URL is invalid or the request fails
pub fn execute(
    config: &ShelfrConfig,
    backend_override: Option<&str>,
    prefix: &str,
    limit: u32,
    quiet: bool,
) -> Result<()> {
    let backend = super::connect(config, backend_override)?;
    let suggestions = backend.suggest(prefix, limit)?;

    let rendered = output::render_suggestions(prefix, &suggestions, quiet);
    if !rendered.is_empty() {
        println!("{rendered}");
    }

    Ok(())
}
