//! Popular command - what other people are searching for

use crate::{
    ShelfrError,
    config::ShelfrConfig,
    output,
    remote::CatalogBackend,
};

type Result<T> = std::result::Result<T, ShelfrError>;

/// Execute the popular command
///
/// # Errors
/// Returns an error if the backend URL is invalid or the request fails
pub fn execute(
    config: &ShelfrConfig,
    backend_override: Option<&str>,
    limit: u32,
    quiet: bool,
) -> Result<()> {
    let backend = super::connect(config, backend_override)?;
    let popular = backend.popular(limit)?;

    let rendered = output::render_popular(&popular, quiet);
    if !rendered.is_empty() {
        println!("{rendered}");
    }

    Ok(())
}
