//! Browse command - interactive catalog browser

use crate::{
    ShelfrError,
    cli::QueryArgs,
    config::ShelfrConfig,
    share, ui,
};

type Result<T> = std::result::Result<T, ShelfrError>;

/// Execute the browse command
///
/// The initial query comes from `--from-url` when given, otherwise from the
/// flag arguments.
///
/// # Errors
/// Returns an error if the backend URL is invalid, the permalink cannot be
/// parsed, or the terminal session fails
pub fn execute(
    config: &ShelfrConfig,
    backend_override: Option<&str>,
    query: &QueryArgs,
    from_url: Option<&str>,
) -> Result<()> {
    let backend = super::connect(config, backend_override)?;

    let initial = match from_url {
        Some(link) => share::parse_permalink(link)?,
        None => query.to_query_state(config.page_size),
    };

    ui::run(config, Box::new(backend), initial)?;
    Ok(())
}
