//! Share command - permalink for a query

use crate::{
    ShelfrError,
    cli::QueryArgs,
    config::ShelfrConfig,
    share,
};

type Result<T> = std::result::Result<T, ShelfrError>;

/// Execute the share command
///
/// Prints the permalink; with `--copy` it also lands on the clipboard.
///
/// # Errors
/// Returns an error if the base URL is invalid or clipboard access fails
pub fn execute(
    config: &ShelfrConfig,
    backend_override: Option<&str>,
    query: &QueryArgs,
    copy: bool,
    quiet: bool,
) -> Result<()> {
    let base = backend_override.unwrap_or(&config.backend_url);
    let state = query.to_query_state(config.page_size);

    let link = share::permalink(base, &state)?;
    println!("{link}");

    if copy {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(link)?;
        if !quiet {
            println!("Copied to clipboard.");
        }
    }

    Ok(())
}
