//! Search command - one-shot query against the catalog backend

use crate::{
    ShelfrError,
    cli::QueryArgs,
    config::ShelfrConfig,
    history::SearchHistory,
    output::{self, OutputFormat},
    remote::{CatalogBackend, SearchRequest},
};

type Result<T> = std::result::Result<T, ShelfrError>;

/// Execute the search command
///
/// # Errors
/// Returns an error if the backend URL is invalid, the request fails, or
/// output encoding fails
pub fn execute(
    config: &ShelfrConfig,
    backend_override: Option<&str>,
    query: &QueryArgs,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let backend = super::connect(config, backend_override)?;
    let state = query.to_query_state(config.page_size);

    let page = backend.search(&SearchRequest::from(&state))?;

    let rendered = output::render_page(format, &page, &state, quiet)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }

    record_history(config, state.text());

    Ok(())
}

/// Append the query text to local history, warning instead of failing on
/// I/O errors.
fn record_history(config: &ShelfrConfig, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    let Some(path) = SearchHistory::default_path() else {
        return;
    };
    let mut history = SearchHistory::load(path, config.history_limit);
    history.record(text);
    if let Err(e) = history.save() {
        eprintln!("Warning: failed to save search history: {e}");
    }
}
