//! The flow every list command shares

use crate::error::Result;
use crate::output::{render_records, RecordRenderer};
use crate::pagination::{
    DisplaySink, FetchMode, Outcome, Page, PageFetcher, PaginationEngine, Prompter,
};
use crate::types::OutputFormat;
use tracing::debug;

/// Hint shown after a link-paged listing that stopped at the first page
pub const MORE_ITEMS_HINT: &str =
    "\nMore items available. Use --all-pages to load all, or --format table to page interactively.";

/// Hint shown after a search that stopped at one page
pub fn more_results_hint(next_page: u32) -> String {
    format!(
        "\nMore results available. Use --page {next_page} to see next page, or --all-pages to load all."
    )
}

/// Run a listing through the pagination engine and print it
///
/// Interactive listings are printed by the engine as pages arrive.
/// Otherwise the gathered records are rendered once through `sink`, and
/// `more_hint` goes to the notice channel when pages were left behind.
pub async fn show_listing(
    fetcher: &dyn PageFetcher,
    first_page: Page,
    format: OutputFormat,
    all_pages: bool,
    more_hint: &str,
    prompter: &mut dyn Prompter,
    sink: &mut dyn DisplaySink,
) -> Result<Outcome> {
    let mode = FetchMode::from_flags(all_pages, format);
    debug!(?mode, first_page_items = first_page.items.len(), "Starting listing");

    let outcome = {
        let mut engine = PaginationEngine::new(fetcher, &RecordRenderer, format, prompter, sink);
        engine.run_to_outcome(first_page, mode).await?
    };

    if !outcome.displayed {
        sink.show(&render_records(&outcome.items, format)?);
    }
    if mode == FetchMode::SinglePage && outcome.more_available {
        sink.notice(more_hint);
    }
    Ok(outcome)
}
