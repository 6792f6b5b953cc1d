//! Pagination engine
//!
//! Walks a paged listing from its first page according to a [`FetchMode`].
//! Interactive listings run as a small state machine:
//!
//! ```text
//! ShowingPage ──(cursor left)──▶ WaitingForChoice ──""──▶ ShowingPage (new page)
//!      │                              │  ├──"a"──▶ ShowingPage (everything)
//!      └──(exhausted)──▶ Done ◀──"q"──┘  └──other──▶ WaitingForChoice
//! ```

use super::types::{
    Choice, Cursor, DisplaySink, FetchMode, Page, PageFetcher, PaginationState, Prompter,
    Renderer,
};
use crate::error::{Error, Result};
use crate::types::{OutputFormat, Record};
use tracing::debug;

/// Prompt shown between pages
pub const PROMPT: &str = "Press Enter to load next page, 'a' to load all pages, or 'q' to quit";

/// Notice for input that is not a choice
pub const INVALID_CHOICE: &str = "Invalid choice. Press Enter, 'a', or 'q'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Display records from this index on
    ShowingPage { from: usize },
    WaitingForChoice,
    Done,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Every record gathered, in fetch order
    pub items: Vec<Record>,
    /// The records were already shown through the display sink
    pub displayed: bool,
    /// Pages were left unfetched
    pub more_available: bool,
}

/// Drives fetches for one listing
pub struct PaginationEngine<'a> {
    fetcher: &'a dyn PageFetcher,
    renderer: &'a dyn Renderer,
    format: OutputFormat,
    prompter: &'a mut dyn Prompter,
    sink: &'a mut dyn DisplaySink,
}

impl<'a> PaginationEngine<'a> {
    /// Create an engine; `format` is used for interactive display only
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        renderer: &'a dyn Renderer,
        format: OutputFormat,
        prompter: &'a mut dyn Prompter,
        sink: &'a mut dyn DisplaySink,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            format,
            prompter,
            sink,
        }
    }

    /// Walk the listing and return every record gathered
    pub async fn run(&mut self, first_page: Page, mode: FetchMode) -> Result<Vec<Record>> {
        Ok(self.run_to_outcome(first_page, mode).await?.items)
    }

    /// Walk the listing, also reporting whether the records were displayed
    /// and whether pages remain
    ///
    /// # Errors
    ///
    /// A failing fetch aborts the run with [`Error::FetchFailed`].
    pub async fn run_to_outcome(&mut self, first_page: Page, mode: FetchMode) -> Result<Outcome> {
        let mut state = PaginationState::new(first_page, mode);

        if state.is_exhausted() {
            return Ok(finish(state, false));
        }

        match mode {
            FetchMode::All => {
                self.drain(&mut state).await?;
                Ok(finish(state, false))
            }
            FetchMode::SinglePage => Ok(finish(state, false)),
            FetchMode::Interactive => self.interact(state).await,
        }
    }

    async fn interact(&mut self, mut state: PaginationState) -> Result<Outcome> {
        let mut step = Step::ShowingPage { from: 0 };

        loop {
            step = match step {
                Step::ShowingPage { from } => {
                    self.display(&state.items()[from..])?;
                    if state.is_exhausted() {
                        Step::Done
                    } else {
                        Step::WaitingForChoice
                    }
                }
                Step::WaitingForChoice => {
                    self.sink.notice(&format!(
                        "\nShowing {} item(s). More pages available.",
                        state.items().len()
                    ));
                    let line = self.prompter.prompt(PROMPT)?;
                    match Choice::classify(&line) {
                        Choice::Next => match state.cursor().cloned() {
                            Some(cursor) => {
                                let from = self.fetch_into(&mut state, &cursor).await?;
                                Step::ShowingPage { from }
                            }
                            None => Step::Done,
                        },
                        Choice::All => {
                            self.drain(&mut state).await?;
                            Step::ShowingPage { from: 0 }
                        }
                        Choice::Quit => Step::Done,
                        Choice::Invalid(input) => {
                            debug!(%input, "Ignoring pagination input");
                            self.sink.notice(INVALID_CHOICE);
                            Step::WaitingForChoice
                        }
                    }
                }
                Step::Done => break,
            };
        }

        Ok(finish(state, true))
    }

    /// Fetch until the cursor runs out
    async fn drain(&mut self, state: &mut PaginationState) -> Result<()> {
        while let Some(cursor) = state.cursor().cloned() {
            self.sink.notice(&format!(
                "Loading more items... ({} so far)",
                state.items().len()
            ));
            self.fetch_into(state, &cursor).await?;
        }
        Ok(())
    }

    async fn fetch_into(&self, state: &mut PaginationState, cursor: &Cursor) -> Result<usize> {
        debug!(%cursor, "Fetching next page");
        let page = self
            .fetcher
            .fetch(cursor)
            .await
            .map_err(|e| Error::fetch_failed(state.items().len(), e))?;
        Ok(state.absorb(page))
    }

    fn display(&mut self, items: &[Record]) -> Result<()> {
        let rendered = self.renderer.render(items, self.format)?;
        self.sink.show(&rendered);
        Ok(())
    }
}

fn finish(state: PaginationState, displayed: bool) -> Outcome {
    let more_available = !state.is_exhausted();
    Outcome {
        items: state.into_items(),
        displayed,
        more_available,
    }
}
