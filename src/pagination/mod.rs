//! Pagination module
//!
//! Supports: Link header cursors and page numbers
//!
//! # Overview
//!
//! List commands fetch their first page, then hand it to the
//! [`PaginationEngine`], which fetches the rest all at once, one page at a
//! time under user control, or not at all, depending on the [`FetchMode`].
//! Fetching, rendering, prompting and display sit behind traits so the
//! engine runs the same against the terminal and in tests.

mod console;
mod engine;
mod strategies;
mod types;

pub use console::{RecordingSink, ScriptedPrompter, TerminalPrompter, TerminalSink};
pub use engine::{Outcome, PaginationEngine, INVALID_CHOICE, PROMPT};
pub use strategies::{next_link, next_page_number, parse_link_header};
pub use types::{
    Choice, Cursor, DisplaySink, FetchMode, Page, PageFetcher, PaginationState, Prompter,
    Renderer,
};
