//! Pagination types and traits
//!
//! Defines the core pagination abstractions shared by the engine, the API
//! fetchers and the CLI.

use crate::error::Result;
use crate::types::{OutputFormat, Record};
use async_trait::async_trait;
use std::fmt;

/// Where the next page lives
///
/// Link-paged endpoints hand back a fully qualified URL; search hands back
/// a page number. The engine only checks for presence and passes the cursor
/// back to the fetcher that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// `Link: <url>; rel="next"`
    Url(String),
    /// 1-based page number
    Page(u32),
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Page(page) => write!(f, "page {page}"),
        }
    }
}

/// One fetched page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records in server order
    pub items: Vec<Record>,
    /// Cursor of the following page, absent on the last page
    pub next: Option<Cursor>,
}

impl Page {
    /// Create a page
    pub fn new(items: Vec<Record>, next: Option<Cursor>) -> Self {
        Self { items, next }
    }

    /// Create the final page of a listing
    pub fn last(items: Vec<Record>) -> Self {
        Self { items, next: None }
    }

    /// Whether another page follows
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// How a list command walks its pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Fetch every page, render once at the end
    All,
    /// Show a page at a time and ask the user what to do next
    Interactive,
    /// Only the first page
    SinglePage,
}

impl FetchMode {
    /// `--all-pages` wins; otherwise tables page interactively
    pub fn from_flags(all_pages: bool, format: OutputFormat) -> Self {
        if all_pages {
            Self::All
        } else if format == OutputFormat::Table {
            Self::Interactive
        } else {
            Self::SinglePage
        }
    }
}

/// A classified answer to the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Empty input: load the next page
    Next,
    /// `a`: load everything that is left
    All,
    /// `q`: stop here
    Quit,
    /// Anything else
    Invalid(String),
}

impl Choice {
    /// Trim and lower-case the raw line, then match it
    pub fn classify(input: &str) -> Self {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "" => Self::Next,
            "a" => Self::All,
            "q" => Self::Quit,
            _ => Self::Invalid(normalized),
        }
    }
}

/// Accumulated state of one paginated listing
#[derive(Debug, Clone)]
pub struct PaginationState {
    items: Vec<Record>,
    cursor: Option<Cursor>,
    mode: FetchMode,
    pages_fetched: usize,
}

impl PaginationState {
    /// Start from the already-fetched first page
    pub fn new(first_page: Page, mode: FetchMode) -> Self {
        Self {
            items: first_page.items,
            cursor: first_page.next,
            mode,
            pages_fetched: 0,
        }
    }

    /// Every record gathered so far, in fetch order
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Cursor of the next page to fetch
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Mode this listing runs in
    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    /// Pages fetched after the first one
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// No cursor left
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_none()
    }

    /// Append a fetched page and move the cursor; returns the index where
    /// the new records start
    pub fn absorb(&mut self, page: Page) -> usize {
        let start = self.items.len();
        self.items.extend(page.items);
        self.cursor = page.next;
        self.pages_fetched += 1;
        start
    }

    /// Consume the state, yielding the records
    pub fn into_items(self) -> Vec<Record> {
        self.items
    }
}

/// Source of pages for one listing
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page a cursor points at
    async fn fetch(&self, cursor: &Cursor) -> Result<Page>;
}

/// Turns records into display text without touching them
pub trait Renderer: Send + Sync {
    /// Render a list of records
    fn render(&self, items: &[Record], format: OutputFormat) -> Result<String>;
}

/// Reads one line of interactive input
pub trait Prompter: Send {
    /// Show `message` and return the raw line typed in reply
    fn prompt(&mut self, message: &str) -> Result<String>;
}

/// Receives rendered output and status notices
pub trait DisplaySink: Send {
    /// Rendered records
    fn show(&mut self, rendered: &str);

    /// Progress or status line, kept off the data stream
    fn notice(&mut self, message: &str);
}
