//! CLI module
//!
//! Command-line interface for the Basecamp 3 API.
//!
//! # Commands
//!
//! - `configure` / `config-path` - OAuth2 application settings
//! - `auth` / `logout` / `tokens` - Sign in and manage stored tokens
//! - `projects`, `todos`, `recordings`, `people` - Resource commands
//! - `search` / `search-metadata` - Full-text search
//!
//! List commands share one flow: fetch the first page, then let the
//! pagination engine fetch more according to `--all-pages` and `--format`.

mod commands;
mod listing;
mod runner;

pub use commands::{
    Cli, Commands, ListArgs, OutputArgs, PeopleCommand, ProjectsCommand, RecordingTarget,
    RecordingsCommand, TodosCommand,
};
pub use listing::{more_results_hint, show_listing, MORE_ITEMS_HINT};
pub use runner::Runner;
