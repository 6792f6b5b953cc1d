// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Basecamp CLI
//!
//! A command-line client for the Basecamp 3 API.
//!
//! ## Features
//!
//! - **OAuth2 sign-in**: Launchpad web-server flow with a localhost redirect
//!   listener, token refresh, and per-account token storage
//! - **Resource commands**: projects, to-dos, recordings, people, search
//! - **Pagination**: Link-header and page-number listings, fetched all at
//!   once, one page at a time on demand, or first page only
//! - **Output**: JSON, aligned tables, or `key: value` text
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use basecamp_cli::api::BasecampClient;
//! use basecamp_cli::config::Config;
//! use basecamp_cli::output::render_records;
//! use basecamp_cli::pagination::{FetchMode, PaginationEngine};
//!
//! let config = Config::new()?;
//! let client = BasecampClient::for_account(&config, 999_999)?;
//! let projects = client.projects();
//! let first = projects.first_page().await?;
//! let items = PaginationEngine::new(&projects, &renderer, format, &mut prompter, &mut sink)
//!     .run(first, FetchMode::All)
//!     .await?;
//! println!("{}", render_records(&items, format)?);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CLI (clap)                            │
//! │  configure · auth · projects · todos · recordings · search  │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬───────────┬──────┴────────┬───────────┬──────────┐
//! │   Auth   │   HTTP    │   Paginate    │    API    │  Output  │
//! ├──────────┼───────────┼───────────────┼───────────┼──────────┤
//! │ OAuth2   │ Retry     │ Link header   │ Projects  │ JSON     │
//! │ Refresh  │ Rate Limit│ Page number   │ Todos     │ Table    │
//! │ Tokens   │ Backoff   │ Engine        │ People    │ Plain    │
//! └──────────┴───────────┴───────────────┴───────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration directory and settings file
pub mod config;

/// OAuth2, token storage and request authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination engine and strategies
pub mod pagination;

/// Basecamp 3 endpoints
pub mod api;

/// JSON, table and plain text rendering
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use api::BasecampClient;
pub use pagination::{FetchMode, PaginationEngine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
