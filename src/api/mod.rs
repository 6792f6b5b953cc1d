//! Basecamp 3 API
//!
//! Endpoint wrappers for projects, todos, recordings, people and search,
//! all scoped to one account.

mod client;
mod lists;
mod types;

pub use client::BasecampClient;
pub use lists::{LinkPagedList, SearchPages};
pub use types::{
    AccessChange, Direction, NewPerson, RecordingStatus, RecordingType, RecordingsQuery,
    SearchQuery, SortField,
};
