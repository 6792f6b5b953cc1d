//! Request types for the Basecamp API

use crate::types::JsonValue;
use serde::Serialize;
use std::fmt;

/// Kinds of recording accepted by the recordings endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordingType {
    #[value(name = "Comment")]
    Comment,
    #[value(name = "Document")]
    Document,
    #[value(name = "Kanban::Card")]
    KanbanCard,
    #[value(name = "Kanban::Step")]
    KanbanStep,
    #[value(name = "Message")]
    Message,
    #[value(name = "Question::Answer")]
    QuestionAnswer,
    #[value(name = "Schedule::Entry")]
    ScheduleEntry,
    #[value(name = "Todo")]
    Todo,
    #[value(name = "Todolist")]
    Todolist,
    #[value(name = "Upload")]
    Upload,
    #[value(name = "Vault")]
    Vault,
}

impl RecordingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "Comment",
            Self::Document => "Document",
            Self::KanbanCard => "Kanban::Card",
            Self::KanbanStep => "Kanban::Step",
            Self::Message => "Message",
            Self::QuestionAnswer => "Question::Answer",
            Self::ScheduleEntry => "Schedule::Entry",
            Self::Todo => "Todo",
            Self::Todolist => "Todolist",
            Self::Upload => "Upload",
            Self::Vault => "Vault",
        }
    }
}

impl fmt::Display for RecordingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RecordingStatus {
    #[default]
    Active,
    Archived,
    Trashed,
}

impl RecordingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Trashed => "trashed",
        }
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field recordings are sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortField {
    #[default]
    #[value(name = "created_at")]
    CreatedAt,
    #[value(name = "updated_at")]
    UpdatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filters for listing recordings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingsQuery {
    pub recording_type: RecordingType,
    /// Project ids, comma separated
    pub bucket: Option<String>,
    pub status: RecordingStatus,
    pub sort: SortField,
    pub direction: Direction,
}

impl RecordingsQuery {
    /// Active recordings of one type, newest first
    pub fn new(recording_type: RecordingType) -> Self {
        Self {
            recording_type,
            bucket: None,
            status: RecordingStatus::default(),
            sort: SortField::default(),
            direction: Direction::default(),
        }
    }
}

/// Parameters of a full-text search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub recording_type: Option<String>,
    pub bucket_id: Option<u64>,
    pub creator_id: Option<u64>,
    pub file_type: Option<String>,
    pub exclude_chat: bool,
    /// First page to fetch, 1-based
    pub page: u32,
    pub per_page: u32,
}

impl SearchQuery {
    pub const DEFAULT_PER_PAGE: u32 = 50;

    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            recording_type: None,
            bucket_id: None,
            creator_id: None,
            file_type: None,
            exclude_chat: false,
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// Someone to invite while granting project access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub email_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Changes to who can see a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessChange {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grant: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub revoke: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<NewPerson>,
}

impl AccessChange {
    pub fn is_empty(&self) -> bool {
        self.grant.is_empty() && self.revoke.is_empty() && self.create.is_empty()
    }

    /// Request body
    pub fn to_json(&self) -> crate::Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}
