//! CLI commands and argument parsing

use crate::api::{Direction, RecordingStatus, RecordingType, SortField};
use crate::types::OutputFormat;
use clap::{Args, Parser, Subcommand};

/// Basecamp 3 command-line client
#[derive(Parser, Debug)]
#[command(name = "basecamp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Account and output options shared by every API command
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Basecamp Account ID (uses configured default if not provided)
    #[arg(long)]
    pub account_id: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

/// Options shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// Automatically load all pages without interaction
    #[arg(long)]
    pub all_pages: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure OAuth2 application credentials
    Configure {
        /// Basecamp OAuth2 Client ID
        #[arg(long)]
        client_id: Option<String>,

        /// Basecamp OAuth2 Client Secret
        #[arg(long)]
        client_secret: Option<String>,

        /// OAuth2 redirect URI
        #[arg(long, default_value = crate::config::DEFAULT_REDIRECT_URI)]
        redirect_uri: String,
    },

    /// Show where configuration is stored
    ConfigPath,

    /// Authenticate with Basecamp using OAuth2
    Auth {
        /// Basecamp Account ID, saved as the default
        #[arg(long)]
        account_id: Option<u64>,

        /// Paste the authorization code instead of listening for the redirect
        #[arg(long)]
        manual: bool,
    },

    /// Clear stored tokens
    Logout {
        /// Basecamp Account ID (uses configured default if not provided)
        #[arg(long)]
        account_id: Option<u64>,
    },

    /// Show stored tokens
    Tokens {
        /// Show full token values (default: masked)
        #[arg(long)]
        show_full: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// Manage to-dos
    #[command(subcommand)]
    Todos(TodosCommand),

    /// Browse and change recordings
    #[command(subcommand)]
    Recordings(RecordingsCommand),

    /// Manage people
    #[command(subcommand)]
    People(PeopleCommand),

    /// Show the filters accepted by search
    SearchMetadata {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Full-text search across the account
    Search {
        /// Search terms
        query: String,

        /// Filter by recording type (see `basecamp search-metadata`)
        #[arg(long = "type")]
        recording_type: Option<String>,

        /// Filter by project ID
        #[arg(long)]
        bucket_id: Option<u64>,

        /// Filter by creator person ID
        #[arg(long)]
        creator_id: Option<u64>,

        /// Filter attachments by type (see `basecamp search-metadata`)
        #[arg(long)]
        file_type: Option<String>,

        /// Exclude chat results
        #[arg(long)]
        exclude_chat: bool,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Results per page
        #[arg(long, default_value_t = crate::api::SearchQuery::DEFAULT_PER_PAGE)]
        per_page: u32,

        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// List all projects
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one project
    Get {
        project_id: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Create a project
    Create {
        /// Project name (prompted when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Project description
        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rename or re-describe a project
    Update {
        project_id: u64,

        /// New project name
        #[arg(long)]
        name: Option<String>,

        /// New project description
        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete a project
    Delete {
        project_id: u64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum TodosCommand {
    /// List to-dos in a to-do set
    List {
        #[arg(long)]
        project_id: u64,

        #[arg(long)]
        todo_set_id: u64,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Create a to-do
    Create {
        #[arg(long)]
        project_id: u64,

        #[arg(long)]
        todo_set_id: u64,

        /// To-do content (prompted when omitted)
        #[arg(long)]
        content: Option<String>,

        /// Comma-separated list of assignee person IDs
        #[arg(long)]
        assignee_ids: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecordingsCommand {
    /// List recordings of one type
    List {
        #[arg(long = "type", value_enum)]
        recording_type: RecordingType,

        /// Single or comma-separated list of project IDs
        #[arg(long)]
        bucket: Option<String>,

        #[arg(long, value_enum, default_value_t = RecordingStatus::Active)]
        status: RecordingStatus,

        #[arg(long, value_enum, default_value_t = SortField::CreatedAt)]
        sort: SortField,

        #[arg(long, value_enum, default_value_t = Direction::Desc)]
        direction: Direction,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Move a recording to the trash
    Trash(RecordingTarget),

    /// Archive a recording
    Archive(RecordingTarget),

    /// Restore an archived or trashed recording
    Unarchive(RecordingTarget),
}

/// A recording addressed by project and id
#[derive(Args, Debug, Clone)]
pub struct RecordingTarget {
    pub project_id: u64,

    pub recording_id: u64,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand, Debug)]
pub enum PeopleCommand {
    /// List people in the account, or on one project
    List {
        /// Only people on this project
        #[arg(long)]
        project_id: Option<u64>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one person
    Get {
        person_id: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the authenticated user
    Profile {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List people who can be pinged
    Pingable {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Grant or revoke project access, or invite new people
    GrantAccess {
        project_id: u64,

        /// Comma-separated list of person IDs to grant access to
        #[arg(long)]
        grant_ids: Option<String>,

        /// Comma-separated list of person IDs to revoke access from
        #[arg(long)]
        revoke_ids: Option<String>,

        /// JSON array of new people, each with `name` and `email_address`
        /// and optionally `title` and `company_name`
        #[arg(long)]
        create: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}
