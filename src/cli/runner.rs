//! CLI runner - executes commands

use super::commands::{
    Cli, Commands, ListArgs, OutputArgs, PeopleCommand, ProjectsCommand, RecordingTarget,
    RecordingsCommand, TodosCommand,
};
use super::listing::{more_results_hint, show_listing, MORE_ITEMS_HINT};
use crate::api::{
    AccessChange, BasecampClient, LinkPagedList, NewPerson, RecordingStatus, RecordingsQuery,
    SearchQuery,
};
use crate::auth::{
    callback_address, mask_token, wait_for_code, OAuthClient, TokenStore, CALLBACK_TIMEOUT,
};
use crate::config::{Config, DEFAULT_REDIRECT_URI, OOB_REDIRECT_URI};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClientConfig;
use crate::output::render;
use crate::pagination::{TerminalPrompter, TerminalSink};
use crate::types::{parse_id_list, JsonObject, JsonValue, OptionStringExt, OutputFormat};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
    config: Option<Config>,
    http_config: HttpClientConfig,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            config: None,
            http_config: HttpClientConfig::default(),
        }
    }

    /// Use this configuration instead of the default directory
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this transport configuration for API calls
    pub fn with_http_config(mut self, http_config: HttpClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Configure {
                client_id,
                client_secret,
                redirect_uri,
            } => self.configure(client_id.clone(), client_secret.clone(), redirect_uri),
            Commands::ConfigPath => self.config_path(),
            Commands::Auth { account_id, manual } => self.auth(*account_id, *manual).await,
            Commands::Logout { account_id } => self.logout(*account_id),
            Commands::Tokens { show_full, output } => self.tokens(*show_full, output),
            Commands::Projects(command) => self.projects(command).await,
            Commands::Todos(command) => self.todos(command).await,
            Commands::Recordings(command) => self.recordings(command).await,
            Commands::People(command) => self.people(command).await,
            Commands::SearchMetadata { output } => {
                let client = self.client(output.account_id)?;
                print_value(&client.search_metadata().await?, output.format)
            }
            Commands::Search {
                query,
                recording_type,
                bucket_id,
                creator_id,
                file_type,
                exclude_chat,
                page,
                per_page,
                list,
            } => {
                let query = SearchQuery {
                    query: query.clone(),
                    recording_type: recording_type.clone().none_if_empty(),
                    bucket_id: *bucket_id,
                    creator_id: *creator_id,
                    file_type: file_type.clone().none_if_empty(),
                    exclude_chat: *exclude_chat,
                    page: *page,
                    per_page: *per_page,
                };
                self.search(query, list).await
            }
        }
    }

    fn config(&self) -> Result<Config> {
        match &self.config {
            Some(config) => Ok(config.clone()),
            None => Config::new(),
        }
    }

    fn client(&self, account_id: Option<u64>) -> Result<BasecampClient> {
        let config = self.config()?;
        let account_id = config.resolve_account_id(account_id)?;
        BasecampClient::for_account_with(&config, account_id, self.http_config.clone())
    }

    // ========================================================================
    // Configuration and authentication
    // ========================================================================

    fn configure(
        &self,
        client_id: Option<String>,
        client_secret: Option<String>,
        redirect_uri: &str,
    ) -> Result<()> {
        let config = self.config()?;
        let client_id = required(client_id, "client_id", "OAuth2 Client ID")?;
        let client_secret = required(client_secret, "client_secret", "OAuth2 Client Secret")?;

        let mut redirect_uri = redirect_uri.to_string();
        if redirect_uri == OOB_REDIRECT_URI {
            eprintln!("Warning: OOB redirect URI has known browser compatibility issues.");
            eprintln!("   Modern browsers cannot handle 'urn:' scheme redirects.");
            eprintln!("   Recommended: Use '{DEFAULT_REDIRECT_URI}' instead.");
            if !confirm("\nDo you want to continue with OOB anyway?")? {
                redirect_uri = DEFAULT_REDIRECT_URI.to_string();
                println!("Using recommended redirect URI: {redirect_uri}");
            }
        }

        config.configure_oauth(client_id, client_secret, redirect_uri.as_str())?;
        println!("OAuth2 configuration saved successfully!");
        println!("Configuration stored in: {}", config.file().display());

        if redirect_uri.starts_with("http://localhost") {
            println!("\nNext steps:");
            println!("   1. Register this redirect URI in Basecamp Launchpad:");
            println!("      {redirect_uri}");
            println!("   2. Run 'basecamp auth' and approve access in the browser");
            println!("   3. Use 'basecamp auth --manual' to paste the code yourself instead");
        }
        Ok(())
    }

    fn config_path(&self) -> Result<()> {
        let config = self.config()?;
        println!("Configuration directory: {}", config.dir().display());
        println!("Configuration file: {}", config.file().display());
        if config.exists() {
            println!("✓ Configuration file exists");
        } else {
            println!("✗ Configuration file does not exist (run 'basecamp configure' first)");
        }
        Ok(())
    }

    async fn auth(&self, account_id: Option<u64>, manual: bool) -> Result<()> {
        let config = self.config()?;
        let settings = config.oauth().ok_or(Error::OAuthNotConfigured)?;

        if let Some(id) = account_id {
            config.set_account_id(id)?;
            println!("Account ID {id} saved as default.");
        }
        let account_id = account_id.or_else(|| config.account_id());

        let redirect_uri = settings.redirect_uri.clone();
        let oob = settings.is_oob();
        let oauth = OAuthClient::new(settings);
        let auth_url = oauth.authorization_url(account_id)?;

        let listener = match callback_address(&redirect_uri) {
            Some(addr) if !manual && !oob => Some(
                TcpListener::bind(addr)
                    .await
                    .with_context(|| format!("Could not listen on {addr}"))?,
            ),
            _ => None,
        };

        println!("Opening browser for authentication...");
        println!("If browser doesn't open, visit: {auth_url}");
        if let Err(e) = open::that(&auth_url) {
            warn!("Could not open browser: {e}");
        }

        let code = match listener {
            Some(listener) => {
                println!("\nWaiting for the redirect on {redirect_uri} ...");
                wait_for_code(listener, CALLBACK_TIMEOUT).await?
            }
            None => {
                if oob {
                    println!("\nOOB redirect flow: the browser cannot follow 'urn:' redirects.");
                    println!("   Look for '?code=...' in the page URL, content or console.");
                    println!("   Recommended: switch to {DEFAULT_REDIRECT_URI}.");
                } else {
                    println!("\nAfter authorizing, you'll be redirected to: {redirect_uri}");
                    println!("Check the redirect URL for the 'code' parameter.");
                }
                required(None, "code", "Enter the authorization code from the redirect URL")?
            }
        };

        let response = oauth.exchange_code(&code).await?;
        let store = TokenStore::for_config(&config, account_id);
        store.store_response(response)?;
        info!(
            account = store.account_key(),
            backend = store.backend_name(),
            "Stored new tokens"
        );
        println!("Authentication successful! Tokens stored securely.");
        Ok(())
    }

    fn logout(&self, account_id: Option<u64>) -> Result<()> {
        let config = self.config()?;
        let store = TokenStore::for_config(&config, account_id.or_else(|| config.account_id()));
        if store.clear()? {
            println!("Logged out successfully. Tokens cleared.");
        } else {
            println!("No stored tokens for account {}.", store.account_key());
        }
        Ok(())
    }

    fn tokens(&self, show_full: bool, output: &OutputArgs) -> Result<()> {
        let config = self.config()?;
        let store = TokenStore::for_config(
            &config,
            output.account_id.or_else(|| config.account_id()),
        );
        let tokens = store.get()?.ok_or_else(|| {
            Error::Other("No tokens found. Run 'basecamp auth' to authenticate.".to_string())
        })?;

        let refresh_token = tokens.refresh_token.clone().unwrap_or_default();
        let (access, refresh) = if show_full {
            (
                Some(tokens.access_token.clone()),
                refresh_token.none_if_empty(),
            )
        } else {
            (mask_token(&tokens.access_token), mask_token(&refresh_token))
        };

        let mut data = JsonObject::new();
        data.insert("account_id".into(), json!(store.account_key()));
        data.insert(
            "has_access_token".into(),
            json!(!tokens.access_token.is_empty()),
        );
        data.insert(
            "has_refresh_token".into(),
            json!(tokens.refresh_token.as_deref().is_some_and(|t| !t.is_empty())),
        );
        data.insert("is_expired".into(), json!(tokens.is_expired()));
        data.insert("expires_at".into(), json!(tokens.expires_at));
        data.insert("access_token".into(), json!(access));
        data.insert("refresh_token".into(), json!(refresh));

        print_value(&JsonValue::Object(data), output.format)
    }

    // ========================================================================
    // Projects
    // ========================================================================

    async fn projects(&self, command: &ProjectsCommand) -> Result<()> {
        match command {
            ProjectsCommand::List { list } => {
                let client = self.client(list.output.account_id)?;
                list_link_paged(&client.projects(), list).await
            }
            ProjectsCommand::Get { project_id, output } => {
                let client = self.client(output.account_id)?;
                print_value(&client.project(*project_id).await?, output.format)
            }
            ProjectsCommand::Create {
                name,
                description,
                output,
            } => {
                let client = self.client(output.account_id)?;
                let name = required(name.clone(), "name", "Project name")?;
                let project = client
                    .create_project(&name, description.as_deref())
                    .await?;
                print_value(&project, output.format)
            }
            ProjectsCommand::Update {
                project_id,
                name,
                description,
                output,
            } => {
                let client = self.client(output.account_id)?;
                let project = client
                    .update_project(*project_id, name.as_deref(), description.as_deref())
                    .await?;
                print_value(&project, output.format)
            }
            ProjectsCommand::Delete {
                project_id,
                yes,
                output,
            } => {
                let client = self.client(output.account_id)?;
                if !yes && !confirm("Are you sure you want to delete this project?")? {
                    return Err(Error::Aborted);
                }
                client.delete_project(*project_id).await?;
                let status = json!({
                    "status": "deleted",
                    "project_id": project_id,
                    "message": format!("Project {project_id} deleted successfully"),
                });
                print_value(&status, output.format)
            }
        }
    }

    // ========================================================================
    // Todos
    // ========================================================================

    async fn todos(&self, command: &TodosCommand) -> Result<()> {
        match command {
            TodosCommand::List {
                project_id,
                todo_set_id,
                list,
            } => {
                let client = self.client(list.output.account_id)?;
                list_link_paged(&client.todos(*project_id, *todo_set_id), list).await
            }
            TodosCommand::Create {
                project_id,
                todo_set_id,
                content,
                assignee_ids,
                output,
            } => {
                let assignees = match assignee_ids.as_deref() {
                    Some(raw) => parse_id_list("assignee_ids", raw)?,
                    None => Vec::new(),
                };
                let client = self.client(output.account_id)?;
                let content = required(content.clone(), "content", "Todo content")?;
                let todo = client
                    .create_todo(*project_id, *todo_set_id, &content, &assignees)
                    .await?;
                print_value(&todo, output.format)
            }
        }
    }

    // ========================================================================
    // Recordings
    // ========================================================================

    async fn recordings(&self, command: &RecordingsCommand) -> Result<()> {
        match command {
            RecordingsCommand::List {
                recording_type,
                bucket,
                status,
                sort,
                direction,
                list,
            } => {
                let client = self.client(list.output.account_id)?;
                let query = RecordingsQuery {
                    recording_type: *recording_type,
                    bucket: bucket.clone().none_if_empty(),
                    status: *status,
                    sort: *sort,
                    direction: *direction,
                };
                list_link_paged(&client.recordings(&query), list).await
            }
            RecordingsCommand::Trash(target) => {
                self.set_recording_status(target, RecordingStatus::Trashed, "trashed")
                    .await
            }
            RecordingsCommand::Archive(target) => {
                self.set_recording_status(target, RecordingStatus::Archived, "archived")
                    .await
            }
            RecordingsCommand::Unarchive(target) => {
                self.set_recording_status(target, RecordingStatus::Active, "unarchived")
                    .await
            }
        }
    }

    async fn set_recording_status(
        &self,
        target: &RecordingTarget,
        status: RecordingStatus,
        verb: &str,
    ) -> Result<()> {
        let client = self.client(target.output.account_id)?;
        client
            .set_recording_status(target.project_id, target.recording_id, status)
            .await?;
        let result = json!({
            "status": status.as_str(),
            "project_id": target.project_id,
            "recording_id": target.recording_id,
            "message": format!("Recording {} {verb} successfully", target.recording_id),
        });
        print_value(&result, target.output.format)
    }

    // ========================================================================
    // People
    // ========================================================================

    async fn people(&self, command: &PeopleCommand) -> Result<()> {
        match command {
            PeopleCommand::List { project_id, list } => {
                let client = self.client(list.output.account_id)?;
                let people = match project_id {
                    Some(id) => client.project_people(*id),
                    None => client.people(),
                };
                list_link_paged(&people, list).await
            }
            PeopleCommand::Get { person_id, output } => {
                let client = self.client(output.account_id)?;
                print_value(&client.person(*person_id).await?, output.format)
            }
            PeopleCommand::Profile { output } => {
                let client = self.client(output.account_id)?;
                print_value(&client.my_profile().await?, output.format)
            }
            PeopleCommand::Pingable { output } => {
                let client = self.client(output.account_id)?;
                let people = client.pingable_people().await?;
                println!("{}", crate::output::render_records(&people, output.format)?);
                Ok(())
            }
            PeopleCommand::GrantAccess {
                project_id,
                grant_ids,
                revoke_ids,
                create,
                output,
            } => {
                let change = access_change(
                    grant_ids.as_deref(),
                    revoke_ids.as_deref(),
                    create.as_deref(),
                )?;
                let client = self.client(output.account_id)?;
                let result = client.update_project_access(*project_id, &change).await?;
                print_value(&result, output.format)
            }
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    async fn search(&self, query: SearchQuery, list: &ListArgs) -> Result<()> {
        let client = self.client(list.output.account_id)?;
        let hint = more_results_hint(query.page.saturating_add(1));
        let pages = client.search(query)?;
        let first = pages.first_page().await?;
        show_listing(
            &pages,
            first,
            list.output.format,
            list.all_pages,
            &hint,
            &mut TerminalPrompter,
            &mut TerminalSink,
        )
        .await?;
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn list_link_paged(list: &LinkPagedList<'_>, args: &ListArgs) -> Result<()> {
    let first = list.first_page().await?;
    let outcome = show_listing(
        list,
        first,
        args.output.format,
        args.all_pages,
        MORE_ITEMS_HINT,
        &mut TerminalPrompter,
        &mut TerminalSink,
    )
    .await?;
    debug!(path = list.path(), items = outcome.items.len(), "Listing done");
    Ok(())
}

fn print_value(value: &JsonValue, format: OutputFormat) -> Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// The given value, or one read from the terminal
fn required(value: Option<String>, field: &str, prompt: &str) -> Result<String> {
    if let Some(value) = value.none_if_empty() {
        return Ok(value);
    }
    let answer = TerminalPrompter
        .read_line(prompt)?
        .ok_or(Error::Aborted)?
        .trim()
        .to_string();
    answer
        .none_if_empty()
        .ok_or_else(|| Error::invalid_argument(field, "a value is required"))
}

/// Ask a yes/no question; anything but `y`/`yes` is no
fn confirm(question: &str) -> Result<bool> {
    let answer = TerminalPrompter
        .read_line(&format!("{question} [y/N]"))?
        .unwrap_or_default();
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Build an access change from the raw `grant-access` options
pub(crate) fn access_change(
    grant_ids: Option<&str>,
    revoke_ids: Option<&str>,
    create: Option<&str>,
) -> Result<AccessChange> {
    let grant = grant_ids
        .map(|raw| parse_id_list("grant_ids", raw))
        .transpose()?
        .unwrap_or_default();
    let revoke = revoke_ids
        .map(|raw| parse_id_list("revoke_ids", raw))
        .transpose()?
        .unwrap_or_default();
    let create = match create.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => parse_new_people(raw)?,
        None => Vec::new(),
    };

    let change = AccessChange {
        grant,
        revoke,
        create,
    };
    if change.is_empty() {
        return Err(Error::invalid_argument(
            "grant_access",
            "At least one of --grant-ids, --revoke-ids, or --create must be provided",
        ));
    }
    Ok(change)
}

fn parse_new_people(raw: &str) -> Result<Vec<NewPerson>> {
    let value: JsonValue = serde_json::from_str(raw)
        .map_err(|e| Error::invalid_argument("create", format!("Invalid JSON in --create: {e}")))?;
    if !value.is_array() {
        return Err(Error::invalid_argument(
            "create",
            "--create must be a JSON array",
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| Error::invalid_argument("create", format!("Invalid person in --create: {e}")))
}
