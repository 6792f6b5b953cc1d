//! Basecamp 3 API client
//!
//! Thin, account-scoped wrapper over [`HttpClient`]. Single resources come
//! back as JSON; collections come back as listings that the pagination
//! engine walks.

use super::lists::{into_records, LinkPagedList, SearchPages};
use super::types::{AccessChange, RecordingStatus, RecordingsQuery, SearchQuery};
use crate::auth::{Authenticator, OAuthClient, TokenStore};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::types::{JsonValue, Record};
use serde_json::json;
use tracing::debug;

/// Client bound to one Basecamp account
#[derive(Debug)]
pub struct BasecampClient {
    http: HttpClient,
    account_id: u64,
}

impl BasecampClient {
    /// Wrap an already configured HTTP client
    pub fn new(http: HttpClient, account_id: u64) -> Self {
        Self { http, account_id }
    }

    /// Client for `account_id` using the tokens stored for that account
    ///
    /// Expired tokens are refreshed when OAuth credentials are configured.
    pub fn for_account(config: &Config, account_id: u64) -> Result<Self> {
        Self::for_account_with(config, account_id, HttpClientConfig::default())
    }

    /// Same as [`BasecampClient::for_account`] with a custom transport
    pub fn for_account_with(
        config: &Config,
        account_id: u64,
        http_config: HttpClientConfig,
    ) -> Result<Self> {
        let store = TokenStore::for_config(config, Some(account_id));
        let authenticator = match config.oauth() {
            Some(settings) => Authenticator::with_refresh(store, OAuthClient::new(settings)),
            None => Authenticator::from_store(store),
        };
        debug!(account_id, base_url = %http_config.base_url, "Creating API client");
        let http = HttpClient::with_auth(http_config, authenticator)?;
        Ok(Self::new(http, account_id))
    }

    /// Account every request is scoped to
    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!("/{}/{}", self.account_id, path.trim_start_matches('/'))
    }

    fn list(&self, path: &str) -> LinkPagedList<'_> {
        LinkPagedList::new(&self.http, self.endpoint(path), RequestConfig::new())
    }

    async fn get_json(&self, path: &str) -> Result<JsonValue> {
        Ok(self
            .http
            .get(&self.endpoint(path), RequestConfig::new())
            .await?
            .body)
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub fn projects(&self) -> LinkPagedList<'_> {
        self.list("projects.json")
    }

    pub async fn project(&self, project_id: u64) -> Result<JsonValue> {
        self.get_json(&format!("projects/{project_id}.json")).await
    }

    pub async fn create_project(&self, name: &str, description: Option<&str>) -> Result<JsonValue> {
        let mut body = json!({ "name": name });
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            body["description"] = json!(description);
        }
        Ok(self
            .http
            .post(&self.endpoint("projects.json"), body)
            .await?
            .body)
    }

    /// Rename or re-describe a project; at least one change is required
    pub async fn update_project(
        &self,
        project_id: u64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<JsonValue> {
        let mut body = serde_json::Map::new();
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            body.insert("description".to_string(), json!(description));
        }
        if body.is_empty() {
            return Err(Error::invalid_argument(
                "name/description",
                "At least one of --name or --description must be provided",
            ));
        }
        Ok(self
            .http
            .put(
                &self.endpoint(&format!("projects/{project_id}.json")),
                Some(JsonValue::Object(body)),
            )
            .await?
            .body)
    }

    pub async fn delete_project(&self, project_id: u64) -> Result<()> {
        self.http
            .delete(&self.endpoint(&format!("projects/{project_id}.json")))
            .await?;
        Ok(())
    }

    // ========================================================================
    // Todos
    // ========================================================================

    pub fn todos(&self, project_id: u64, todo_set_id: u64) -> LinkPagedList<'_> {
        self.list(&format!(
            "projects/{project_id}/todosets/{todo_set_id}/todos.json"
        ))
    }

    pub async fn create_todo(
        &self,
        project_id: u64,
        todo_set_id: u64,
        content: &str,
        assignee_ids: &[u64],
    ) -> Result<JsonValue> {
        let mut body = json!({ "content": content });
        if !assignee_ids.is_empty() {
            body["assignee_ids"] = json!(assignee_ids);
        }
        let path = self.endpoint(&format!(
            "projects/{project_id}/todosets/{todo_set_id}/todos.json"
        ));
        Ok(self.http.post(&path, body).await?.body)
    }

    // ========================================================================
    // Recordings
    // ========================================================================

    pub fn recordings(&self, query: &RecordingsQuery) -> LinkPagedList<'_> {
        let request = RequestConfig::new()
            .query("type", query.recording_type.as_str())
            .query_opt("bucket", query.bucket.as_deref().filter(|b| !b.is_empty()))
            .query("status", query.status.as_str())
            .query("sort", query.sort.as_str())
            .query("direction", query.direction.as_str());
        LinkPagedList::new(
            &self.http,
            self.endpoint("projects/recordings.json"),
            request,
        )
    }

    /// Move a recording to the trash, the archive, or back to active
    pub async fn set_recording_status(
        &self,
        project_id: u64,
        recording_id: u64,
        status: RecordingStatus,
    ) -> Result<()> {
        let path = self.endpoint(&format!(
            "buckets/{project_id}/recordings/{recording_id}/status/{}.json",
            status.as_str()
        ));
        self.http.put(&path, None).await?;
        Ok(())
    }

    // ========================================================================
    // People
    // ========================================================================

    pub fn people(&self) -> LinkPagedList<'_> {
        self.list("people.json")
    }

    pub fn project_people(&self, project_id: u64) -> LinkPagedList<'_> {
        self.list(&format!("projects/{project_id}/people.json"))
    }

    pub async fn person(&self, person_id: u64) -> Result<JsonValue> {
        self.get_json(&format!("people/{person_id}.json")).await
    }

    pub async fn my_profile(&self) -> Result<JsonValue> {
        self.get_json("my/profile.json").await
    }

    /// Everyone who can be pinged; this endpoint is not paginated
    pub async fn pingable_people(&self) -> Result<Vec<Record>> {
        let path = self.endpoint("circles/people.json");
        let body = self.get_json("circles/people.json").await?;
        Ok(into_records(body, &path))
    }

    pub async fn update_project_access(
        &self,
        project_id: u64,
        change: &AccessChange,
    ) -> Result<JsonValue> {
        if change.is_empty() {
            return Err(Error::invalid_argument(
                "grant_access",
                "At least one of --grant-ids, --revoke-ids, or --create must be provided",
            ));
        }
        let path = self.endpoint(&format!("projects/{project_id}/people/users.json"));
        Ok(self.http.put(&path, Some(change.to_json()?)).await?.body)
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub async fn search_metadata(&self) -> Result<JsonValue> {
        self.get_json("searches/metadata.json").await
    }

    pub fn search(&self, query: SearchQuery) -> Result<SearchPages<'_>> {
        if query.query.trim().is_empty() {
            return Err(Error::invalid_argument("query", "must not be empty"));
        }
        if query.page == 0 {
            return Err(Error::invalid_argument("page", "pages start at 1"));
        }
        if query.per_page == 0 {
            return Err(Error::invalid_argument("per-page", "must be at least 1"));
        }
        Ok(SearchPages::new(
            &self.http,
            self.endpoint("search.json"),
            query,
        ))
    }
}
