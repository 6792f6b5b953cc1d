//! Paged listings
//!
//! Each listing knows how to fetch its first page and implements
//! [`PageFetcher`] for the rest.

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{next_link, next_page_number, Cursor, Page, PageFetcher};
use crate::types::{JsonValue, Record};
use async_trait::async_trait;
use tracing::warn;

use super::types::SearchQuery;

/// A collection paged through the `Link` header
#[derive(Debug)]
pub struct LinkPagedList<'a> {
    http: &'a HttpClient,
    path: String,
    request: RequestConfig,
}

impl<'a> LinkPagedList<'a> {
    pub(crate) fn new(http: &'a HttpClient, path: String, request: RequestConfig) -> Self {
        Self {
            http,
            path,
            request,
        }
    }

    /// Path of the first page, relative to the API root
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch the first page
    pub async fn first_page(&self) -> Result<Page> {
        let response = self.http.get(&self.path, self.request.clone()).await?;
        Ok(Page::new(
            into_records(response.body, &self.path),
            next_link(&response.headers),
        ))
    }
}

#[async_trait]
impl PageFetcher for LinkPagedList<'_> {
    async fn fetch(&self, cursor: &Cursor) -> Result<Page> {
        let Cursor::Url(url) = cursor else {
            return Err(Error::UnsupportedCursor {
                cursor: cursor.to_string(),
            });
        };
        // The next-page URL already carries the first request's query
        let response = self.http.get(url, RequestConfig::new()).await?;
        Ok(Page::new(
            into_records(response.body, url),
            next_link(&response.headers),
        ))
    }
}

/// Search results, paged by page number
#[derive(Debug)]
pub struct SearchPages<'a> {
    http: &'a HttpClient,
    path: String,
    query: SearchQuery,
}

impl<'a> SearchPages<'a> {
    pub(crate) fn new(http: &'a HttpClient, path: String, query: SearchQuery) -> Self {
        Self { http, path, query }
    }

    /// The search being run
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Fetch the page named in the query
    pub async fn first_page(&self) -> Result<Page> {
        self.fetch_page(self.query.page).await
    }

    async fn fetch_page(&self, page: u32) -> Result<Page> {
        let q = &self.query;
        let request = RequestConfig::new()
            .query("q", q.query.as_str())
            .query("page", page.to_string())
            .query("per_page", q.per_page.to_string())
            .query_opt("type", q.recording_type.as_deref())
            .query_opt("bucket_id", q.bucket_id)
            .query_opt("creator_id", q.creator_id)
            .query_opt("file_type", q.file_type.as_deref())
            .query_opt("exclude_chat", q.exclude_chat.then_some(1));

        let response = self.http.get(&self.path, request).await?;
        let items = into_records(response.body, &self.path);
        let next = next_page_number(page, q.per_page, items.len());
        Ok(Page::new(items, next))
    }
}

#[async_trait]
impl PageFetcher for SearchPages<'_> {
    async fn fetch(&self, cursor: &Cursor) -> Result<Page> {
        match cursor {
            Cursor::Page(page) => self.fetch_page(*page).await,
            Cursor::Url(_) => Err(Error::UnsupportedCursor {
                cursor: cursor.to_string(),
            }),
        }
    }
}

/// Records of a list response; anything but an array is an empty page
pub(crate) fn into_records(body: JsonValue, source: &str) -> Vec<Record> {
    match body {
        JsonValue::Array(values) => values
            .into_iter()
            .filter_map(|value| match value {
                JsonValue::Object(map) => Some(map),
                other => {
                    warn!("Skipping non-object item in {source}: {other}");
                    None
                }
            })
            .collect(),
        JsonValue::Object(map) if map.is_empty() => Vec::new(),
        other => {
            warn!("Expected a list from {source}, got {}", type_name(&other));
            Vec::new()
        }
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
