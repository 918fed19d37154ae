//! Wikipedia-backed document store over the MediaWiki API.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{keyword_sentence, DocumentStore, ToolError};

const API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Document store backed by Wikipedia search + page extracts.
///
/// Remembers the last fetched extract for `lookup`, so use one instance per
/// trajectory.
pub struct WikipediaStore {
    client: reqwest::Client,
    endpoint: String,
    last_extract: Mutex<Option<String>>,
}

impl WikipediaStore {
    pub fn new() -> Self {
        Self::with_endpoint(API_ENDPOINT)
    }

    /// Custom API endpoint (tests point this at a local server).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            last_extract: Mutex::new(None),
        }
    }

    async fn api_get(&self, params: &[(&str, &str)]) -> Result<Value, ToolError> {
        self.client
            .get(&self.endpoint)
            .query(params)
            .send()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))?
            .json::<Value>()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))
    }
}

impl Default for WikipediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for WikipediaStore {
    async fn search(&self, query: &str) -> Result<String, ToolError> {
        let found = self
            .api_get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", "1"),
                ("format", "json"),
            ])
            .await?;
        let title = found["query"]["search"][0]["title"]
            .as_str()
            .ok_or_else(|| ToolError::SearchFailed(query.to_string()))?
            .to_string();

        let page = self
            .api_get(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("exintro", "1"),
                ("titles", &title),
                ("format", "json"),
            ])
            .await?;
        let extract = page["query"]["pages"]
            .as_object()
            .and_then(|pages| pages.values().next())
            .and_then(|p| p["extract"].as_str())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ToolError::SearchFailed(query.to_string()))?
            .to_string();

        *self.last_extract.lock().expect("lock poisoned") = Some(extract.clone());
        Ok(extract)
    }

    async fn lookup(&self, keyword: &str) -> Result<String, ToolError> {
        let extract = self
            .last_extract
            .lock()
            .expect("lock poisoned")
            .clone()
            .ok_or_else(|| ToolError::NoSearchContext(keyword.to_string()))?;
        keyword_sentence(&extract, keyword)
    }
}
