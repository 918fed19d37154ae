//! Mock tool adapters for tests: in-memory document store and scripted sandbox.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{keyword_sentence, DocumentStore, ExecutionReport, SandboxExecutor, ToolError};

/// In-memory document store: page titles mapped to summaries, with the last
/// searched page remembered for `lookup`.
///
/// Title matching prefers an exact (case-insensitive) match, then the first
/// title containing the query.
pub struct MockDocumentStore {
    pages: Vec<(String, String)>,
    last_page: Mutex<Option<String>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            last_page: Mutex::new(None),
        }
    }

    /// Adds a page (builder).
    pub fn with_page(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.pages.push((title.into(), content.into()));
        self
    }
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn search(&self, query: &str) -> Result<String, ToolError> {
        let query_lower = query.to_lowercase();
        let hit = self
            .pages
            .iter()
            .find(|(title, _)| title.to_lowercase() == query_lower)
            .or_else(|| {
                self.pages
                    .iter()
                    .find(|(title, _)| title.to_lowercase().contains(&query_lower))
            });
        match hit {
            Some((_, content)) => {
                *self.last_page.lock().expect("lock poisoned") = Some(content.clone());
                Ok(content.clone())
            }
            None => Err(ToolError::SearchFailed(query.to_string())),
        }
    }

    async fn lookup(&self, keyword: &str) -> Result<String, ToolError> {
        let page = self
            .last_page
            .lock()
            .expect("lock poisoned")
            .clone()
            .ok_or_else(|| ToolError::NoSearchContext(keyword.to_string()))?;
        keyword_sentence(&page, keyword)
    }
}

/// Scripted sandbox: pops one report per call (falling back to `Done` with an
/// empty result), and records every executed code string for assertions.
pub struct MockSandbox {
    reports: Mutex<VecDeque<ExecutionReport>>,
    fallback: ExecutionReport,
    executed: Mutex<Vec<String>>,
}

impl MockSandbox {
    /// Sandbox whose every execution succeeds with an empty result.
    pub fn always_done() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn scripted(reports: Vec<ExecutionReport>) -> Self {
        Self {
            reports: Mutex::new(reports.into()),
            fallback: ExecutionReport::done(""),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Report returned once the scripted queue is exhausted (builder).
    pub fn with_fallback(mut self, report: ExecutionReport) -> Self {
        self.fallback = report;
        self
    }

    /// Every code string executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl SandboxExecutor for MockSandbox {
    async fn execute(&self, code: &str) -> ExecutionReport {
        self.executed
            .lock()
            .expect("lock poisoned")
            .push(code.to_string());
        self.reports
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Search remembers the page, and lookup reads from it.
    #[tokio::test]
    async fn search_then_lookup_uses_last_page() {
        let store = MockDocumentStore::new()
            .with_page("Arthur's Magazine", "First published in 1844. A literary periodical.");
        let summary = store.search("arthur's magazine").await.unwrap();
        assert!(summary.contains("1844"));
        let hit = store.lookup("literary").await.unwrap();
        assert!(hit.contains("literary"));
    }

    /// **Scenario**: Lookup before any search is a NoSearchContext error.
    #[tokio::test]
    async fn lookup_without_search_fails_with_no_context() {
        let store = MockDocumentStore::new().with_page("X", "Y");
        assert!(matches!(
            store.lookup("y").await,
            Err(ToolError::NoSearchContext(_))
        ));
    }

    /// **Scenario**: Search with no matching title is a SearchFailed error.
    #[tokio::test]
    async fn search_miss_fails() {
        let store = MockDocumentStore::new().with_page("Only Page", "content");
        assert!(matches!(
            store.search("unrelated").await,
            Err(ToolError::SearchFailed(_))
        ));
    }

    /// **Scenario**: The scripted sandbox records executions and pops reports in order.
    #[tokio::test]
    async fn sandbox_records_and_pops_in_order() {
        let sandbox = MockSandbox::scripted(vec![
            ExecutionReport::done("1"),
            ExecutionReport::failed("ZeroDivisionError: division by zero"),
        ]);
        assert_eq!(sandbox.execute("a").await.result, "1");
        assert!(!sandbox.execute("b").await.is_success());
        assert!(sandbox.execute("c").await.is_success());
        assert_eq!(sandbox.executed(), vec!["a", "b", "c"]);
    }
}
