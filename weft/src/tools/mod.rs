//! Tool adapters: document search/lookup and sandboxed code execution.
//!
//! The loop treats both as black boxes behind these narrow traits; adapters
//! are injected at runner construction, never shared defaults bound at
//! definition time.
//!
//! # Main types
//!
//! - **[`DocumentStore`]**: search + lookup for QA benchmarks
//!   ([`MockDocumentStore`], [`WikipediaStore`]).
//! - **[`SandboxExecutor`]**: isolated code execution for math/code benchmarks
//!   ([`MockSandbox`], [`PythonSandbox`]); failures are encoded in the
//!   [`ExecutionReport`] status, never raised.

mod mock;
mod python;
mod wikipedia;

pub use mock::{MockDocumentStore, MockSandbox};
pub use python::PythonSandbox;
pub use wikipedia::WikipediaStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Search found nothing for the query.
    #[error("search failed: {0}")]
    SearchFailed(String),
    /// Lookup was called before any successful search.
    #[error("no prior search context for lookup: {0}")]
    NoSearchContext(String),
    /// Lookup found no sentence containing the keyword.
    #[error("lookup failed: {0}")]
    LookupFailed(String),
    /// Network or process-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Document search/lookup provider for QA benchmarks.
///
/// `lookup` reads from the page the previous `search` returned, so
/// implementations carry per-trajectory state; give each concurrently-running
/// trajectory its own instance.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, ToolError>;
    async fn lookup(&self, keyword: &str) -> Result<String, ToolError>;
}

/// Execution status value reported for a successful run.
pub const EXECUTION_STATUS_DONE: &str = "Done";

/// Outcome of one sandbox execution. Failures are encoded in `status`, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Captured output value (stdout), empty when the code printed nothing.
    pub result: String,
    /// `"Done"` on success, otherwise a short failure description.
    pub status: String,
}

impl ExecutionReport {
    pub fn done(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            status: EXECUTION_STATUS_DONE.to_string(),
        }
    }

    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            result: String::new(),
            status: status.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EXECUTION_STATUS_DONE
    }
}

/// Sandboxed code executor for math/code benchmarks.
///
/// Each call must run in an isolated namespace: one trajectory's definitions
/// never leak into another's execution.
#[async_trait]
pub trait SandboxExecutor: Send + Sync {
    async fn execute(&self, code: &str) -> ExecutionReport;
}

/// First sentence of `text` containing `keyword` (case-insensitive), formatted
/// `(Result 1/n) sentence` where n is the number of matching sentences.
pub(crate) fn keyword_sentence(text: &str, keyword: &str) -> Result<String, ToolError> {
    let keyword_lower = keyword.to_lowercase();
    let hits: Vec<&str> = text
        .split(". ")
        .filter(|s| s.to_lowercase().contains(&keyword_lower))
        .collect();
    match hits.first() {
        Some(first) => Ok(format!("(Result 1/{}) {}", hits.len(), first.trim())),
        None => Err(ToolError::LookupFailed(keyword.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: A successful report is `Done`; a failed one carries its status.
    #[test]
    fn execution_report_success_flag() {
        assert!(ExecutionReport::done("42").is_success());
        let failed = ExecutionReport::failed("NameError: x");
        assert!(!failed.is_success());
        assert_eq!(failed.status, "NameError: x");
    }

    /// **Scenario**: keyword_sentence returns the first hit with a count, or a
    /// LookupFailed error when nothing matches.
    #[test]
    fn keyword_sentence_counts_hits() {
        let text = "The loom weaves. The weft crosses the warp. Warp threads run long.";
        let hit = keyword_sentence(text, "warp").unwrap();
        assert_eq!(hit, "(Result 1/2) The weft crosses the warp");
        assert!(matches!(
            keyword_sentence(text, "shuttle"),
            Err(ToolError::LookupFailed(_))
        ));
    }
}
