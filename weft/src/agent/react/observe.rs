//! Observation generators: dispatch a parsed action to its tool and fold the
//! result into an observation, per benchmark family.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::grammar::{CodeAction, MathAction, QaAction};
use crate::profile::BenchmarkFamily;
use crate::tools::{DocumentStore, SandboxExecutor};

/// Fallback observation when the search adapter fails.
pub const SEARCH_FALLBACK: &str = "Could not find that page, please try again.";

/// Fallback observation when lookup fails or runs without a prior successful search.
pub const LOOKUP_FALLBACK: &str = "The last page Searched was not found, so you cannot Lookup a keyword in it. Please try one of the similar pages given.";

/// Output of one Observe phase.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub observation: String,
    /// `Some` updates the trajectory answer.
    pub answer: Option<String>,
    /// Set only by a Finish action.
    pub finished: bool,
    pub diagnostics: BTreeMap<String, Value>,
}

/// Turns a parsed `(action_type, query)` pair into an observation.
///
/// Implementations hold per-trajectory tool state (the remembered current
/// answer for Test, the last searched page); `reset` clears it alongside the
/// runner's own state. Adapter failures never escape: they become the fixed
/// fallback observations, recorded in the outcome diagnostics.
#[async_trait]
pub trait ObservationGenerator: Send + Sync {
    async fn observe(&mut self, action_type: &str, query: &str) -> StepOutcome;

    fn reset(&mut self) {}
}

/// QA-family observations: Search / Lookup / Finish over a document store.
pub struct DocstoreObservation {
    store: Arc<dyn DocumentStore>,
}

impl DocstoreObservation {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn invalid_action() -> StepOutcome {
        StepOutcome {
            observation:
                "Invalid Action. Valid Actions are Lookup[<topic>], Search[<topic>], and Finish[<answer>]."
                    .to_string(),
            ..Default::default()
        }
    }
}

/// Collapses a multi-line tool result into one observation line.
fn collapse_newlines(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl ObservationGenerator for DocstoreObservation {
    async fn observe(&mut self, action_type: &str, query: &str) -> StepOutcome {
        match QaAction::classify(action_type, query) {
            QaAction::Finish(answer) => StepOutcome {
                observation: answer.clone(),
                answer: Some(answer),
                finished: true,
                diagnostics: BTreeMap::new(),
            },
            QaAction::Search(topic) => match self.store.search(&topic).await {
                Ok(result) => StepOutcome {
                    observation: collapse_newlines(&result),
                    diagnostics: BTreeMap::from([("search_result".to_string(), json!(result))]),
                    ..Default::default()
                },
                Err(e) => {
                    tracing::warn!(topic = %topic, "search failed: {e}");
                    StepOutcome {
                        observation: SEARCH_FALLBACK.to_string(),
                        diagnostics: BTreeMap::from([(
                            "search_error".to_string(),
                            json!(e.to_string()),
                        )]),
                        ..Default::default()
                    }
                }
            },
            QaAction::Lookup(keyword) => match self.store.lookup(&keyword).await {
                Ok(result) => StepOutcome {
                    observation: collapse_newlines(&result),
                    diagnostics: BTreeMap::from([("lookup_result".to_string(), json!(result))]),
                    ..Default::default()
                },
                Err(e) => {
                    tracing::warn!(keyword = %keyword, "lookup failed: {e}");
                    StepOutcome {
                        observation: LOOKUP_FALLBACK.to_string(),
                        diagnostics: BTreeMap::from([(
                            "lookup_error".to_string(),
                            json!(e.to_string()),
                        )]),
                        ..Default::default()
                    }
                }
            },
            QaAction::Unrecognized { .. } => Self::invalid_action(),
        }
    }
}

/// Math/code-family observations: sandboxed execution with a remembered
/// current answer for Test.
pub struct SandboxObservation {
    sandbox: Arc<dyn SandboxExecutor>,
    family: BenchmarkFamily,
    language: String,
    current_answer: String,
}

impl SandboxObservation {
    /// Math verbs: Calculate / Finish.
    pub fn math(sandbox: Arc<dyn SandboxExecutor>) -> Self {
        Self::for_family(sandbox, BenchmarkFamily::Math)
    }

    /// Code verbs: Implement / Test / Finish.
    pub fn code(sandbox: Arc<dyn SandboxExecutor>) -> Self {
        Self::for_family(sandbox, BenchmarkFamily::Code)
    }

    fn for_family(sandbox: Arc<dyn SandboxExecutor>, family: BenchmarkFamily) -> Self {
        Self {
            sandbox,
            family,
            language: "python".to_string(),
            current_answer: String::new(),
        }
    }

    fn fenced(&self, code: &str) -> String {
        format!("\n```{}\n{}\n```", self.language, code)
    }

    fn invalid_action(&self) -> StepOutcome {
        let lang = &self.language;
        let observation = match self.family {
            BenchmarkFamily::Math => format!(
                "Invalid Action. Valid Actions are Calculate[```{lang}<code>```] and Finish[```{lang}<answer>```]."
            ),
            _ => format!(
                "Invalid Action. Valid Actions are Implement[```{lang}<code>```], Test[```{lang}<code>```], and Finish[```{lang}<answer>```]."
            ),
        };
        StepOutcome {
            observation,
            ..Default::default()
        }
    }

    async fn finish(&self, code: &str) -> StepOutcome {
        // Executed for diagnostics only; the observation is just the submitted block.
        let report = self.sandbox.execute(code).await;
        StepOutcome {
            observation: self.fenced(code),
            answer: Some(code.to_string()),
            finished: true,
            diagnostics: BTreeMap::from([("execution_status".to_string(), json!(report.status))]),
        }
    }

    async fn run(&mut self, code: &str) -> StepOutcome {
        let report = self.sandbox.execute(code).await;
        let mut observation = format!("{}\nExecution Status: {}", self.fenced(code), report.status);
        if !report.result.is_empty() {
            observation.push_str(&format!("\nOutput: {}", report.result));
        }
        self.current_answer = code.to_string();
        StepOutcome {
            observation,
            answer: Some(code.to_string()),
            finished: false,
            diagnostics: BTreeMap::from([
                ("execution_status".to_string(), json!(report.status)),
                ("result".to_string(), json!(report.result)),
            ]),
        }
    }

    async fn test(&self, assertions: &str) -> StepOutcome {
        // The assertions run against the remembered implementation, which
        // stays the current answer afterwards.
        let combined = format!("{}\n\n{}", self.current_answer, assertions);
        let report = self.sandbox.execute(&combined).await;
        StepOutcome {
            observation: format!(
                "{}\nExecution Status: {}",
                self.fenced(assertions),
                report.status
            ),
            answer: None,
            finished: false,
            diagnostics: BTreeMap::from([(
                "execution_status".to_string(),
                json!(report.status),
            )]),
        }
    }
}

#[async_trait]
impl ObservationGenerator for SandboxObservation {
    async fn observe(&mut self, action_type: &str, query: &str) -> StepOutcome {
        match self.family {
            BenchmarkFamily::Math => match MathAction::classify(action_type, query) {
                MathAction::Finish(code) => self.finish(&code).await,
                MathAction::Calculate(code) => self.run(&code).await,
                MathAction::Unrecognized { .. } => self.invalid_action(),
            },
            _ => match CodeAction::classify(action_type, query) {
                CodeAction::Finish(code) => self.finish(&code).await,
                CodeAction::Implement(code) => self.run(&code).await,
                CodeAction::Test(code) => self.test(&code).await,
                CodeAction::Unrecognized { .. } => self.invalid_action(),
            },
        }
    }

    fn reset(&mut self) {
        self.current_answer.clear();
    }
}
