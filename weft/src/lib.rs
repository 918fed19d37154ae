//! # Weft
//!
//! Bounded ReAct trajectory loops in Rust with a **state-in, state-out** design.
//! One generic loop — think → act → observe over an append-only scratchpad —
//! drives question-answering, math and code benchmarks; everything
//! benchmark-specific (action grammar, tool dispatch, prompt assets) is plain
//! data in a [`BenchmarkProfile`] chosen at construction.
//!
//! ## Design principles
//!
//! - **One loop, many benchmarks**: no per-benchmark subclasses; a profile
//!   value parameterizes [`ReactRunner`].
//! - **Dual halting condition**: a step budget and a token budget over the
//!   *next* rendered prompt, checked by [`should_halt`] before every cycle.
//! - **Tools are injected**: [`DocumentStore`] and [`SandboxExecutor`] are
//!   constructor parameters; their failures become fixed fallback observations,
//!   never trajectory aborts.
//! - **Exact transcripts**: each cycle appends byte-for-byte reproducible
//!   Thought / Action / Observation fragments, because the next prompt renders
//!   from the scratchpad text.
//!
//! ## Main modules
//!
//! - [`agent::react`]: [`ReactRunner`], [`StepExecutor`], [`should_halt`],
//!   observation generators.
//! - [`agent::cot`]: [`CotRunner`] — single-shot chain-of-thought baseline.
//! - [`grammar`]: bracket and fenced action parsers, typed action enums.
//! - [`profile`]: [`BenchmarkProfile`], [`BenchmarkFamily`].
//! - [`prompt`]: placeholder rendering and YAML prompt assets.
//! - [`llm`]: [`LlmClient`], [`TokenCounter`], [`MockLlm`].
//! - [`tools`]: [`DocumentStore`] / [`SandboxExecutor`] adapters
//!   ([`WikipediaStore`], [`PythonSandbox`], mocks).
//! - [`state`]: [`TrajectoryState`], [`StepRecord`], [`TrajectoryResult`].
//! - [`metrics`]: [`MetricsTotals`], [`accumulate`].
//! - [`limits`]: [`RunnerLimits`] step/token budgets.
//!
//! ## Quick start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use weft::{HeuristicCounter, MockDocumentStore, MockLlm, ReactRunner};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let llm = Arc::new(MockLlm::scripted([
//!     "The capital of France is well known.\nAction 1: Finish[Paris]",
//!     "Finish[Paris]",
//! ]));
//! let store = Arc::new(MockDocumentStore::new());
//! let mut runner = ReactRunner::qa(llm, Arc::new(HeuristicCounter), store);
//!
//! let result = runner
//!     .generate("What is the capital of France?", &BTreeMap::new(), true)
//!     .await
//!     .unwrap();
//! assert_eq!(result.answer, "Paris");
//! assert!(result.finished);
//! # }
//! ```

pub mod agent;
pub mod grammar;
pub mod limits;
pub mod llm;
pub mod metrics;
pub mod profile;
pub mod prompt;
pub mod response;
pub mod state;
pub mod tools;

pub use agent::cot::{CotResult, CotRunner};
pub use agent::react::{
    should_halt, DocstoreObservation, ObservationGenerator, ReactRunner, RunError,
    SandboxObservation, StepExecutor, StepOutcome, LOOKUP_FALLBACK, SEARCH_FALLBACK,
};
pub use grammar::{parse_bracket, parse_fenced, CodeAction, GrammarVariant, MathAction, QaAction};
pub use limits::RunnerLimits;
pub use llm::{HeuristicCounter, LlmClient, LlmError, MockLlm, TokenCounter};
pub use metrics::{accumulate, accumulate_responses, MetricsTotals};
pub use profile::{BenchmarkFamily, BenchmarkProfile};
pub use prompt::{render, LoadError, PromptFile, PromptSet, TemplateError};
pub use response::Response;
pub use state::{ModelCalls, StepRecord, TrajectoryResult, TrajectoryState};
pub use tools::{
    DocumentStore, ExecutionReport, MockDocumentStore, MockSandbox, PythonSandbox,
    SandboxExecutor, ToolError, WikipediaStore, EXECUTION_STATUS_DONE,
};
