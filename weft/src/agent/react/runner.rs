//! ReactRunner: owns trajectory state, drives the loop, aggregates metrics.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::limits::RunnerLimits;
use crate::llm::{LlmClient, TokenCounter};
use crate::metrics;
use crate::profile::BenchmarkProfile;
use crate::prompt::{LoadError, TemplateError};
use crate::state::{TrajectoryResult, TrajectoryState};
use crate::tools::{DocumentStore, SandboxExecutor};

use super::halting::should_halt;
use super::observe::{DocstoreObservation, ObservationGenerator, SandboxObservation};
use super::step::StepExecutor;

/// Error type for runner operations.
///
/// Everything here is a configuration mistake and surfaces immediately; tool
/// and model failures are recovered inside the step executor and recorded as
/// step diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("prompt template: {0}")]
    Template(#[from] TemplateError),
    #[error("prompt assets: {0}")]
    PromptLoad(#[from] LoadError),
}

/// The ReAct trajectory loop: think → act → observe until the halting oracle fires.
///
/// One runner type covers every benchmark family; the differences live in the
/// injected [`BenchmarkProfile`] and observation generator. All collaborators
/// are constructor parameters — nothing is shared between runners.
pub struct ReactRunner {
    counter: Arc<dyn TokenCounter>,
    profile: Arc<BenchmarkProfile>,
    limits: RunnerLimits,
    executor: StepExecutor,
    state: TrajectoryState,
}

impl ReactRunner {
    /// QA runner over a document store (Search / Lookup / Finish).
    pub fn qa(
        llm: Arc<dyn LlmClient>,
        counter: Arc<dyn TokenCounter>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self::new(
            llm,
            counter,
            Box::new(DocstoreObservation::new(store)),
            BenchmarkProfile::qa(),
            RunnerLimits::default(),
        )
    }

    /// Math runner over a sandbox (Calculate / Finish).
    pub fn math(
        llm: Arc<dyn LlmClient>,
        counter: Arc<dyn TokenCounter>,
        sandbox: Arc<dyn SandboxExecutor>,
    ) -> Self {
        Self::new(
            llm,
            counter,
            Box::new(SandboxObservation::math(sandbox)),
            BenchmarkProfile::math(),
            RunnerLimits::default(),
        )
    }

    /// Code runner over a sandbox (Implement / Test / Finish). The default
    /// template expects a `tests` entry in `generate`'s extra keys.
    pub fn code(
        llm: Arc<dyn LlmClient>,
        counter: Arc<dyn TokenCounter>,
        sandbox: Arc<dyn SandboxExecutor>,
    ) -> Self {
        Self::new(
            llm,
            counter,
            Box::new(SandboxObservation::code(sandbox)),
            BenchmarkProfile::code(),
            RunnerLimits::default(),
        )
    }

    /// Fully explicit constructor; the per-family constructors above feed it.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        counter: Arc<dyn TokenCounter>,
        observer: Box<dyn ObservationGenerator>,
        profile: BenchmarkProfile,
        limits: RunnerLimits,
    ) -> Self {
        let profile = Arc::new(profile);
        Self {
            counter,
            executor: StepExecutor::new(llm, Arc::clone(&profile), observer),
            profile,
            limits,
            state: TrajectoryState::default(),
        }
    }

    /// Replace the step/token budgets (builder).
    pub fn with_limits(mut self, limits: RunnerLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Current trajectory state (inspection; the loop owns all mutation).
    pub fn state(&self) -> &TrajectoryState {
        &self.state
    }

    /// Clears all mutable trajectory state, including the observation
    /// generator's remembered answer. Callable independently of `generate`.
    pub fn reset(&mut self) {
        self.state = TrajectoryState::default();
        self.executor.reset();
    }

    /// Runs one full trajectory for `question` and returns the aggregated result.
    ///
    /// `extra_keys` are additional template bindings (e.g. `tests` for code
    /// benchmarks). With `reset == false` the loop continues from the current
    /// scratchpad instead of starting fresh.
    ///
    /// A budget-exhausted run is not an error: it returns the current (possibly
    /// empty) answer with `finished == false`.
    pub async fn generate(
        &mut self,
        question: &str,
        extra_keys: &BTreeMap<String, String>,
        reset: bool,
    ) -> Result<TrajectoryResult, RunError> {
        if reset {
            self.reset();
        }
        self.state.question = question.to_string();
        let started = Instant::now();

        while !should_halt(
            &self.state,
            &self.profile,
            extra_keys,
            &self.limits,
            self.counter.as_ref(),
        )? {
            let state = std::mem::take(&mut self.state);
            self.state = self
                .executor
                .run(state, extra_keys, self.limits.max_steps)
                .await?;
        }

        let metrics = metrics::accumulate(&self.state.steps);
        tracing::debug!(
            benchmark = %self.profile.name,
            steps = self.state.steps.len(),
            finished = self.state.finished,
            "trajectory done"
        );
        Ok(TrajectoryResult {
            answer: self.state.answer.clone(),
            finished: self.state.finished,
            scratchpad: self.state.scratchpad.clone(),
            steps: self.state.steps.clone(),
            total_time: started.elapsed().as_secs_f64(),
            metrics,
        })
    }
}
