//! Trajectory state and step records for the ReAct loop.
//!
//! # Main types
//!
//! - [`TrajectoryState`]: scratchpad transcript plus loop counters; flows
//!   state-in, state-out through [`StepExecutor`](crate::agent::react::StepExecutor).
//! - [`StepRecord`]: immutable record of one completed cycle.
//! - [`TrajectoryResult`]: final output of a run, with aggregated metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricsTotals;
use crate::response::Response;

/// The two model calls of one think-act-observe cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCalls {
    pub thought: Response,
    pub action: Response,
}

/// Immutable record of one completed cycle, owned by [`TrajectoryState::steps`]
/// in insertion order (the order reconstructs the scratchpad).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepRecord {
    pub thought: String,
    pub action_type: String,
    /// The action argument.
    pub query: String,
    pub observation: String,
    /// Trajectory answer as of this step.
    pub answer: String,
    /// Tool and recovery diagnostics (e.g. execution status, search payload).
    pub tool_diagnostics: BTreeMap<String, serde_json::Value>,
    pub model_calls: ModelCalls,
}

/// Mutable state of one trajectory.
///
/// The scratchpad only grows within a trajectory;
/// [`ReactRunner::reset`](crate::agent::react::ReactRunner::reset) is the
/// single point that clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryState {
    pub question: String,
    /// Append-only transcript of Thought / Action / Observation blocks.
    pub scratchpad: String,
    /// 1-based index of the next cycle.
    pub step_index: usize,
    /// Set true exactly when a Finish action is dispatched.
    pub finished: bool,
    /// Last value assigned by a Finish action (or the current working answer
    /// for math/code); empty before the first.
    pub answer: String,
    pub steps: Vec<StepRecord>,
}

impl Default for TrajectoryState {
    fn default() -> Self {
        Self {
            question: String::new(),
            scratchpad: String::new(),
            step_index: 1,
            finished: false,
            answer: String::new(),
            steps: Vec::new(),
        }
    }
}

impl TrajectoryState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }
}

/// Final output of [`ReactRunner::generate`](crate::agent::react::ReactRunner::generate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryResult {
    pub answer: String,
    /// True only when a Finish action was dispatched; a budget-exhausted stop
    /// still returns the (possibly empty) answer with `finished == false`.
    pub finished: bool,
    pub scratchpad: String,
    pub steps: Vec<StepRecord>,
    /// Wall-clock seconds for the whole run.
    pub total_time: f64,
    pub metrics: MetricsTotals,
}
