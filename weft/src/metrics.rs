//! Fold per-step model-call records into one totals record.

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::response::Response;
use crate::state::StepRecord;

/// Token, cost and time totals over a trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsTotals {
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    pub total_tokens: u64,
    pub total_prompt_cost: f64,
    pub total_completion_cost: f64,
    pub total_cost: f64,
    pub total_prompt_time: f64,
}

impl Add for MetricsTotals {
    type Output = MetricsTotals;

    fn add(self, rhs: MetricsTotals) -> MetricsTotals {
        MetricsTotals {
            total_prompt_tokens: self.total_prompt_tokens + rhs.total_prompt_tokens,
            total_completion_tokens: self.total_completion_tokens + rhs.total_completion_tokens,
            total_tokens: self.total_tokens + rhs.total_tokens,
            total_prompt_cost: self.total_prompt_cost + rhs.total_prompt_cost,
            total_completion_cost: self.total_completion_cost + rhs.total_completion_cost,
            total_cost: self.total_cost + rhs.total_cost,
            total_prompt_time: self.total_prompt_time + rhs.total_prompt_time,
        }
    }
}

/// Sums usage over any set of responses (strategies with fewer calls per step
/// use this directly).
pub fn accumulate_responses<'a>(
    responses: impl IntoIterator<Item = &'a Response>,
) -> MetricsTotals {
    responses
        .into_iter()
        .fold(MetricsTotals::default(), |acc, r| {
            acc + MetricsTotals {
                total_prompt_tokens: u64::from(r.prompt_tokens),
                total_completion_tokens: u64::from(r.completion_tokens),
                total_tokens: u64::from(r.total_tokens),
                total_prompt_cost: r.prompt_cost,
                total_completion_cost: r.completion_cost,
                total_cost: r.total_cost,
                total_prompt_time: r.prompt_time,
            }
        })
}

/// Sums the thought and action calls of every step. An empty `steps` yields
/// all-zero totals.
pub fn accumulate(steps: &[StepRecord]) -> MetricsTotals {
    accumulate_responses(
        steps
            .iter()
            .flat_map(|s| [&s.model_calls.thought, &s.model_calls.action]),
    )
}
