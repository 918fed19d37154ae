//! Model client and token counter abstractions for the trajectory loop.
//!
//! The loop depends on a callable that turns one rendered prompt into a
//! [`Response`]; this module defines the trait and a mock implementation.

mod mock;

pub use mock::MockLlm;

use async_trait::async_trait;

use crate::response::Response;

/// Model call failure.
///
/// Recovered locally by the step executor: a failed call is replaced with an
/// empty completion and recorded in the step diagnostics, so one flaky call
/// never aborts a trajectory.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("model call failed: {0}")]
    CallFailed(String),
}

/// Model client: one rendered prompt in, one [`Response`] out.
///
/// Calls within a trajectory are strictly sequential (the prompt for call n+1
/// depends on call n's text), and implementations must not mutate shared
/// state.
///
/// **Interaction**: Used twice per cycle by [`StepExecutor`](crate::agent::react::StepExecutor)
/// (thought, action) and once per run by [`CotRunner`](crate::agent::cot::CotRunner).
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn call(&self, prompt: &str) -> Result<Response, LlmError>;
}

/// Token counter, used only by the halting oracle's token-budget condition.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Rough byte-based counter (~4 bytes per token) for when no model tokenizer
/// is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }
}
