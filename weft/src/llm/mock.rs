//! Mock LLM for tests and examples: scripted completion queue with fixed usage.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmClient, LlmError};
use crate::response::Response;

/// Mock model: pops one scripted completion per call, with fixed per-call usage
/// numbers so metric sums are predictable in tests.
///
/// An exhausted queue returns the fallback completion (empty by default), which
/// parses to the unrecognized-action branch and lets budget-exhaustion paths be
/// tested without scripting every step.
pub struct MockLlm {
    completions: Mutex<VecDeque<String>>,
    fallback: String,
    prompt_tokens: u32,
    completion_tokens: u32,
    prompt_cost: f64,
    completion_cost: f64,
    prompt_time: f64,
    fail: bool,
}

impl MockLlm {
    /// Mock that pops the given completions in order, then returns the fallback.
    pub fn scripted<I, S>(completions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            completions: Mutex::new(completions.into_iter().map(Into::into).collect()),
            fallback: String::new(),
            prompt_tokens: 10,
            completion_tokens: 20,
            prompt_cost: 0.25,
            completion_cost: 0.5,
            prompt_time: 0.5,
            fail: false,
        }
    }

    /// Mock that returns the same completion on every call.
    pub fn fixed(completion: impl Into<String>) -> Self {
        let mut mock = Self::scripted(Vec::<String>::new());
        mock.fallback = completion.into();
        mock
    }

    /// Mock whose every call fails (for model-boundary recovery tests).
    pub fn failing() -> Self {
        let mut mock = Self::scripted(Vec::<String>::new());
        mock.fail = true;
        mock
    }

    /// Set per-call token usage (builder).
    pub fn with_usage(mut self, prompt_tokens: u32, completion_tokens: u32) -> Self {
        self.prompt_tokens = prompt_tokens;
        self.completion_tokens = completion_tokens;
        self
    }

    /// Set per-call dollar costs (builder).
    pub fn with_costs(mut self, prompt_cost: f64, completion_cost: f64) -> Self {
        self.prompt_cost = prompt_cost;
        self.completion_cost = completion_cost;
        self
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn call(&self, prompt: &str) -> Result<Response, LlmError> {
        if self.fail {
            return Err(LlmError::CallFailed("mock failure".to_string()));
        }
        let output = self
            .completions
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        Ok(Response {
            input_text: prompt.to_string(),
            output_text: output,
            prompt_tokens: self.prompt_tokens,
            completion_tokens: self.completion_tokens,
            total_tokens: self.prompt_tokens + self.completion_tokens,
            prompt_cost: self.prompt_cost,
            completion_cost: self.completion_cost,
            total_cost: self.prompt_cost + self.completion_cost,
            prompt_time: self.prompt_time,
        })
    }
}
