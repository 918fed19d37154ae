//! CoT: single-shot chain-of-thought baseline.
//!
//! One rendered prompt, one model call, answer extracted from the completion.
//! Shares the model client, template renderer and metrics with the ReAct loop;
//! there is no scratchpad and no tool dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::agent::react::RunError;
use crate::llm::LlmClient;
use crate::metrics::{self, MetricsTotals};
use crate::prompt::{self, render};
use crate::response::Response;

/// Marker the answer is read from when present in the completion.
const ANSWER_MARKER: &str = "Answer:";

/// Result of one CoT call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CotResult {
    pub answer: String,
    pub response: Response,
    /// Wall-clock seconds for the run.
    pub total_time: f64,
    pub metrics: MetricsTotals,
}

/// Single-shot chain-of-thought runner.
pub struct CotRunner {
    llm: Arc<dyn LlmClient>,
    template: String,
    examples: String,
}

impl CotRunner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        let assets = prompt::load_or_default().cot;
        Self {
            llm,
            template: assets.template.unwrap_or_default(),
            examples: assets.examples.unwrap_or_default(),
        }
    }

    /// Replace the prompt template (builder).
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Replace the few-shot examples (builder).
    pub fn with_examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = examples.into();
        self
    }

    /// Renders the prompt, makes one model call, and extracts the answer after
    /// the last `Answer:` marker (whole completion when absent). A failed model
    /// call recovers into an empty answer, mirroring the trajectory loop.
    pub async fn generate(&self, question: &str) -> Result<CotResult, RunError> {
        let bindings = BTreeMap::from([
            ("question".to_string(), question.to_string()),
            ("examples".to_string(), self.examples.clone()),
        ]);
        let prompt_text = render(&self.template, &bindings)?;

        let started = Instant::now();
        let response = match self.llm.call(&prompt_text).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("model call failed, recovering: {e}");
                Response::empty(prompt_text)
            }
        };
        Ok(CotResult {
            answer: extract_answer(&response.output_text),
            metrics: metrics::accumulate_responses([&response]),
            response,
            total_time: started.elapsed().as_secs_f64(),
        })
    }
}

fn extract_answer(completion: &str) -> String {
    match completion.rfind(ANSWER_MARKER) {
        Some(i) => completion[i + ANSWER_MARKER.len()..].trim().to_string(),
        None => completion.trim().to_string(),
    }
}
