//! Value record of one model call: texts, token counts, dollar costs, latency.

use serde::{Deserialize, Serialize};

/// One model call's inputs, outputs and accounting.
///
/// Opaque immutable data to the loop: only `output_text` is parsed and only the
/// numeric fields are aggregated (see [`crate::metrics::accumulate`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub input_text: String,
    pub output_text: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub prompt_cost: f64,
    pub completion_cost: f64,
    pub total_cost: f64,
    /// Wall-clock seconds spent in the call.
    pub prompt_time: f64,
}

impl Response {
    /// Zero-usage stand-in recorded when a model call failed and was recovered locally.
    pub fn empty(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            ..Self::default()
        }
    }
}
