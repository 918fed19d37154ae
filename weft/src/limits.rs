//! Step and token budgets for a trajectory run.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_STEPS: usize = 6;
pub const DEFAULT_MAX_TOKENS: usize = 5000;

/// The two halting budgets. Both are checked before each cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerLimits {
    /// A trajectory may run exactly this many cycles; cycle `max_steps + 1` is refused.
    pub max_steps: usize,
    /// Budget over the *next* rendered prompt, counted by the injected
    /// [`TokenCounter`](crate::llm::TokenCounter).
    pub max_tokens: usize,
}

impl Default for RunnerLimits {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl RunnerLimits {
    pub fn new(max_steps: usize, max_tokens: usize) -> Self {
        Self {
            max_steps,
            max_tokens,
        }
    }

    /// Reads `WEFT_MAX_STEPS` / `WEFT_MAX_TOKENS` after feeding `.env` and the
    /// XDG config into the process environment (existing env wins).
    pub fn from_env() -> Self {
        if let Err(e) = env_config::load_and_apply("weft", None) {
            tracing::warn!("config load failed: {e}");
        }
        Self {
            max_steps: read_env("WEFT_MAX_STEPS", DEFAULT_MAX_STEPS),
            max_tokens: read_env("WEFT_MAX_TOKENS", DEFAULT_MAX_TOKENS),
        }
    }
}

fn read_env(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
