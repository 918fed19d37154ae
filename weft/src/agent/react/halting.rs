//! Halting oracle: decides before each cycle whether the loop must stop.

use std::collections::BTreeMap;

use crate::limits::RunnerLimits;
use crate::llm::TokenCounter;
use crate::profile::BenchmarkProfile;
use crate::prompt::TemplateError;
use crate::state::TrajectoryState;

/// True when the trajectory must stop: a Finish action was dispatched, the
/// step budget is spent (`step_index > max_steps`, so a trajectory runs at
/// most exactly `max_steps` cycles), or the *next* rendered prompt exceeds the
/// token budget.
///
/// The token condition renders with the exact substitution the step executor
/// uses; counting anything else would silently drift from what is sent to the
/// model. A missing template placeholder is a configuration error and
/// propagates.
pub fn should_halt(
    state: &TrajectoryState,
    profile: &BenchmarkProfile,
    extra_keys: &BTreeMap<String, String>,
    limits: &RunnerLimits,
    counter: &dyn TokenCounter,
) -> Result<bool, TemplateError> {
    if state.finished {
        return Ok(true);
    }
    if state.step_index > limits.max_steps {
        return Ok(true);
    }
    let prompt = profile.render_prompt(
        &state.question,
        &state.scratchpad,
        extra_keys,
        limits.max_steps,
    )?;
    Ok(counter.count(&prompt) > limits.max_tokens)
}
