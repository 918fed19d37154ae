//! Step executor: one think-act-observe cycle over the scratchpad.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use crate::llm::LlmClient;
use crate::profile::BenchmarkProfile;
use crate::prompt::TemplateError;
use crate::response::Response;
use crate::state::{ModelCalls, StepRecord, TrajectoryState};

use super::observe::ObservationGenerator;

/// Takes the completion text up to the first occurrence of `marker`.
fn completion_before<'a>(text: &'a str, marker: &str) -> &'a str {
    match text.find(marker) {
        Some(i) => &text[..i],
        None => text,
    }
}

/// Executes think-act-observe cycles: state in, state out.
///
/// Each cycle appends exactly four fragments to the scratchpad (thought marker
/// + thought, action marker + rendered action, observation marker +
/// observation), so the transcript the next prompt renders from is
/// byte-for-byte reproducible.
pub struct StepExecutor {
    llm: Arc<dyn LlmClient>,
    profile: Arc<BenchmarkProfile>,
    observer: Box<dyn ObservationGenerator>,
}

impl StepExecutor {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        profile: Arc<BenchmarkProfile>,
        observer: Box<dyn ObservationGenerator>,
    ) -> Self {
        Self {
            llm,
            profile,
            observer,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.observer.reset();
    }

    /// Calls the model, recovering a failure into an empty completion so a
    /// trajectory can only end via Finish or its budgets.
    async fn call_model(
        &self,
        prompt: String,
        phase: &str,
        diagnostics: &mut BTreeMap<String, serde_json::Value>,
    ) -> Response {
        match self.llm.call(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(phase, "model call failed, recovering: {e}");
                diagnostics.insert(format!("{phase}_error"), json!(e.to_string()));
                Response::empty(prompt)
            }
        }
    }

    /// Runs one cycle and returns the updated state with the new
    /// [`StepRecord`] appended and `step_index` advanced.
    pub async fn run(
        &mut self,
        mut state: TrajectoryState,
        extra_keys: &BTreeMap<String, String>,
        max_steps: usize,
    ) -> Result<TrajectoryState, TemplateError> {
        let i = state.step_index;
        let mut diagnostics = BTreeMap::new();

        // Think
        state.scratchpad.push_str(&format!("\nThought {i}: "));
        let prompt =
            self.profile
                .render_prompt(&state.question, &state.scratchpad, extra_keys, max_steps)?;
        let thought_response = self.call_model(prompt, "thought", &mut diagnostics).await;
        let thought = completion_before(&thought_response.output_text, "Action")
            .trim()
            .to_string();
        state.scratchpad.push_str(&thought);
        tracing::debug!(step = i, thought = %thought, "think");

        // Act
        state.scratchpad.push_str(&format!("\nAction {i}: "));
        let prompt =
            self.profile
                .render_prompt(&state.question, &state.scratchpad, extra_keys, max_steps)?;
        let action_response = self.call_model(prompt, "action", &mut diagnostics).await;
        let action_text = completion_before(&action_response.output_text, "Observation")
            .trim()
            .to_string();
        let (action_type, query) = self.profile.grammar.parse(&action_text);
        state
            .scratchpad
            .push_str(&self.profile.grammar.render(&action_type, &query));
        tracing::debug!(step = i, action_type = %action_type, "act");

        // Observe
        state.scratchpad.push_str(&format!("\nObservation {i}: "));
        let outcome = self.observer.observe(&action_type, &query).await;
        state.scratchpad.push_str(&outcome.observation);
        if let Some(answer) = outcome.answer {
            state.answer = answer;
        }
        if outcome.finished {
            state.finished = true;
        }
        diagnostics.extend(outcome.diagnostics);

        // Record
        state.steps.push(StepRecord {
            thought,
            action_type,
            query,
            observation: outcome.observation,
            answer: state.answer.clone(),
            tool_diagnostics: diagnostics,
            model_calls: ModelCalls {
                thought: thought_response,
                action: action_response,
            },
        });
        state.step_index += 1;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::react::observe::DocstoreObservation;
    use crate::llm::MockLlm;
    use crate::profile::BenchmarkProfile;
    use crate::tools::MockDocumentStore;

    fn qa_executor(llm: MockLlm) -> StepExecutor {
        StepExecutor::new(
            Arc::new(llm),
            Arc::new(BenchmarkProfile::qa()),
            Box::new(DocstoreObservation::new(Arc::new(
                MockDocumentStore::new().with_page("Colosseum", "An amphitheatre in Rome."),
            ))),
        )
    }

    /// **Scenario**: The completion is cut at the phase marker and trimmed.
    #[test]
    fn completion_is_cut_at_marker() {
        assert_eq!(
            completion_before("thinking...\nAction 1: Search[x]", "Action"),
            "thinking...\n"
        );
        assert_eq!(completion_before("no marker here", "Action"), "no marker here");
    }

    /// **Scenario**: One cycle appends the four fragments in order, byte for byte.
    #[tokio::test]
    async fn cycle_appends_exactly_four_fragments() {
        let llm = MockLlm::scripted([
            "I should search the Colosseum.\nAction 1: Search[Colosseum]",
            "Search[Colosseum]\nObservation 1: ignored tail",
        ]);
        let mut executor = qa_executor(llm);
        let before = TrajectoryState::new("Where is the Colosseum?");
        let after = executor.run(before.clone(), &BTreeMap::new(), 6).await.unwrap();

        let expected = format!(
            "{}\nThought 1: {}\nAction 1: {}\nObservation 1: {}",
            before.scratchpad,
            "I should search the Colosseum.",
            "Search[Colosseum]",
            "An amphitheatre in Rome."
        );
        assert_eq!(after.scratchpad, expected);
        assert!(after.scratchpad.starts_with(&before.scratchpad));
        assert_eq!(after.step_index, 2);
        assert_eq!(after.steps.len(), 1);
        assert!(!after.finished);
    }

    /// **Scenario**: The step record snapshots the cycle, including both model calls.
    #[tokio::test]
    async fn step_record_snapshots_the_cycle() {
        let llm = MockLlm::scripted([
            "Time to answer.\nAction 1: Finish[Rome]",
            "Finish[Rome]",
        ]);
        let mut executor = qa_executor(llm);
        let after = executor
            .run(TrajectoryState::new("q"), &BTreeMap::new(), 6)
            .await
            .unwrap();

        let record = &after.steps[0];
        assert_eq!(record.thought, "Time to answer.");
        assert_eq!(record.action_type, "Finish");
        assert_eq!(record.query, "Rome");
        assert_eq!(record.observation, "Rome");
        assert_eq!(record.answer, "Rome");
        assert!(record.model_calls.thought.input_text.contains("Thought 1:"));
        assert!(record.model_calls.action.input_text.contains("Action 1:"));
        assert!(after.finished);
        assert_eq!(after.answer, "Rome");
    }

    /// **Scenario**: A failed model call is recovered into an empty completion;
    /// the cycle completes through the invalid-action branch.
    #[tokio::test]
    async fn model_failure_recovers_into_invalid_action() {
        let mut executor = qa_executor(MockLlm::failing());
        let after = executor
            .run(TrajectoryState::new("q"), &BTreeMap::new(), 6)
            .await
            .unwrap();

        let record = &after.steps[0];
        assert!(record.tool_diagnostics.contains_key("thought_error"));
        assert!(record.tool_diagnostics.contains_key("action_error"));
        assert!(record.observation.starts_with("Invalid Action."));
        assert!(!after.finished);
        assert_eq!(after.step_index, 2);
    }
}
