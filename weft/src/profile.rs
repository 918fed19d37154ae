//! Benchmark profiles: grammar + prompt assets + dispatch family as plain data.
//!
//! One profile record replaces per-benchmark strategy subclasses: the loop is
//! family-agnostic and reads everything benchmark-specific from here. Profiles
//! are built once at runner construction and never mutated during a run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grammar::GrammarVariant;
use crate::prompt::{self, LoadError, PromptFile, TemplateError};

/// Benchmark family: decides the action grammar and observation dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkFamily {
    Qa,
    Math,
    Code,
}

/// Everything benchmark-specific the trajectory loop needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct BenchmarkProfile {
    /// Benchmark identity tag (e.g. "hotpotqa", "gsm8k"); carried as data, not a type.
    pub name: String,
    pub family: BenchmarkFamily,
    pub grammar: GrammarVariant,
    pub prompt_template: String,
    pub examples: String,
    /// When true, `max_steps` is offered as a `{max_steps}` binding to the
    /// template. Templates that reference `{max_steps}` with this off fail
    /// fast with a missing-placeholder error.
    pub max_steps_in_prompt: bool,
}

impl BenchmarkProfile {
    /// QA profile: bracket grammar, Search / Lookup / Finish prompt.
    pub fn qa() -> Self {
        Self::qa_named("qa")
    }

    pub fn qa_named(name: &str) -> Self {
        Self::from_parts(
            name,
            BenchmarkFamily::Qa,
            GrammarVariant::Bracket,
            prompt::load_or_default().qa,
        )
    }

    /// Math profile: fenced grammar, Calculate / Finish prompt.
    pub fn math() -> Self {
        Self::math_named("math")
    }

    pub fn math_named(name: &str) -> Self {
        Self::from_parts(
            name,
            BenchmarkFamily::Math,
            GrammarVariant::fenced("python"),
            prompt::load_or_default().math,
        )
    }

    /// Code profile: fenced grammar, Implement / Test / Finish prompt.
    ///
    /// The default template references `{tests}`, so `generate` must be given
    /// a `tests` entry in its extra keys.
    pub fn code() -> Self {
        Self::code_named("code")
    }

    pub fn code_named(name: &str) -> Self {
        Self::from_parts(
            name,
            BenchmarkFamily::Code,
            GrammarVariant::fenced("python"),
            prompt::load_or_default().code,
        )
    }

    /// Builds a profile for `family` from prompt YAML under `dir`, falling back
    /// per-field to the embedded defaults.
    pub fn from_dir(name: &str, family: BenchmarkFamily, dir: &Path) -> Result<Self, LoadError> {
        let set = prompt::load(dir)?;
        let (grammar, assets) = match family {
            BenchmarkFamily::Qa => (GrammarVariant::Bracket, set.qa),
            BenchmarkFamily::Math => (GrammarVariant::fenced("python"), set.math),
            BenchmarkFamily::Code => (GrammarVariant::fenced("python"), set.code),
        };
        Ok(Self::from_parts(name, family, grammar, assets))
    }

    fn from_parts(
        name: &str,
        family: BenchmarkFamily,
        grammar: GrammarVariant,
        assets: PromptFile,
    ) -> Self {
        Self {
            name: name.to_string(),
            family,
            grammar,
            prompt_template: assets.template.unwrap_or_default(),
            examples: assets.examples.unwrap_or_default(),
            max_steps_in_prompt: true,
        }
    }

    /// Replace the prompt template (builder).
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Replace the few-shot examples (builder).
    pub fn with_examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = examples.into();
        self
    }

    /// Toggle the `{max_steps}` binding (builder).
    pub fn with_max_steps_in_prompt(mut self, enabled: bool) -> Self {
        self.max_steps_in_prompt = enabled;
        self
    }

    /// Renders the agent prompt for the current trajectory state.
    ///
    /// The halting oracle and the step executor both go through here; the token
    /// budget must be counted over exactly the text sent to the model.
    pub fn render_prompt(
        &self,
        question: &str,
        scratchpad: &str,
        extra_keys: &BTreeMap<String, String>,
        max_steps: usize,
    ) -> Result<String, TemplateError> {
        let mut bindings = extra_keys.clone();
        bindings.insert("question".to_string(), question.to_string());
        bindings.insert("scratchpad".to_string(), scratchpad.to_string());
        bindings.insert("examples".to_string(), self.examples.clone());
        if self.max_steps_in_prompt {
            bindings.insert("max_steps".to_string(), max_steps.to_string());
        }
        prompt::render(&self.prompt_template, &bindings)
    }
}
