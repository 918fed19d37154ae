//! Prompt templates: placeholder rendering and YAML prompt assets.
//!
//! [`render`] is the single substitution function for the whole crate: the step
//! executor and the halting oracle both go through it, so the token budget is
//! enforced over exactly the text sent to the model.

mod load;
mod render;

pub use load::{default_from_embedded, load, load_or_default, LoadError, PromptFile, PromptSet};
pub use render::{render, TemplateError};
