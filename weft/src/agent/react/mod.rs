//! ReAct: the bounded think → act → observe trajectory loop.
//!
//! One generic loop, parameterized by a [`BenchmarkProfile`](crate::profile::BenchmarkProfile)
//! (grammar + observation dispatch + prompt assets), covers the QA, math and
//! code benchmark families.
//!
//! # Main types
//!
//! - **[`ReactRunner`]**: owns the scratchpad and drives cycles until the halting oracle fires.
//! - **[`StepExecutor`]**: one think-act-observe cycle, state in, state out.
//! - **[`ObservationGenerator`]**: per-family dispatch from parsed action to observation
//!   ([`DocstoreObservation`], [`SandboxObservation`]).
//! - **[`should_halt`]**: finished / step budget / token budget, OR'd.

mod halting;
mod observe;
mod runner;
mod step;

pub use halting::should_halt;
pub use observe::{
    DocstoreObservation, ObservationGenerator, SandboxObservation, StepOutcome, LOOKUP_FALLBACK,
    SEARCH_FALLBACK,
};
pub use runner::{ReactRunner, RunError};
pub use step::StepExecutor;
