//! Agent strategies: the ReAct trajectory loop and the single-shot CoT baseline.

pub mod cot;
pub mod react;
