//! Step validation engine.
//!
//! Declarative per-step rule tables and a pure evaluator, with no I/O.

pub mod evaluator;
pub mod rules;
