//! Form validation engine.
//!
//! Provides declarative rule types, step-grouped rule sets and a pure-logic
//! evaluator that turns a form record into a per-field error map.

pub mod engine;
mod evaluator;
pub mod rule_set;
pub mod rules;

pub use evaluator::CustomPredicate;
