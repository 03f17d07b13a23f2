//! Validation engine: evaluates a rule set against form records.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::evaluator::{CustomPredicate, Evaluator};
use super::rule_set::{RuleSet, Scope};
use crate::error::CoreError;
use crate::types::{ErrorMap, FormRecord};

/// Result of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: ErrorMap,
}

/// Stateless evaluator over an immutable [`RuleSet`].
///
/// Callers own their error state; the engine never merges into it. A full
/// (`Scope::All`) pass is meant to replace the caller's map wholesale. A
/// step pass only reports fields referenced by that step.
pub struct ValidationEngine {
    rule_set: RuleSet,
    evaluator: Evaluator,
}

impl ValidationEngine {
    pub fn new(rule_set: RuleSet) -> Result<Self, CoreError> {
        Self::with_custom(rule_set, HashMap::new())
    }

    /// Build an engine whose `custom` rules resolve against `custom`.
    pub fn with_custom(
        rule_set: RuleSet,
        custom: HashMap<String, CustomPredicate>,
    ) -> Result<Self, CoreError> {
        let evaluator = Evaluator::compile(&rule_set, custom)?;
        Ok(Self {
            rule_set,
            evaluator,
        })
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Evaluate the rules of `scope` against `data`.
    ///
    /// When several failing rules target the same field, the last one in
    /// flattened step order supplies the message.
    pub fn validate(&self, data: &FormRecord, scope: &Scope) -> Result<ValidationOutcome, CoreError> {
        let rules = self.rule_set.rules_for(scope)?;
        let errors = self.evaluator.evaluate(rules, data);
        tracing::trace!(scope = %scope, failed = errors.len(), "Validation pass complete");
        Ok(ValidationOutcome {
            valid: errors.is_empty(),
            errors,
        })
    }

    /// Evaluate every rule targeting `field`, across all steps.
    pub fn validate_field(&self, data: &FormRecord, field: &str) -> Option<String> {
        self.evaluator
            .evaluate(self.rule_set.rules_for_field(field), data)
            .remove(field)
    }

    /// Drop one field's error ahead of the next validation pass.
    pub fn clear_field(errors: &ErrorMap, field: &str) -> ErrorMap {
        let mut cleared = errors.clone();
        cleared.remove(field);
        cleared
    }

    /// Replace the error map with server-reported field errors. Local rules
    /// are not consulted and prior entries are discarded.
    pub fn merge_server_errors(
        _errors: &ErrorMap,
        server_errors: &BTreeMap<String, String>,
    ) -> ErrorMap {
        ErrorMap::from(server_errors.clone())
    }
}
