//! Rule evaluator: pure logic, no I/O.

use std::collections::HashMap;

use regex::Regex;
use validator::ValidateEmail;

use super::rule_set::RuleSet;
use super::rules::{RuleCheck, ValidationRule};
use crate::error::CoreError;
use crate::types::{ErrorMap, FieldValue, FormRecord};

/// A named predicate for `custom` rules. Returns `true` when the record is
/// invalid for the rule's field.
pub type CustomPredicate = fn(&FormRecord) -> bool;

/// Compiled state needed to evaluate rules: regexes and custom predicates.
pub(crate) struct Evaluator {
    patterns: HashMap<String, Regex>,
    custom: HashMap<String, CustomPredicate>,
}

impl Evaluator {
    /// Take the rule set's compiled patterns and resolve every custom
    /// predicate id against `custom`.
    pub(crate) fn compile(
        rule_set: &RuleSet,
        custom: HashMap<String, CustomPredicate>,
    ) -> Result<Self, CoreError> {
        for rule in rule_set.all_rules() {
            if let RuleCheck::Custom { id } = &rule.check {
                if !custom.contains_key(id) {
                    return Err(CoreError::Validation(format!(
                        "Custom predicate '{id}' for field '{}' is not registered",
                        rule.field
                    )));
                }
            }
        }
        Ok(Self {
            patterns: rule_set.patterns().clone(),
            custom,
        })
    }

    /// Evaluate rules in order. A failing rule overwrites any earlier message
    /// for the same field, so the last failing rule wins.
    pub(crate) fn evaluate<'a>(
        &self,
        rules: impl IntoIterator<Item = &'a ValidationRule>,
        data: &FormRecord,
    ) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for rule in rules {
            if self.fails(rule, data) {
                tracing::trace!(field = %rule.field, rule = rule.check.kind(), "Rule failed");
                errors.insert(rule.field.clone(), rule.message.clone());
            }
        }
        errors
    }

    fn fails(&self, rule: &ValidationRule, data: &FormRecord) -> bool {
        let value = data.get(&rule.field);

        match &rule.check {
            RuleCheck::Required => is_missing(value),
            RuleCheck::MinLength { min } => text(value).is_some_and(|s| s.chars().count() < *min),
            RuleCheck::MaxLength { max } => text(value).is_some_and(|s| s.chars().count() > *max),
            RuleCheck::MinValue { min } => value.as_number().is_some_and(|n| n < *min),
            RuleCheck::MaxValue { max } => value.as_number().is_some_and(|n| n > *max),
            RuleCheck::Pattern { pattern } => match (text(value), self.patterns.get(pattern)) {
                (Some(s), Some(re)) => !re.is_match(s),
                _ => false,
            },
            RuleCheck::Email => text(value).is_some_and(|s| !s.trim().to_string().validate_email()),
            RuleCheck::OneOf { values } => {
                text(value).is_some_and(|s| !values.iter().any(|v| v == s))
            }
            RuleCheck::MaxFileSize { max_bytes } => {
                value.as_file().is_some_and(|f| f.size_bytes > *max_bytes)
            }
            RuleCheck::AllowedFileTypes { content_types } => value.as_file().is_some_and(|f| {
                f.content_type
                    .as_deref()
                    .map_or(true, |ct| !content_types.iter().any(|allowed| allowed == ct))
            }),
            RuleCheck::Custom { id } => self.custom.get(id).is_some_and(|predicate| predicate(data)),
        }
    }
}

fn is_missing(value: &FieldValue) -> bool {
    value.is_blank() || value.as_bool() == Some(false)
}

/// Non-blank text, or `None` so that non-required checks skip the value.
fn text(value: &FieldValue) -> Option<&str> {
    value.as_text().filter(|s| !s.trim().is_empty())
}
