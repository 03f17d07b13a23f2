//! Rules grouped into ordered wizard steps.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rules::{RuleCheck, ValidationRule};
use crate::error::CoreError;

/// Scope sentinel covering every step.
pub const SCOPE_ALL: &str = "all";

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Which rules a validation pass evaluates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    All,
    Step(String),
}

impl Scope {
    pub fn step(id: impl Into<String>) -> Self {
        Self::Step(id.into())
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        if s == SCOPE_ALL {
            Self::All
        } else {
            Self::Step(s.to_string())
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(SCOPE_ALL),
            Self::Step(id) => f.write_str(id),
        }
    }
}

// ---------------------------------------------------------------------------
// Step / RuleSet
// ---------------------------------------------------------------------------

/// One screen of the wizard and the rules validated together on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
}

impl Step {
    pub fn new(id: impl Into<String>, label: impl Into<String>, rules: Vec<ValidationRule>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            rules,
        }
    }
}

/// Immutable, ordered collection of steps.
///
/// Every `pattern` rule's regex is compiled once, when the set is built.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    steps: Vec<Step>,
    #[serde(skip)]
    patterns: HashMap<String, Regex>,
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

#[derive(Deserialize)]
struct RuleSetFile {
    steps: Vec<Step>,
}

impl RuleSet {
    /// Build a rule set, rejecting empty step lists, duplicate or reserved
    /// step ids, and regex patterns that do not compile.
    pub fn new(steps: Vec<Step>) -> Result<Self, CoreError> {
        if steps.is_empty() {
            return Err(CoreError::Validation(
                "Rule set must define at least one step".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut patterns = HashMap::new();
        for step in &steps {
            if step.id == SCOPE_ALL {
                return Err(CoreError::Validation(format!(
                    "Step id '{SCOPE_ALL}' is reserved"
                )));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate step id '{}'",
                    step.id
                )));
            }
            for rule in &step.rules {
                let RuleCheck::Pattern { pattern } = &rule.check else {
                    continue;
                };
                if patterns.contains_key(pattern) {
                    continue;
                }
                let re = Regex::new(pattern).map_err(|e| {
                    CoreError::Validation(format!(
                        "Invalid pattern for field '{}' in step '{}': {e}",
                        rule.field, step.id
                    ))
                })?;
                patterns.insert(pattern.clone(), re);
            }
        }

        Ok(Self { steps, patterns })
    }

    /// Load a rule set from JSON of the form `{"steps": [{"id", "label", "rules"}]}`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let file: RuleSetFile = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Invalid rule set JSON: {e}")))?;
        Self::new(file.steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Step at a 1-based position.
    pub fn step_at(&self, position: usize) -> Option<&Step> {
        position.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// 1-based position of a step id.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id).map(|i| i + 1)
    }

    /// Ordered rules for a scope. `All` flattens every step in definition
    /// order.
    pub fn rules_for(&self, scope: &Scope) -> Result<Vec<&ValidationRule>, CoreError> {
        match scope {
            Scope::All => Ok(self.steps.iter().flat_map(|s| s.rules.iter()).collect()),
            Scope::Step(id) => self
                .steps
                .iter()
                .find(|s| &s.id == id)
                .map(|s| s.rules.iter().collect())
                .ok_or_else(|| CoreError::UnknownScope(id.clone())),
        }
    }

    /// Field names referenced by a scope's rules.
    pub fn fields_for(&self, scope: &Scope) -> Result<BTreeSet<&str>, CoreError> {
        Ok(self
            .rules_for(scope)?
            .into_iter()
            .map(|r| r.field.as_str())
            .collect())
    }

    /// Every rule targeting `field`, in flattened step order.
    pub fn rules_for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationRule> {
        self.steps
            .iter()
            .flat_map(|s| s.rules.iter())
            .filter(move |r| r.field == field)
    }

    /// Compiled regex for a `pattern` rule's source text.
    pub fn pattern(&self, source: &str) -> Option<&Regex> {
        self.patterns.get(source)
    }

    pub(crate) fn patterns(&self) -> &HashMap<String, Regex> {
        &self.patterns
    }

    pub(crate) fn all_rules(&self) -> impl Iterator<Item = &ValidationRule> {
        self.steps.iter().flat_map(|s| s.rules.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn two_steps() -> RuleSet {
        RuleSet::new(vec![
            Step::new(
                "step1",
                "Requester",
                vec![ValidationRule::required("name", "Name is required")],
            ),
            Step::new(
                "step2",
                "Details",
                vec![
                    ValidationRule::required("subject", "Subject is required"),
                    ValidationRule::required("category", "Category is required"),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn scope_parses_all_sentinel() {
        assert_eq!(Scope::from("all"), Scope::All);
        assert_eq!(Scope::from("step1"), Scope::step("step1"));
        assert_eq!(Scope::All.to_string(), "all");
    }

    #[test]
    fn all_flattens_in_step_order() {
        let set = two_steps();
        let fields: Vec<&str> = set
            .rules_for(&Scope::All)
            .unwrap()
            .iter()
            .map(|r| r.field.as_str())
            .collect();
        assert_eq!(fields, vec!["name", "subject", "category"]);
    }

    #[test]
    fn unknown_step_is_an_error() {
        let set = two_steps();
        assert_matches!(
            set.rules_for(&Scope::step("step9")),
            Err(CoreError::UnknownScope(id)) if id == "step9"
        );
    }

    #[test]
    fn positions_are_one_based() {
        let set = two_steps();
        assert_eq!(set.step_count(), 2);
        assert_eq!(set.step_at(1).unwrap().id, "step1");
        assert!(set.step_at(0).is_none());
        assert!(set.step_at(3).is_none());
        assert_eq!(set.position_of("step2"), Some(2));
    }

    #[test]
    fn rejects_empty_and_duplicate_steps() {
        assert!(RuleSet::new(vec![]).is_err());
        assert!(RuleSet::new(vec![
            Step::new("a", "", vec![]),
            Step::new("a", "", vec![]),
        ])
        .is_err());
        assert!(RuleSet::new(vec![Step::new("all", "", vec![])]).is_err());
    }

    #[test]
    fn rejects_invalid_pattern() {
        let rule = ValidationRule::new(
            "code",
            "Bad code",
            RuleCheck::Pattern {
                pattern: "([a-z".to_string(),
            },
        );
        assert_matches!(
            RuleSet::new(vec![Step::new("s", "", vec![rule])]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn patterns_compiled_once_per_source() {
        let code = |field: &str| {
            ValidationRule::new(
                field,
                "Bad code",
                RuleCheck::Pattern {
                    pattern: "^[A-Z]{3}-\\d+$".to_string(),
                },
            )
        };
        let set = RuleSet::new(vec![
            Step::new("s1", "", vec![code("asset_tag")]),
            Step::new("s2", "", vec![code("ticket_ref")]),
        ])
        .unwrap();

        assert_eq!(set.patterns().len(), 1);
        let re = set.pattern("^[A-Z]{3}-\\d+$").unwrap();
        assert!(re.is_match("ABC-42"));
        assert!(set.pattern("^x$").is_none());
        assert_eq!(set.clone(), set);
    }

    #[test]
    fn loads_from_json() {
        let set = RuleSet::from_json(
            r#"{
                "steps": [
                    { "id": "step1", "rules": [
                        { "field": "name", "message": "Name is required", "kind": "required" }
                    ]},
                    { "id": "step2", "label": "Details", "rules": [] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(set.step_count(), 2);
        assert_eq!(set.fields_for(&Scope::step("step1")).unwrap().len(), 1);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert_matches!(RuleSet::from_json("{"), Err(CoreError::Config(_)));
    }
}
