//! Validation rule types.

use serde::{Deserialize, Serialize};

/// A declarative field-level rule.
///
/// The rule fails, recording `message` against `field`, when `check`
/// reports the field's value invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub field: String,
    pub message: String,
    #[serde(flatten)]
    pub check: RuleCheck,
}

impl ValidationRule {
    pub fn new(field: impl Into<String>, message: impl Into<String>, check: RuleCheck) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            check,
        }
    }

    pub fn required(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, RuleCheck::Required)
    }
}

/// The check a rule performs. Every variant except `Required` lets blank
/// values through; presence is `Required`'s job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleCheck {
    /// Blank text, `Null`, or `false`.
    Required,
    /// Text shorter than `min` characters.
    MinLength { min: usize },
    /// Text longer than `max` characters.
    MaxLength { max: usize },
    MinValue { min: f64 },
    MaxValue { max: f64 },
    /// Text that does not match the regex.
    Pattern { pattern: String },
    /// Text that is not a valid email address.
    Email,
    /// Text not among `values`.
    OneOf { values: Vec<String> },
    MaxFileSize { max_bytes: u64 },
    /// File whose content type is missing or not listed.
    AllowedFileTypes { content_types: Vec<String> },
    /// Named predicate from the engine's custom registry; true means invalid.
    Custom { id: String },
}

impl RuleCheck {
    /// Short identifier used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength { .. } => "min_length",
            Self::MaxLength { .. } => "max_length",
            Self::MinValue { .. } => "min_value",
            Self::MaxValue { .. } => "max_value",
            Self::Pattern { .. } => "pattern",
            Self::Email => "email",
            Self::OneOf { .. } => "one_of",
            Self::MaxFileSize { .. } => "max_file_size",
            Self::AllowedFileTypes { .. } => "allowed_file_types",
            Self::Custom { .. } => "custom",
        }
    }
}
