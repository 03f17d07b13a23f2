//! Ticket-creation form: field names, declared defaults and the built-in
//! three-step rule set used by the helpdesk "new ticket" wizard.

use crate::error::CoreError;
use crate::types::{FieldValue, FormRecord};
use crate::validation::rule_set::{RuleSet, Step};
use crate::validation::rules::{RuleCheck, ValidationRule};

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const FIELD_REQUESTER_NAME: &str = "requester_name";
pub const FIELD_REQUESTER_EMAIL: &str = "requester_email";
pub const FIELD_DEPARTMENT: &str = "department";
pub const FIELD_BRANCH: &str = "branch";
pub const FIELD_SUBJECT: &str = "subject";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_PRIORITY: &str = "priority";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_ATTACHMENT: &str = "attachment";
pub const FIELD_CONFIRM_ACCURACY: &str = "confirm_accuracy";

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

pub const STEP_REQUESTER: &str = "requester";
pub const STEP_DETAILS: &str = "details";
pub const STEP_ATTACHMENTS: &str = "attachments";

/// Accepted ticket priorities.
pub const VALID_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

/// Default priority for new tickets.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Largest attachment accepted (10 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Content types accepted for attachments.
pub const ALLOWED_ATTACHMENT_TYPES: &[&str] =
    &["image/png", "image/jpeg", "application/pdf", "text/plain"];

pub const MAX_REQUESTER_NAME_LEN: usize = 100;
pub const MIN_SUBJECT_LEN: usize = 5;
pub const MAX_SUBJECT_LEN: usize = 150;
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Declared defaults for a fresh ticket form.
pub fn ticket_defaults() -> FormRecord {
    FormRecord::with_defaults(&[
        (FIELD_REQUESTER_NAME, FieldValue::from("")),
        (FIELD_REQUESTER_EMAIL, FieldValue::from("")),
        (FIELD_DEPARTMENT, FieldValue::from("")),
        (FIELD_BRANCH, FieldValue::from("")),
        (FIELD_SUBJECT, FieldValue::from("")),
        (FIELD_CATEGORY, FieldValue::from("")),
        (FIELD_PRIORITY, FieldValue::from(DEFAULT_PRIORITY)),
        (FIELD_DESCRIPTION, FieldValue::from("")),
        (FIELD_ATTACHMENT, FieldValue::Null),
        (FIELD_CONFIRM_ACCURACY, FieldValue::Bool(false)),
    ])
}

/// The built-in rule set: requester, details, attachments.
pub fn ticket_rule_set() -> Result<RuleSet, CoreError> {
    RuleSet::new(vec![
        Step::new(
            STEP_REQUESTER,
            "Requester",
            vec![
                ValidationRule::required(FIELD_REQUESTER_NAME, "Name is required"),
                ValidationRule::new(
                    FIELD_REQUESTER_NAME,
                    format!("Name must be at most {MAX_REQUESTER_NAME_LEN} characters"),
                    RuleCheck::MaxLength {
                        max: MAX_REQUESTER_NAME_LEN,
                    },
                ),
                ValidationRule::required(FIELD_REQUESTER_EMAIL, "Email is required"),
                ValidationRule::new(
                    FIELD_REQUESTER_EMAIL,
                    "Email address is invalid",
                    RuleCheck::Email,
                ),
                ValidationRule::required(FIELD_DEPARTMENT, "Department is required"),
                ValidationRule::required(FIELD_BRANCH, "Branch is required"),
            ],
        ),
        Step::new(
            STEP_DETAILS,
            "Ticket Details",
            vec![
                ValidationRule::required(FIELD_SUBJECT, "Subject is required"),
                ValidationRule::new(
                    FIELD_SUBJECT,
                    format!("Subject must be at least {MIN_SUBJECT_LEN} characters"),
                    RuleCheck::MinLength {
                        min: MIN_SUBJECT_LEN,
                    },
                ),
                ValidationRule::new(
                    FIELD_SUBJECT,
                    format!("Subject must be at most {MAX_SUBJECT_LEN} characters"),
                    RuleCheck::MaxLength {
                        max: MAX_SUBJECT_LEN,
                    },
                ),
                ValidationRule::required(FIELD_CATEGORY, "Category is required"),
                ValidationRule::required(FIELD_PRIORITY, "Priority is required"),
                ValidationRule::new(
                    FIELD_PRIORITY,
                    format!("Priority must be one of: {}", VALID_PRIORITIES.join(", ")),
                    RuleCheck::OneOf {
                        values: VALID_PRIORITIES.iter().map(|p| p.to_string()).collect(),
                    },
                ),
                ValidationRule::required(FIELD_DESCRIPTION, "Description is required"),
                ValidationRule::new(
                    FIELD_DESCRIPTION,
                    format!("Description must be at least {MIN_DESCRIPTION_LEN} characters"),
                    RuleCheck::MinLength {
                        min: MIN_DESCRIPTION_LEN,
                    },
                ),
            ],
        ),
        Step::new(
            STEP_ATTACHMENTS,
            "Attachments",
            vec![
                ValidationRule::new(
                    FIELD_ATTACHMENT,
                    "Attachment must be 10 MB or smaller",
                    RuleCheck::MaxFileSize {
                        max_bytes: MAX_ATTACHMENT_BYTES,
                    },
                ),
                ValidationRule::new(
                    FIELD_ATTACHMENT,
                    "Attachment must be a PNG, JPEG, PDF or plain text file",
                    RuleCheck::AllowedFileTypes {
                        content_types: ALLOWED_ATTACHMENT_TYPES
                            .iter()
                            .map(|t| t.to_string())
                            .collect(),
                    },
                ),
                ValidationRule::required(
                    FIELD_CONFIRM_ACCURACY,
                    "Please confirm the ticket details are accurate",
                ),
            ],
        ),
    ])
}
