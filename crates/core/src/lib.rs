//! Helpdesk form-validation core.
//!
//! Pure domain logic for the ticket-creation wizard: field values and form
//! records, declarative validation rules grouped into steps, and the
//! validation engine that evaluates them into per-field error maps.
//! Nothing here performs I/O or depends on an async runtime.

pub mod error;
pub mod ticket_form;
pub mod types;
pub mod validation;

pub use error::CoreError;
pub use types::{ErrorMap, FieldValue, FileHandle, FormRecord, FORM_ERROR_KEY};
pub use validation::engine::{ValidationEngine, ValidationOutcome};
pub use validation::rule_set::{RuleSet, Scope, Step};
pub use validation::rules::{RuleCheck, ValidationRule};
