//! Helpdesk ticket-creation wizard.
//!
//! This crate drives the multi-step "new ticket" flow on top of the
//! validation engine in `helpdesk_core`:
//!
//! - [`WizardController`]: step state machine owning form data, error
//!   state and the in-flight submission flag.
//! - [`SubmitCollaborator`]: outbound contract for sending a completed
//!   form to the backend.
//! - [`WizardConfig`]: environment-driven rule-set configuration.

pub mod config;
pub mod controller;
pub mod error;
pub mod submit;

pub use config::{LoadedForm, WizardConfig};
pub use controller::{StepOutcome, SubmitResult, WizardController, WizardSnapshot};
pub use error::WizardError;
pub use submit::{SubmitCollaborator, SubmitError, SubmitOutcome, SubmittedHook};
