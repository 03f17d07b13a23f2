//! Outbound collaborator contracts.
//!
//! The wizard knows nothing about HTTP verbs, endpoints or timeouts. It hands
//! the completed [`FormRecord`] to a [`SubmitCollaborator`] and interprets the
//! answer as success or a field-level rejection.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_core::FormRecord;

/// Answer from the backend for a completed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    /// Server-side validation rejected the form, keyed by field name.
    ValidationFailure(BTreeMap<String, String>),
}

/// Failure that carries no field-level detail.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmitError {
    /// The request could not be delivered (network, DNS, TLS, etc.).
    #[error("Could not reach the server: {0}")]
    Transport(String),

    #[error("The server did not respond in time")]
    Timeout,

    /// The server answered with an unexpected status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Sends a completed form to the backend.
#[async_trait]
pub trait SubmitCollaborator: Send + Sync {
    async fn submit(&self, payload: &FormRecord) -> Result<SubmitOutcome, SubmitError>;
}

/// Invoked after a successful submission has reset the wizard, e.g. to
/// close the dialog that hosts it.
pub type SubmittedHook = Arc<dyn Fn() + Send + Sync>;
