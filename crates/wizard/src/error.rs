use helpdesk_core::CoreError;

/// Error type for wizard operations.
///
/// User-data validation failures are never errors; they land in the
/// wizard's error map. These variants cover misuse and misconfiguration.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// A domain-level error from `helpdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// `next`, `previous` or `submit` was called while a submission is
    /// awaiting the collaborator.
    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error("Configuration error: {0}")]
    Config(String),
}
