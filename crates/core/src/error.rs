#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown validation scope: {0}")]
    UnknownScope(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
