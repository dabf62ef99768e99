use speech_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ApplicationError {
    /// True when the caller sent something unusable, as opposed to a provider or server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApplicationError::Validation(_)
                | ApplicationError::Domain(DomainError::InvalidInput { .. })
        )
    }
}
