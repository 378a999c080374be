use thiserror::Error;

// Every failure a gateway caller can surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("you are not logged in")]
    Unauthenticated,
    #[error("your session has expired, please log in again")]
    SessionExpired,
    #[error("{0}")]
    RequestFailed(String),
    #[error("could not reach the server: {0}")]
    NetworkError(String),
    // Rejected locally before any request was built.
    #[error("{0}")]
    Validation(String),
}

impl GatewayError {
    // True when the caller has to log in again before retrying.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            GatewayError::Unauthenticated | GatewayError::SessionExpired
        )
    }
}
