use thiserror::Error;

/// Failure reported by a backend collaborator (gateway, storage, geocoder).
///
/// Variants carry rendered messages rather than library error types so the
/// domain stays independent of the HTTP client in use.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Backend responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Could not decode backend response: {0}")]
    Decode(String),
    #[error("Realtime feed error: {0}")]
    Realtime(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the client flows.
///
/// None of these are fatal: callers render a notice and keep the view alive.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The action needs a signed-in user.
    #[error("Authentication required")]
    AuthRequired,
    /// Input rejected before any gateway call was made.
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Failed to fetch: {0}")]
    FetchError(#[source] GatewayError),
    #[error("Failed to insert: {0}")]
    InsertError(#[source] GatewayError),
    #[error("Failed to update: {0}")]
    UpdateError(#[source] GatewayError),
    #[error("Failed to delete: {0}")]
    DeleteError(#[source] GatewayError),
    #[error("Failed to upload: {0}")]
    UploadError(#[source] GatewayError),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Programming error, e.g. an unknown report-kind selector.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl DomainError {
    /// Whether the user can recover by signing in.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, DomainError::AuthRequired)
    }
}
