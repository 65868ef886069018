//! Fetch lifecycle error types

use super::ApiError;

/// Why the fetch lifecycle considered the session unauthorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// No credential record was stored.
    MissingCredential,
    /// The stored credential record could not be parsed or had no token.
    MalformedCredential,
    /// The stored credential carries an expiry that has passed.
    ExpiredCredential,
    /// The server answered with HTTP 401.
    Rejected,
}

impl std::fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "no stored credential"),
            Self::MalformedCredential => write!(f, "stored credential is malformed"),
            Self::ExpiredCredential => write!(f, "stored credential has expired"),
            Self::Rejected => write!(f, "credential rejected by server"),
        }
    }
}

/// Normalized error recorded by a fetch lifecycle.
///
/// Unlike [`ApiError`] this is `Clone`, so it can live in shared state and
/// be handed out to every observer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Missing, malformed, or rejected credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(UnauthorizedReason),

    /// Any other network or non-success response.
    #[error("Request failed: {message}")]
    RequestFailed {
        /// HTTP status, when the server answered.
        status: Option<u16>,
        /// Human-readable description.
        message: String,
    },
}

impl FetchError {
    /// Creates a request failure without a status code.
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: None,
            message: message.into(),
        }
    }

    /// Returns `true` for the unauthorized variant.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Returns the HTTP status code, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(UnauthorizedReason::Rejected) => Some(401),
            Self::Unauthorized(_) => None,
            Self::RequestFailed { status, .. } => *status,
        }
    }
}

impl From<&ApiError> for FetchError {
    fn from(err: &ApiError) -> Self {
        if err.is_unauthorized() {
            return Self::Unauthorized(UnauthorizedReason::Rejected);
        }
        Self::RequestFailed {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        Self::from(&err)
    }
}
