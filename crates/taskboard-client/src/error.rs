//! Error types for taskboard API calls.

use thiserror::Error;

/// Errors that can occur while talking to the board API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid API URL: {0}")]
    Url(String),

    /// Reading or writing the persisted session failed.
    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 })
    }
}

/// Errors raised by [`crate::session::SessionStore`] implementations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file contents are not valid JSON.
    #[error("Malformed session file: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the session lock.
    #[error("Session lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code() {
        let err = ApiError::Status { status: 401 };
        assert_eq!(err.to_string(), "HTTP error! status: 401");
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn other_errors_have_no_status() {
        let err = ApiError::Url("mailto:nobody".into());
        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
        assert!(!ApiError::Status { status: 500 }.is_unauthorized());
    }

    #[test]
    fn session_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ApiError::from(SessionError::from(io));
        assert!(err.to_string().contains("denied"));
    }
}
