use serde::Deserialize;
use thiserror::Error;

use crate::auth::SessionError;
use crate::utils::truncate_string;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the attached token. The session has already been
    /// cleared and a navigation to login emitted.
    #[error("Unauthorized - session expired or revoked")]
    Unauthorized,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Shown for transport failures, where there is no backend message
const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Shown for a 5xx without a usable body
const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again.";

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Pull the backend's `message` (or `error`) field out of a JSON error
    /// body, falling back to the truncated raw body.
    pub fn extract_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| truncate_string(body, MAX_ERROR_BODY_LENGTH))
    }

    /// Classify a non-success status. 401 maps to `Unauthorized`; callers
    /// on public endpoints translate that themselves.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            code => ApiError::Rejected {
                status: code,
                message,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Whether a retry affordance makes sense for this failure
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::RateLimited | ApiError::ServerError(_)
        )
    }

    /// Inline message for a view's error state
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::ServerError(m) if m.trim().is_empty() => SERVER_ERROR_MESSAGE.to_string(),
            ApiError::InvalidCredentials(m)
            | ApiError::AccessDenied(m)
            | ApiError::NotFound(m)
            | ApiError::ServerError(m)
            | ApiError::Rejected { message: m, .. }
                if !m.is_empty() =>
            {
                m.clone()
            }
            other => other.to_string(),
        }
    }
}
