use thiserror::Error;

/// Top-level error type for the `isogeo-api` crate.
///
/// Covers the failures that are fatal to a call: local validation,
/// authentication, transport and unclassified API responses. Expected
/// negatives (not found, duplicate) are not errors; they come back as
/// [`Outcome`](crate::Outcome) variants.
#[derive(Debug, Error)]
pub enum Error {
    // ── Local validation ────────────────────────────────────────────
    /// Input rejected before anything was sent (bad UUID, missing field).
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Token acquisition or refresh failed, or the API answered 401.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success response that is not one of the expected negatives,
    /// with the raw body as received.
    #[error("Isogeo API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A model could not be lowered to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Routes ──────────────────────────────────────────────────────
    /// The entity family has no route for the requested operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns `true` for token or 401 failures.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the input was rejected locally, before any request.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
