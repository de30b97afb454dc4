// Input validation and response classification
//
// Stateless helpers shared by every route: the UUID gate that runs before
// any request is built, and the status split between expected negatives
// (returned as data) and failures (returned as errors).

use reqwest::StatusCode;
use tracing::warn;
use uuid::Uuid;

use crate::error::Error;

/// Error body shape returned by the Isogeo API on rejected calls.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── UUID validation ─────────────────────────────────────────────────

/// Whether `candidate` is an identifier shape the Isogeo API accepts.
///
/// Accepted: 32 lowercase hex digits (`32f7e95ec4e94ca3bc1afda960003882`),
/// the lowercase 8-4-4-4-12 hyphenated form, and either of those behind a
/// `urn:uuid:` prefix. Braced and uppercase forms are rejected.
pub fn is_uuid(candidate: &str) -> bool {
    let raw = candidate.strip_prefix("urn:uuid:").unwrap_or(candidate);
    if raw.len() != 32 && raw.len() != 36 {
        return false;
    }
    let Ok(parsed) = Uuid::try_parse(raw) else {
        return false;
    };
    // `Uuid` parsing is case-insensitive, the API is not.
    let canonical = if raw.len() == 32 {
        parsed.simple().to_string()
    } else {
        parsed.hyphenated().to_string()
    };
    canonical == raw
}

/// Reject `candidate` with a validation error naming `what` if it is not a UUID.
pub fn ensure_uuid(candidate: &str, what: &str) -> Result<(), Error> {
    if is_uuid(candidate) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "{what} ID is not a correct UUID: {candidate:?}"
        )))
    }
}

// ── Response classification ─────────────────────────────────────────

/// How a response status is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 2xx: deserialize the body.
    Pass,
    /// 404: expected negative.
    NotFound,
    /// 409: expected negative.
    Conflict,
    /// 401: the bearer token was refused.
    Unauthorized,
    /// Any other status.
    Failure,
}

/// Classify a status code.
pub fn classify(status: StatusCode) -> Verdict {
    match status {
        s if s.is_success() => Verdict::Pass,
        StatusCode::NOT_FOUND => Verdict::NotFound,
        StatusCode::CONFLICT => Verdict::Conflict,
        StatusCode::UNAUTHORIZED => Verdict::Unauthorized,
        _ => Verdict::Failure,
    }
}

/// A response that cleared the checker.
#[derive(Debug)]
pub enum Checked {
    /// 2xx response, body not yet consumed.
    Passed(reqwest::Response),
    NotFound,
    Conflict(String),
}

/// Inspect a completed response.
///
/// Expected negatives come back as [`Checked`] variants; 401 becomes
/// [`Error::Authentication`] and every other non-2xx status becomes
/// [`Error::Api`] carrying the status and the response body.
pub async fn check_response(resp: reqwest::Response) -> Result<Checked, Error> {
    let status = resp.status();
    match classify(status) {
        Verdict::Pass => Ok(Checked::Passed(resp)),
        Verdict::NotFound => {
            warn!(url = %resp.url(), "resource not found (HTTP 404)");
            Ok(Checked::NotFound)
        }
        Verdict::Conflict => {
            let raw = resp.text().await.unwrap_or_default();
            warn!("request refused by the API (HTTP 409)");
            Ok(Checked::Conflict(error_message(status, &raw)))
        }
        Verdict::Unauthorized => {
            let raw = resp.text().await.unwrap_or_default();
            Err(Error::Authentication {
                message: format!("bearer token refused (HTTP 401): {}", error_message(status, &raw)),
            })
        }
        Verdict::Failure => {
            let raw = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: error_message(status, &raw),
                body: raw,
            })
        }
    }
}

/// Best-effort human message from an error body.
fn error_message(status: StatusCode, raw: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorResponse>(raw) {
        if let Some(message) = err.message.or(err.error) {
            return message;
        }
    }
    if raw.is_empty() {
        status.to_string()
    } else {
        raw.to_owned()
    }
}
