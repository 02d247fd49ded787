//! Backend response classification.
//!
//! Every reply from the ticketing backend passes through [`classify`], which
//! sorts it into success, application error, session expiry, or a malformed
//! body. Expiry detection is substring matching on human-readable message
//! text; the marker list is deliberately explicit and lives in one place.
//! The backend has been observed to embed an expiry notice in an
//! otherwise-200 payload, so markers are checked even on success statuses.

use axum::http::StatusCode;
use serde_json::Value;

/// Exact phrases the backend uses when a bearer token is no longer valid.
const EXPIRY_MARKERS: &[&str] = &[
    "jwt token is invalid or expired",
    "token is invalid",
    "token has expired",
    "authentication failed",
    "unauthorized access",
];

/// Words that, combined with "jwt", also indicate an invalid token.
const JWT_QUALIFIERS: &[&str] = &["invalid", "expired", "malformed", "signature"];

/// Verdict for one backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// 2xx with a well-formed body and no expiry marker; body passed
    /// through unchanged.
    Success(Value),
    /// The session credential is no longer valid, regardless of status.
    Expired,
    /// Any other non-2xx response; carries the backend's message text and
    /// the original status.
    App { status: StatusCode, message: String },
    /// 2xx body that was expected to be JSON but was not.
    Malformed(String),
}

/// Case-insensitive check of `text` against the expiry marker allow-list.
pub fn is_expiry_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    EXPIRY_MARKERS.iter().any(|marker| lower.contains(marker))
        || (lower.contains("jwt") && JWT_QUALIFIERS.iter().any(|word| lower.contains(word)))
}

/// Pull message strings out of an error envelope.
///
/// Accepts `messages` as an array or scalar, falling back to a scalar
/// `message` field. Non-string array entries are skipped.
pub fn extract_messages(body: &Value) -> Vec<String> {
    let field = body.get("messages").or_else(|| body.get("message"));
    match field {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| entry.as_str().map(ToString::to_string))
            .collect(),
        Some(Value::String(message)) => vec![message.clone()],
        _ => Vec::new(),
    }
}

/// Classify one backend response from its status and raw body text.
pub fn classify(status: StatusCode, body: &str) -> Classified {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => {
            let messages = extract_messages(&json);
            // Joined messages take priority over the raw body as the
            // haystack. On success statuses only the message envelope is
            // consulted, so a ticket description that happens to mention a
            // token cannot expire the session.
            let haystack = if messages.is_empty() {
                if status.is_success() {
                    String::new()
                } else {
                    body.to_string()
                }
            } else {
                messages.join(" | ")
            };
            if !haystack.is_empty() && is_expiry_marker(&haystack) {
                return Classified::Expired;
            }
            if status.is_success() {
                return Classified::Success(json);
            }
            let message = if messages.is_empty() {
                non_empty_or_status(body, status)
            } else {
                messages.join("\n")
            };
            Classified::App { status, message }
        }
        Err(_) => {
            if is_expiry_marker(body) {
                return Classified::Expired;
            }
            if status.is_success() {
                // Empty 2xx bodies (204, bodyless DELETE replies) are fine;
                // anything else was supposed to be JSON.
                if body.trim().is_empty() {
                    return Classified::Success(Value::Null);
                }
                return Classified::Malformed(body.to_string());
            }
            Classified::App {
                status,
                message: non_empty_or_status(body, status),
            }
        }
    }
}

fn non_empty_or_status(body: &str, status: StatusCode) -> String {
    if body.trim().is_empty() {
        format!("HTTP error! status: {}", status.as_u16())
    } else {
        body.to_string()
    }
}
