//! Error taxonomy for the forwarding layer.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::session;

/// Everything that can go wrong between a handler and the backend.
///
/// `SessionExpired` is the only variant with a global side effect: its
/// response removes both session cookies so the browser re-authenticates.
/// All other variants stay local to the caller and are never retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential was present when one was required. The backend is
    /// never contacted in this case.
    #[error("Unauthorized")]
    Unauthenticated,

    /// The backend signalled that the bearer token is no longer valid.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// Any other non-2xx backend response; the message is passed through
    /// to the caller as-is.
    #[error("{message}")]
    Application { status: StatusCode, message: String },

    /// Network failure, or a non-JSON body where JSON was expected.
    #[error("backend request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL to keep credentials and hosts out of user-facing text.
        Self::Transport(err.without_url().to_string())
    }
}

impl ApiError {
    /// HTTP status used when this error is rendered as a JSON response.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::SessionExpired => StatusCode::UNAUTHORIZED,
            Self::Application { status, .. } => *status,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        match self {
            // Expiry clears the credential cookies even on the JSON
            // surface, so no stale client state survives.
            Self::SessionExpired => {
                let jar = session::clear_cookies(axum_extra::extract::CookieJar::new());
                (status, jar, body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
