//! Authentication routes: login, logout, registration.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::api::JsonOrForm;
use crate::backend::ApiError;
use crate::backend::types::{LoginRequest, RegisterRequest, VerifyEmailRequest};
use crate::session::{self, UserProfile};

/// POST /api/auth/login - forward credentials to the backend; on success
/// persist the token and profile cookies. The token itself is never echoed
/// in the response body. Accepts JSON or a plain form post from the login
/// page.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonOrForm(req): JsonOrForm<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Application {
            status: axum::http::StatusCode::BAD_REQUEST,
            message: "email and password are required".into(),
        });
    }

    // AUTHENTICATING: a rejection propagates here and nothing is persisted.
    let auth = state.backend.authenticate(&req).await?;

    let profile = UserProfile {
        id: auth.user_id.to_string(),
        email: auth.email.clone(),
        role: auth
            .authorities
            .first()
            .cloned()
            .unwrap_or_else(|| "USER".to_string()),
    };

    info!(name: "auth.login", user_id = auth.user_id, email = %auth.email, "login succeeded");

    let jar = session::login_cookies(
        jar,
        &auth.token,
        &profile,
        state.config.session.cookie_secure,
    );

    Ok((
        jar,
        Json(json!({
            "userId": auth.user_id,
            "email": auth.email,
            "authorities": auth.authorities,
        })),
    ))
}

/// POST /api/auth/logout - explicit logout; clears both cookies.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    info!(name: "auth.logout", "clearing session cookies");
    (
        session::clear_cookies(jar),
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// POST /api/auth/register - public forward to the backend registration
/// endpoint; no credential is created here.
pub async fn register(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Application {
            status: axum::http::StatusCode::BAD_REQUEST,
            message: "email and password are required".into(),
        });
    }
    let body = state.backend.register(&req).await?;
    Ok(Json(body))
}

/// POST /api/auth/verify-email - confirm a registered address with the
/// mailed one-time code. Public; completes the registration flow before a
/// first login.
pub async fn verify_email(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<VerifyEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.email.trim().is_empty() || req.otp.trim().is_empty() {
        return Err(ApiError::Application {
            status: axum::http::StatusCode::BAD_REQUEST,
            message: "email and verification code are required".into(),
        });
    }
    let body = state.backend.verify_email(&req).await?;
    Ok(Json(body))
}
