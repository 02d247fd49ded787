//! Session controller: credential cookies and forced re-authentication.
//!
//! The browser holds two cookies, both scoped to `/` with a fixed 24-hour
//! TTL set at issuance (never refreshed):
//!
//! - `jwt_token` - the opaque bearer credential, HTTP-only.
//! - `user_data` - a denormalized `{id, email, role}` profile snapshot,
//!   readable by client script, purely for display. Not authoritative.
//!
//! Session lifecycle: ANONYMOUS → AUTHENTICATING → AUTHENTICATED, then
//! back to ANONYMOUS via explicit logout or via EXPIRED when the backend
//! signals token invalidity. A rejected login surfaces the error and
//! persists nothing. [`expire_session`] is the single exit path for the
//! EXPIRED state: it clears both cookies and forces a full navigation to
//! `/login` so no stale client state survives. It is idempotent - expiring
//! an already-anonymous session is a no-op beyond the redirect.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// HTTP-only cookie holding the bearer credential.
pub const TOKEN_COOKIE: &str = "jwt_token";
/// Client-readable cookie holding the profile snapshot.
pub const PROFILE_COOKIE: &str = "user_data";
/// Fixed credential lifetime, set at issuance.
pub const SESSION_TTL: time::Duration = time::Duration::hours(24);
/// Login entry point for forced navigation.
pub const LOGIN_PATH: &str = "/login";

/// Denormalized profile cached alongside the credential for display.
/// May drift from backend truth until the next fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub role: String,
}

/// Strip a redundant `"Bearer "` prefix so the forwarder never produces
/// `Authorization: Bearer Bearer <token>`.
pub fn normalize_token(raw: &str) -> &str {
    raw.strip_prefix("Bearer ").unwrap_or(raw)
}

/// Per-request view of the stored credential and profile.
///
/// Built explicitly from the request's cookie jar - there is no ambient
/// global session state anywhere in the application.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Option<String>,
    profile: Option<UserProfile>,
}

impl Session {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let credential = jar
            .get(TOKEN_COOKIE)
            .map(|cookie| normalize_token(cookie.value()).to_string())
            .filter(|token| !token.is_empty());

        let profile = jar.get(PROFILE_COOKIE).and_then(|cookie| {
            let decoded = percent_decode_str(cookie.value()).decode_utf8().ok()?;
            match serde_json::from_str::<UserProfile>(&decoded) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!(name: "session.profile.unreadable", error = %err, "user_data cookie did not parse");
                    None
                }
            }
        });

        Self { credential, profile }
    }

    /// The normalized bearer token, if present.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

/// Persist a fresh credential and profile after a successful login.
pub fn login_cookies(
    jar: CookieJar,
    token: &str,
    profile: &UserProfile,
    secure: bool,
) -> CookieJar {
    let token_cookie = Cookie::build((TOKEN_COOKIE, normalize_token(token).to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(SESSION_TTL)
        .path("/")
        .build();

    let encoded = utf8_percent_encode(
        &serde_json::to_string(profile).unwrap_or_default(),
        NON_ALPHANUMERIC,
    )
    .to_string();
    let profile_cookie = Cookie::build((PROFILE_COOKIE, encoded))
        // Readable by client script for display.
        .http_only(false)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(SESSION_TTL)
        .path("/")
        .build();

    jar.add(token_cookie).add(profile_cookie)
}

/// Remove both session cookies. Safe to call when they are already gone.
///
/// Clearing is done by re-setting each cookie to an empty value with
/// `Max-Age=0`, so the removal header is emitted even from responses that
/// never saw the original request cookies.
pub fn clear_cookies(jar: CookieJar) -> CookieJar {
    jar.add(removal(TOKEN_COOKIE)).add(removal(PROFILE_COOKIE))
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// `expireSession()`: clear all locally held credential state and force a
/// full navigation (not a soft route change) to the login entry point.
///
/// Only the classifier's expiry verdict may trigger this.
pub fn expire_session(jar: CookieJar) -> Response {
    tracing::info!(name: "session.expired", "clearing credentials and redirecting to login");
    (clear_cookies(jar), Redirect::to(LOGIN_PATH)).into_response()
}
