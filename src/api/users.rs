//! Administrator user-management routes.
//!
//! Authorization is enforced by the backend from the forwarded token; these
//! routes only attach the credential and pass results through.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum_extra::extract::CookieJar;
use reqwest::Method;
use serde_json::Value;

use crate::AppState;
use crate::backend::ApiError;
use crate::backend::types::ListQuery;
use crate::session::Session;

fn credential(jar: &CookieJar) -> Option<String> {
    Session::from_jar(jar).credential().map(ToString::to_string)
}

/// GET /api/admin/users - paginated user listing.
pub async fn list_users(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::GET,
            "/admin/users",
            &query.to_query_pairs(),
            None,
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// POST /api/admin/users - create a support agent or administrator.
pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::POST,
            "/admin/create-support-agent",
            &[],
            Some(&req),
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::DELETE,
            &format!("/admin/users/{id}"),
            &[],
            None,
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}
