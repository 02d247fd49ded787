//! Ticket routes: listing, CRUD, assignment, comments.
//!
//! Each handler reads the cookie credential, forwards through the backend
//! client, and returns the backend body unchanged. Error mapping
//! (including the session-expiry cookie clearing) lives in
//! [`ApiError`](crate::backend::ApiError)'s response impl.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use reqwest::Method;
use serde_json::Value;

use crate::AppState;
use crate::backend::ApiError;
use crate::backend::types::{CreateCommentRequest, ListQuery};
use crate::session::Session;

fn credential(jar: &CookieJar) -> Option<String> {
    Session::from_jar(jar).credential().map(ToString::to_string)
}

/// GET /api/tickets - paginated, filterable listing. Role-based scoping
/// (own vs assigned vs all) is applied by the backend from the token.
pub async fn list_tickets(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::GET,
            "/tickets",
            &query.to_query_pairs(),
            None,
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// POST /api/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::POST,
            "/tickets",
            &[],
            Some(&req),
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// GET /api/tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::GET,
            &format!("/tickets/{id}"),
            &[],
            None,
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// DELETE /api/tickets/{id}
pub async fn delete_ticket(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::DELETE,
            &format!("/tickets/{id}"),
            &[],
            None,
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// PATCH /api/tickets/{id}/info - requester edits of title/description/etc.
pub async fn update_ticket_info(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::PATCH,
            &format!("/tickets/{id}/info"),
            &[],
            Some(&req),
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// PATCH /api/tickets/{id}/status - agent-driven workflow transitions.
pub async fn update_ticket_status(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::PATCH,
            &format!("/tickets/{id}/status"),
            &[],
            Some(&req),
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// PATCH /api/tickets/{id}/assign
pub async fn assign_ticket(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::PATCH,
            &format!("/tickets/{id}/assign"),
            &[],
            Some(&req),
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// GET /api/tickets/assignable-agents
pub async fn assignable_agents(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::GET,
            "/tickets/assignable-agents",
            &[],
            None,
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// GET /api/tickets/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .backend
        .request(
            Method::GET,
            &format!("/tickets/{id}/comments"),
            &[],
            None,
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}

/// POST /api/tickets/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::Application {
            status: StatusCode::BAD_REQUEST,
            message: "comment content is required".into(),
        });
    }
    let payload = serde_json::to_value(&req).map_err(|err| ApiError::Transport(err.to_string()))?;
    let body = state
        .backend
        .request(
            Method::POST,
            &format!("/tickets/{id}/comments"),
            &[],
            Some(&payload),
            credential(&jar).as_deref(),
        )
        .await?;
    Ok(Json(body))
}
