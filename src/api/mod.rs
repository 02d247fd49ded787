//! Same-origin JSON API mirroring the backend operations.
//!
//! Every route reads the stored credential from the request's cookies and
//! forwards through the single [`BackendClient`](crate::backend::BackendClient);
//! there is no per-route fetch logic.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Form, Json, Router};
use serde::de::DeserializeOwned;

use crate::AppState;

pub mod auth;
pub mod tickets;
pub mod users;

/// Request body accepted as either JSON or an urlencoded form.
///
/// Script clients send JSON; the rendered pages submit plain HTML forms.
/// Both deserialize into the same request type.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(value));
        }
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(value))
    }
}

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-email", post(auth::verify_email))
        // Tickets
        .route("/tickets/assignable-agents", get(tickets::assignable_agents))
        .route(
            "/tickets",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route(
            "/tickets/{id}",
            get(tickets::get_ticket).delete(tickets::delete_ticket),
        )
        .route("/tickets/{id}/info", patch(tickets::update_ticket_info))
        .route("/tickets/{id}/status", patch(tickets::update_ticket_status))
        .route("/tickets/{id}/assign", patch(tickets::assign_ticket))
        .route(
            "/tickets/{id}/comments",
            get(tickets::list_comments).post(tickets::add_comment),
        )
        // User administration
        .route(
            "/admin/users",
            get(users::list_users).post(users::create_user),
        )
        .route("/admin/users/{id}", delete(users::delete_user))
}
