//! Authenticated request forwarder.
//!
//! [`BackendClient`] is the single place where outbound calls to the
//! ticketing backend are made. Every route handler and page goes through
//! it: it attaches the stored credential as a bearer header, issues the
//! call, and runs the reply through [`classify`](super::classify::classify).
//! There is no caching, no retry and no idempotency tracking - a failed
//! call is surfaced once.

use axum::http::StatusCode;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::session::normalize_token;

use super::classify::{Classified, classify};
use super::error::ApiError;
use super::types::{
    AssignTicketRequest, AssignableAgent, AuthResponse, Comment, CreateCommentRequest,
    CreateSupportAgentRequest, CreateTicketRequest, ListQuery, LoginRequest, Page,
    RegisterRequest, Ticket, TicketStatus, UpdateTicketRequest, UpdateTicketStatusRequest, User,
    VerifyEmailRequest,
};

/// HTTP client for the ticketing backend.
///
/// Cheap to clone; the inner `reqwest::Client` is pooled. Timeout policy is
/// whatever reqwest defaults to - there is deliberately no custom
/// retry/backoff in this layer.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Forward an authenticated call. Short-circuits with
    /// [`ApiError::Unauthenticated`] before any network activity when no
    /// credential is present.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        credential: Option<&str>,
    ) -> Result<Value, ApiError> {
        let Some(raw) = credential else {
            debug!(name: "backend.request.unauthenticated", %path, "no credential in request");
            return Err(ApiError::Unauthenticated);
        };
        let token = normalize_token(raw);
        // Never log the full token.
        debug!(
            name: "backend.request",
            %method,
            %path,
            token_len = token.len(),
            token_snippet = token.get(..token.len().min(12)).unwrap_or_default(),
            "forwarding authenticated request"
        );
        self.send(method, path, query, body, Some(token)).await
    }

    /// Forward a call that carries no credential (login, registration).
    pub async fn request_public(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        debug!(name: "backend.request.public", %method, %path, "forwarding public request");
        self.send(method, path, &[], body, None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .http
            .request(method, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(json) = body {
            builder = builder.json(json);
        }

        let response = builder.send().await?;
        let status =
            StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let text = response.text().await?;

        debug!(
            name: "backend.response",
            %path,
            status = status.as_u16(),
            body_len = text.len(),
            "backend replied"
        );

        match classify(status, &text) {
            Classified::Success(value) => Ok(value),
            Classified::Expired => Err(ApiError::SessionExpired),
            Classified::App { status, message } => Err(ApiError::Application { status, message }),
            Classified::Malformed(raw) => Err(ApiError::Transport(format!(
                "backend returned non-JSON response: {raw}"
            ))),
        }
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value)
            .map_err(|err| ApiError::Transport(format!("unexpected response shape: {err}")))
    }

    // ── Auth ────────────────────────────────────────────────────────────

    pub async fn authenticate(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let body = serde_json::to_value(req)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let value = self
            .request_public(Method::POST, "/user/authenticate", Some(&body))
            .await?;
        Self::decode(value)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<Value, ApiError> {
        let body = serde_json::to_value(req)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        self.request_public(Method::POST, "/users/register", Some(&body))
            .await
    }

    /// Confirm a freshly registered address with the mailed one-time code.
    /// Public: the account has no credential yet.
    pub async fn verify_email(&self, req: &VerifyEmailRequest) -> Result<Value, ApiError> {
        let body = serde_json::to_value(req)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        self.request_public(Method::POST, "/users/verify-email", Some(&body))
            .await
    }

    // ── Tickets ─────────────────────────────────────────────────────────

    pub async fn list_tickets(
        &self,
        credential: Option<&str>,
        query: &ListQuery,
    ) -> Result<Page<Ticket>, ApiError> {
        let value = self
            .request(
                Method::GET,
                "/tickets",
                &query.to_query_pairs(),
                None,
                credential,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn get_ticket(
        &self,
        credential: Option<&str>,
        ticket_id: i64,
    ) -> Result<Ticket, ApiError> {
        let value = self
            .request(
                Method::GET,
                &format!("/tickets/{ticket_id}"),
                &[],
                None,
                credential,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn create_ticket(
        &self,
        credential: Option<&str>,
        req: &CreateTicketRequest,
    ) -> Result<Ticket, ApiError> {
        let body = serde_json::to_value(req)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let value = self
            .request(Method::POST, "/tickets", &[], Some(&body), credential)
            .await?;
        Self::decode(value)
    }

    pub async fn update_ticket_info(
        &self,
        credential: Option<&str>,
        ticket_id: i64,
        req: &UpdateTicketRequest,
    ) -> Result<Ticket, ApiError> {
        let body = serde_json::to_value(req)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let value = self
            .request(
                Method::PATCH,
                &format!("/tickets/{ticket_id}/info"),
                &[],
                Some(&body),
                credential,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn update_ticket_status(
        &self,
        credential: Option<&str>,
        ticket_id: i64,
        status: TicketStatus,
    ) -> Result<Ticket, ApiError> {
        let body = serde_json::to_value(UpdateTicketStatusRequest { status })
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let value = self
            .request(
                Method::PATCH,
                &format!("/tickets/{ticket_id}/status"),
                &[],
                Some(&body),
                credential,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn delete_ticket(
        &self,
        credential: Option<&str>,
        ticket_id: i64,
    ) -> Result<Value, ApiError> {
        self.request(
            Method::DELETE,
            &format!("/tickets/{ticket_id}"),
            &[],
            None,
            credential,
        )
        .await
    }

    /// Assign or reassign a ticket. On success the backend moves the
    /// ticket out of `NEW`; the returned snapshot reflects that.
    pub async fn assign_ticket(
        &self,
        credential: Option<&str>,
        ticket_id: i64,
        assigned_to_id: i64,
    ) -> Result<Ticket, ApiError> {
        let body = serde_json::to_value(AssignTicketRequest { assigned_to_id })
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let value = self
            .request(
                Method::PATCH,
                &format!("/tickets/{ticket_id}/assign"),
                &[],
                Some(&body),
                credential,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn assignable_agents(
        &self,
        credential: Option<&str>,
    ) -> Result<Vec<AssignableAgent>, ApiError> {
        let value = self
            .request(
                Method::GET,
                "/tickets/assignable-agents",
                &[],
                None,
                credential,
            )
            .await?;
        Self::decode(value)
    }

    // ── Comments ────────────────────────────────────────────────────────

    pub async fn list_comments(
        &self,
        credential: Option<&str>,
        ticket_id: i64,
    ) -> Result<Vec<Comment>, ApiError> {
        let value = self
            .request(
                Method::GET,
                &format!("/tickets/{ticket_id}/comments"),
                &[],
                None,
                credential,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn add_comment(
        &self,
        credential: Option<&str>,
        ticket_id: i64,
        req: &CreateCommentRequest,
    ) -> Result<Comment, ApiError> {
        let body = serde_json::to_value(req)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let value = self
            .request(
                Method::POST,
                &format!("/tickets/{ticket_id}/comments"),
                &[],
                Some(&body),
                credential,
            )
            .await?;
        Self::decode(value)
    }

    // ── User administration ─────────────────────────────────────────────

    pub async fn list_users(
        &self,
        credential: Option<&str>,
        query: &ListQuery,
    ) -> Result<Page<User>, ApiError> {
        let value = self
            .request(
                Method::GET,
                "/admin/users",
                &query.to_query_pairs(),
                None,
                credential,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn create_support_agent(
        &self,
        credential: Option<&str>,
        req: &CreateSupportAgentRequest,
    ) -> Result<User, ApiError> {
        let body = serde_json::to_value(req)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let value = self
            .request(
                Method::POST,
                "/admin/create-support-agent",
                &[],
                Some(&body),
                credential,
            )
            .await?;
        Self::decode(value)
    }

    pub async fn delete_user(
        &self,
        credential: Option<&str>,
        user_id: i64,
    ) -> Result<Value, ApiError> {
        self.request(
            Method::DELETE,
            &format!("/admin/users/{user_id}"),
            &[],
            None,
            credential,
        )
        .await
    }
}
