//! HTTP server assembly: router, middleware, listener.

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect},
    routing::get,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::api;
use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::pages;

/// Build the full application router for the given state.
///
/// Split out from [`start_server`] so integration tests can drive the
/// router without binding a socket.
pub fn app(state: AppState) -> Router {
    let timeout = Duration::from_secs(30);

    Router::new()
        .route("/", get(|| async { Redirect::to("/tickets") }))
        .route("/login", get(pages::login_page))
        .route("/verify-email", get(pages::verify_email_page))
        .route("/tickets", get(pages::tickets_page))
        .route("/tickets/{id}", get(pages::ticket_detail_page))
        .route("/support/tickets", get(pages::support_tickets_page))
        .route("/admin/users", get(pages::admin_users_page))
        .nest("/api", api::router())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB is plenty for JSON forms
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        "backend configuration loaded"
    );

    let backend = Arc::new(BackendClient::new(config.backend.base_url.clone()));

    let state = AppState {
        backend,
        config: config.clone(),
    };

    let router = app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
