//! Integration tests for the authenticated request forwarder, driven
//! against an in-process fake backend bound to an ephemeral port.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use ticketdesk::backend::types::{
    CreateCommentRequest, CreateSupportAgentRequest, ListQuery, LoginRequest, TicketStatus,
    UserRole,
};
use ticketdesk::backend::{ApiError, BackendClient};

/// Serve `router` on an ephemeral localhost port and return its base URL.
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .expect("fake backend serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn bearer_token_is_forwarded_exactly_once_prefixed() {
    let router = Router::new().route(
        "/echo-auth",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({ "authorization": auth }))
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    // Stored bare.
    let body = client
        .request(reqwest::Method::GET, "/echo-auth", &[], None, Some("tok123"))
        .await
        .expect("request");
    assert_eq!(body["authorization"], "Bearer tok123");

    // Stored with a redundant prefix: still exactly one "Bearer ".
    let body = client
        .request(
            reqwest::Method::GET,
            "/echo-auth",
            &[],
            None,
            Some("Bearer tok123"),
        )
        .await
        .expect("request");
    assert_eq!(body["authorization"], "Bearer tok123");
}

#[tokio::test]
async fn missing_credential_short_circuits_without_network() {
    // A base URL that would refuse connections: if the forwarder tried the
    // network we would see Transport, not Unauthenticated.
    let client = BackendClient::new("http://127.0.0.1:9");
    let err = client
        .request(reqwest::Method::GET, "/tickets", &[], None, None)
        .await
        .expect_err("must not succeed");
    assert!(matches!(err, ApiError::Unauthenticated));
}

#[tokio::test]
async fn network_failure_is_transport_not_auth() {
    let client = BackendClient::new("http://127.0.0.1:9");
    let err = client
        .request(reqwest::Method::GET, "/tickets", &[], None, Some("tok"))
        .await
        .expect_err("must not succeed");
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn not_found_surfaces_backend_message() {
    let router = Router::new().route(
        "/tickets/99",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "messages": ["Ticket not found"] })),
            )
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let err = client
        .get_ticket(Some("tok"), 99)
        .await
        .expect_err("must not succeed");
    match err {
        ApiError::Application { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Ticket not found");
        }
        other => panic!("expected application error, got {other:?}"),
    }
}

#[tokio::test]
async fn expiry_marker_in_200_body_expires_session() {
    let router = Router::new().route(
        "/tickets",
        get(|| async { Json(json!({ "messages": ["JWT token is invalid or expired"] })) }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let err = client
        .list_tickets(Some("tok"), &ListQuery::default())
        .await
        .expect_err("must not succeed");
    assert!(matches!(err, ApiError::SessionExpired));
}

#[tokio::test]
async fn expiry_marker_in_401_body_expires_session() {
    let router = Router::new().route(
        "/tickets",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "messages": ["Jwt Token Is Invalid Or Expired"] })),
            )
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let err = client
        .list_tickets(Some("tok"), &ListQuery::default())
        .await
        .expect_err("must not succeed");
    assert!(matches!(err, ApiError::SessionExpired));
}

#[tokio::test]
async fn normal_payload_passes_through() {
    let router = Router::new().route(
        "/tickets/7",
        get(|| async {
            Json(json!({
                "id": 7,
                "title": "Printer jam",
                "description": "Paper stuck in tray 2",
                "category": "HARDWARE",
                "priority": "LOW",
                "status": "NEW"
            }))
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let ticket = client.get_ticket(Some("tok"), 7).await.expect("ticket");
    assert_eq!(ticket.id, 7);
    assert_eq!(ticket.title, "Printer jam");
    assert!(ticket.assigned_to.is_none());
}

#[tokio::test]
async fn listing_forwards_pagination_and_filters() {
    let router = Router::new().route(
        "/tickets",
        get(
            |axum::extract::Query(params): axum::extract::Query<
                std::collections::HashMap<String, String>,
            >| async move {
                assert_eq!(params.get("page").map(String::as_str), Some("2"));
                assert_eq!(params.get("status").map(String::as_str), Some("NEW"));
                assert_eq!(params.get("sortDir").map(String::as_str), Some("DESC"));
                Json(json!({
                    "tickets": [],
                    "currentPage": 2,
                    "totalItems": 0,
                    "totalPages": 5,
                    "size": 10,
                    "hasNext": true,
                    "hasPrevious": true
                }))
            },
        ),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let query = ListQuery {
        page: Some(2),
        sort_dir: Some("DESC".into()),
        status: Some(ticketdesk::backend::types::TicketStatus::New),
        ..ListQuery::default()
    };
    let page = client.list_tickets(Some("tok"), &query).await.expect("page");
    assert_eq!(page.current_page, 2);
    assert!(page.has_next);
}

#[tokio::test]
async fn assignment_moves_ticket_out_of_new() {
    let router = Router::new().route(
        "/tickets/7/assign",
        axum::routing::patch(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["assignedToId"], 9);
            Json(json!({
                "id": 7,
                "title": "Printer jam",
                "description": "Paper stuck in tray 2",
                "category": "HARDWARE",
                "priority": "LOW",
                "status": "IN_PROGRESS",
                "assignedTo": {"id": 9, "email": "agent@b.c", "role": "SUPPORT_AGENT"}
            }))
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let ticket = client
        .assign_ticket(Some("tok"), 7, 9)
        .await
        .expect("assigned ticket");
    assert_ne!(ticket.status, TicketStatus::New);
    assert_eq!(ticket.assigned_to.map(|u| u.id), Some(9));
}

#[tokio::test]
async fn status_update_returns_new_snapshot() {
    let router = Router::new().route(
        "/tickets/7/status",
        axum::routing::patch(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["status"], "RESOLVED");
            Json(json!({
                "id": 7,
                "title": "Printer jam",
                "description": "Paper stuck in tray 2",
                "category": "HARDWARE",
                "priority": "LOW",
                "status": "RESOLVED"
            }))
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let ticket = client
        .update_ticket_status(Some("tok"), 7, TicketStatus::Resolved)
        .await
        .expect("updated ticket");
    assert_eq!(ticket.status, TicketStatus::Resolved);
}

#[tokio::test]
async fn comment_is_posted_with_credential() {
    let router = Router::new().route(
        "/tickets/7/comments",
        post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
            assert_eq!(
                headers.get("authorization").and_then(|v| v.to_str().ok()),
                Some("Bearer tok")
            );
            Json(json!({
                "id": 31,
                "content": body["content"],
                "author": {"id": 1, "email": "a@b.c", "role": "USER"},
                "createdAt": "2025-01-01T00:00:00Z"
            }))
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let comment = client
        .add_comment(
            Some("tok"),
            7,
            &CreateCommentRequest {
                content: "restarted the spooler".into(),
            },
        )
        .await
        .expect("comment");
    assert_eq!(comment.content, "restarted the spooler");
    assert_eq!(comment.id, 31);
}

#[tokio::test]
async fn support_agent_creation_is_typed() {
    let router = Router::new().route(
        "/admin/create-support-agent",
        post(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["role"], "SUPPORT_AGENT");
            Json(json!({
                "id": 9,
                "email": body["email"],
                "role": "SUPPORT_AGENT"
            }))
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let user = client
        .create_support_agent(
            Some("tok"),
            &CreateSupportAgentRequest {
                email: "agent@b.c".into(),
                password: "s3cret".into(),
                role: UserRole::SupportAgent,
            },
        )
        .await
        .expect("created agent");
    assert_eq!(user.role, UserRole::SupportAgent);
}

#[tokio::test]
async fn bodyless_delete_is_success() {
    let router = Router::new().route(
        "/tickets/7",
        axum::routing::delete(|| async { StatusCode::NO_CONTENT }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let body = client.delete_ticket(Some("tok"), 7).await.expect("delete");
    assert!(body.is_null());
}

#[tokio::test]
async fn authenticate_is_public_and_typed() {
    let router = Router::new().route(
        "/user/authenticate",
        post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
            // Login carries no bearer header.
            assert!(headers.get("authorization").is_none());
            assert_eq!(body["email"], "user@example.com");
            Json(json!({
                "token": "jwt-abc",
                "email": "user@example.com",
                "userId": 42,
                "authorities": ["USER"],
                "message": "Authenticated"
            }))
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let auth = client
        .authenticate(&LoginRequest {
            email: "user@example.com".into(),
            password: "hunter2".into(),
        })
        .await
        .expect("auth");
    assert_eq!(auth.token, "jwt-abc");
    assert_eq!(auth.user_id, 42);
    assert_eq!(auth.authorities, vec!["USER".to_string()]);
}

#[tokio::test]
async fn rejected_login_surfaces_backend_message() {
    let router = Router::new().route(
        "/user/authenticate",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "messages": ["Bad credentials"] })),
            )
        }),
    );
    let base_url = spawn_backend(router).await;
    let client = BackendClient::new(&base_url);

    let err = client
        .authenticate(&LoginRequest {
            email: "user@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .expect_err("must not succeed");
    match err {
        ApiError::Application { status, message } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("expected application error, got {other:?}"),
    }
}
