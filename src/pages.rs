//! Server-rendered pages.
//!
//! Pages render data that has already been fetched; presentation is
//! intentionally minimal. Pages needing several collections fetch them
//! concurrently and join before rendering; the policy is fail-fast - if
//! any fetch fails, the whole page fails deterministically with that
//! error. An expiry verdict from any fetch turns into the session
//! controller's forced redirect.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::AppState;
use crate::backend::ApiError;
use crate::backend::types::{AssignableAgent, Comment, ListQuery, Page, Ticket, User};
use crate::session::{self, Session};

/// Minimal HTML escaping for user-controlled text.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn shell(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\"/>\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n\
         <title>{} - Ticketdesk</title>\n</head>\n<body>\n\
         <header><a href=\"/tickets\">Tickets</a> <a href=\"/support/tickets\">Support</a> \
         <a href=\"/admin/users\">Users</a> <a href=\"{}\">Login</a></header>\n\
         <main>\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        session::LOGIN_PATH,
        body
    ))
}

/// Map a fetch failure to a page response. Expiry is the only condition
/// with a global side effect: credentials are cleared and the browser is
/// sent back to the login entry point.
fn page_error(err: ApiError, jar: CookieJar) -> Response {
    match err {
        ApiError::SessionExpired => session::expire_session(jar),
        ApiError::Unauthenticated => Redirect::to(session::LOGIN_PATH).into_response(),
        other => {
            warn!(name: "page.render.failed", error = %other, "page data fetch failed");
            let status = match &other {
                ApiError::Application { status, .. } => *status,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, shell("Error", &format!("<p>{}</p>", escape(&other.to_string()))))
                .into_response()
        }
    }
}

/// GET /login - the login entry point. Static form; posts form-encoded
/// credentials to the same-origin login route.
pub async fn login_page() -> Html<String> {
    shell(
        "Login",
        "<h1>Sign in</h1>\n\
         <form method=\"post\" action=\"/api/auth/login\">\n\
         <label>Email <input type=\"email\" name=\"email\" required/></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required/></label>\n\
         <button type=\"submit\">Sign in</button>\n</form>",
    )
}

/// GET /verify-email - post-registration confirmation form for the mailed
/// one-time code.
pub async fn verify_email_page() -> Html<String> {
    shell(
        "Verify email",
        "<h1>Verify your email</h1>\n\
         <form method=\"post\" action=\"/api/auth/verify-email\">\n\
         <label>Email <input type=\"email\" name=\"email\" required/></label>\n\
         <label>Verification code \
         <input type=\"text\" name=\"otp\" inputmode=\"numeric\" maxlength=\"6\" required/></label>\n\
         <button type=\"submit\">Verify</button>\n</form>",
    )
}

fn ticket_row(ticket: &Ticket) -> String {
    let assignee = ticket
        .assigned_to
        .as_ref()
        .map_or_else(|| "-".to_string(), |user| escape(&user.email));
    format!(
        "<tr><td><a href=\"/tickets/{id}\">#{id}</a></td><td>{title}</td>\
         <td>{status}</td><td>{priority}</td><td>{assignee}</td></tr>",
        id = ticket.id,
        title = escape(&ticket.title),
        status = ticket.status.as_str(),
        priority = ticket.priority.as_str(),
    )
}

fn tickets_table(page: &Page<Ticket>) -> String {
    let rows: String = page.items.iter().map(ticket_row).collect();
    format!(
        "<table>\n<thead><tr><th>Id</th><th>Title</th><th>Status</th>\
         <th>Priority</th><th>Assignee</th></tr></thead>\n<tbody>{rows}</tbody>\n</table>\n\
         <p>Page {current} of {total} ({items} tickets)</p>",
        current = page.current_page.saturating_add(1),
        total = page.total_pages,
        items = page.total_items,
    )
}

/// GET /tickets - the requester's ticket list with filters from the query
/// string.
pub async fn tickets_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Response {
    let session = Session::from_jar(&jar);
    if !session.is_authenticated() {
        return Redirect::to(session::LOGIN_PATH).into_response();
    }

    match state.backend.list_tickets(session.credential(), &query).await {
        Ok(page) => shell("Tickets", &format!("<h1>Tickets</h1>\n{}", tickets_table(&page)))
            .into_response(),
        Err(err) => page_error(err, jar),
    }
}

/// GET /tickets/{id} - ticket detail with its comment thread. The ticket
/// and its comments are independent snapshots; they are fetched
/// concurrently and joined before rendering (fail-fast).
pub async fn ticket_detail_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let session = Session::from_jar(&jar);
    if !session.is_authenticated() {
        return Redirect::to(session::LOGIN_PATH).into_response();
    }

    let fetched = tokio::try_join!(
        state.backend.get_ticket(session.credential(), id),
        state.backend.list_comments(session.credential(), id),
    );
    match fetched {
        Ok((ticket, comments)) => {
            shell(&ticket.title, &render_ticket_detail(&ticket, &comments)).into_response()
        }
        Err(err) => page_error(err, jar),
    }
}

fn render_ticket_detail(ticket: &Ticket, comments: &[Comment]) -> String {
    let comment_items: String = comments
        .iter()
        .map(|comment| {
            format!(
                "<li><strong>{}</strong> ({}): {}</li>",
                escape(&comment.author.email),
                escape(&comment.created_at),
                escape(&comment.content),
            )
        })
        .collect();
    format!(
        "<h1>#{id} {title}</h1>\n<p>{description}</p>\n\
         <dl><dt>Status</dt><dd>{status}</dd><dt>Priority</dt><dd>{priority}</dd></dl>\n\
         <h2>Comments</h2>\n<ol>{comment_items}</ol>",
        id = ticket.id,
        title = escape(&ticket.title),
        description = escape(&ticket.description),
        status = ticket.status.as_str(),
        priority = ticket.priority.as_str(),
    )
}

/// GET /support/tickets - the agent/administrator work queue.
///
/// The ticket listing and the assignable-agent roster are fetched
/// concurrently with no ordering dependency and joined before the page
/// renders. Fail-fast: either failure fails the page.
pub async fn support_tickets_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Response {
    let session = Session::from_jar(&jar);
    if !session.is_authenticated() {
        return Redirect::to(session::LOGIN_PATH).into_response();
    }

    let fetched = tokio::try_join!(
        state.backend.list_tickets(session.credential(), &query),
        state.backend.assignable_agents(session.credential()),
    );
    match fetched {
        Ok((page, agents)) => shell(
            "Support tickets",
            &format!(
                "<h1>Support tickets</h1>\n{}\n<h2>Assignable agents</h2>\n{}",
                tickets_table(&page),
                agents_list(&agents)
            ),
        )
        .into_response(),
        Err(err) => page_error(err, jar),
    }
}

fn agents_list(agents: &[AssignableAgent]) -> String {
    let items: String = agents
        .iter()
        .map(|agent| format!("<li>{} (#{})</li>", escape(&agent.email), agent.id))
        .collect();
    format!("<ul>{items}</ul>")
}

/// GET /admin/users - administrator account management.
pub async fn admin_users_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Response {
    let session = Session::from_jar(&jar);
    if !session.is_authenticated() {
        return Redirect::to(session::LOGIN_PATH).into_response();
    }

    match state.backend.list_users(session.credential(), &query).await {
        Ok(page) => shell("Users", &format!("<h1>Users</h1>\n{}", users_table(&page)))
            .into_response(),
        Err(err) => page_error(err, jar),
    }
}

fn users_table(page: &Page<User>) -> String {
    let rows: String = page
        .items
        .iter()
        .map(|user| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                user.id,
                escape(&user.email),
                user.role.as_str(),
            )
        })
        .collect();
    format!(
        "<table>\n<thead><tr><th>Id</th><th>Email</th><th>Role</th></tr></thead>\n\
         <tbody>{rows}</tbody>\n</table>\n<p>Page {} of {}</p>",
        page.current_page.saturating_add(1),
        page.total_pages,
    )
}
