//! Wire types shared with the ticketing backend.
//!
//! Everything here mirrors the backend's JSON contract exactly; field names
//! are camelCase on the wire. These types are not authoritative - the
//! backend owns all business rules, the front end only reflects them.

use serde::{Deserialize, Serialize};

/// Role assigned to an account by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    SupportAgent,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::SupportAgent => "SUPPORT_AGENT",
            Self::Admin => "ADMIN",
        }
    }
}

/// Ticket workflow state. `New` is the unassigned initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    New,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategory {
    Network,
    Hardware,
    Software,
    Other,
}

/// A user account as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A support ticket.
///
/// Invariant (backend-enforced, reflected here): once an assignment
/// succeeds, `assigned_to` is set and `status` is no longer [`TicketStatus::New`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
}

/// An append-only ticket comment, ordered by creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author: User,
    pub created_at: String,
}

/// A user eligible to be set as a ticket's `assignedTo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignableAgent {
    pub id: i64,
    pub email: String,
}

/// Paginated collection envelope wrapping ticket or user listings.
///
/// The backend serializes the item list under a collection-specific key
/// (`tickets`, `users`); the aliases absorb both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(rename = "items", alias = "tickets", alias = "users")]
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub size: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Successful response from `POST /user/authenticate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub email: String,
    pub user_id: i64,
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Post-registration email confirmation: the address plus the one-time
/// code the backend mailed to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub title: String,
    pub description: String,
    pub creation_date: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTicketStatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketRequest {
    pub assigned_to_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupportAgentRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Pagination, sorting and filter parameters accepted by the listing
/// endpoints. All fields are optional; absent fields are omitted from the
/// outbound query string so backend defaults apply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
}

impl ListQuery {
    /// Render the present fields as query pairs, in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_dir) = &self.sort_dir {
            pairs.push(("sortDir", sort_dir.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_round_trips_camel_case() {
        let json = serde_json::json!({
            "id": 7,
            "title": "VPN down",
            "description": "Cannot connect",
            "category": "NETWORK",
            "priority": "HIGH",
            "status": "IN_PROGRESS",
            "createdBy": {"id": 1, "email": "a@b.c", "role": "USER"},
            "assignedTo": {"id": 2, "email": "agent@b.c", "role": "SUPPORT_AGENT"},
            "creationDate": "2025-01-01T00:00:00Z"
        });
        let ticket: Ticket = serde_json::from_value(json).expect("deserialize ticket");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, TicketPriority::High);
        assert_eq!(
            ticket.assigned_to.as_ref().map(|u| u.role),
            Some(UserRole::SupportAgent)
        );
    }

    #[test]
    fn page_accepts_collection_specific_keys() {
        let json = serde_json::json!({
            "tickets": [],
            "currentPage": 0,
            "totalItems": 0,
            "totalPages": 0,
            "size": 10,
            "hasNext": false,
            "hasPrevious": false
        });
        let page: Page<Ticket> = serde_json::from_value(json).expect("deserialize page");
        assert!(page.items.is_empty());
        assert!(!page.has_next);
    }

    #[test]
    fn list_query_omits_absent_fields() {
        let query = ListQuery {
            page: Some(2),
            status: Some(TicketStatus::New),
            ..ListQuery::default()
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![("page", "2".to_string()), ("status", "NEW".to_string())]
        );
        assert!(ListQuery::default().to_query_pairs().is_empty());
    }
}
