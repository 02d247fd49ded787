//! Backend collaborator: the authenticated request forwarder, response
//! classifier, error taxonomy, and the wire types they exchange.
//!
//! Control flow for every data access in the application:
//! handler → [`BackendClient`] → backend → [`classify`](classify::classify)
//! → on expiry the session controller takes over, otherwise data flows back
//! to the handler.

pub mod classify;
pub mod client;
pub mod error;
pub mod types;

pub use client::BackendClient;
pub use error::ApiError;
