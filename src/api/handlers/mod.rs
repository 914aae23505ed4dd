//! Request handlers.

pub mod chat_handler;
pub mod conversation_handler;

use axum::http::HeaderMap;

/// Owner identity from the pre-authenticated request headers.
///
/// Authentication is an upstream concern; unauthenticated callers share the
/// guest identity.
pub(crate) fn owner_id(headers: &HeaderMap) -> String {
    header_or(headers, "x-user-id", "guest")
}

/// Display name used by the responder prompt
pub(crate) fn user_name(headers: &HeaderMap) -> String {
    header_or(headers, "x-user-name", "Guest")
}

fn header_or(headers: &HeaderMap, name: &str, fallback: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
