//! API route definitions.

pub mod chat_routes;
pub mod conversation_routes;
