//! Security components.
//!
//! Authentication itself is an upstream concern; this module only carries the
//! request throttling collaborator injected into the application state.

pub mod rate_limit;

pub use rate_limit::{RateLimitResult, RateLimiter};
