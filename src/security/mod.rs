//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (body size)
//!     → headers.rs (CORS preflight, hardening headers on the way out)
//!     → rate_limit.rs (per-IP window, lead route only)
//!     → Pass to handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input, including forwarded headers unless configured

pub mod headers;
pub mod limits;
pub mod rate_limit;

pub use rate_limit::{FixedWindowLimiter, RateDecision};
