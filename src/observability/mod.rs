//! Logging and metrics.
//!
//! `logging` installs the subscriber once at startup. Every request span
//! carries its `x-request-id`. `metrics` holds the recording helpers the
//! lead pipeline, limiter and router call. Those helpers are no-ops until
//! the Prometheus exporter is installed.
//!
//! Lead contents (name, email, phone, message) are never logged. Events
//! carry the lead id, source and client address only.

pub mod logging;
pub mod metrics;
