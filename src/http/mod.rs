//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers, static site)
//!     → request.rs (request ID, peer address, metrics)
//!     → [rate limit on the lead route]
//!     → handlers.rs (leads, calculators, health)
//!     → response.rs (error bodies)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
