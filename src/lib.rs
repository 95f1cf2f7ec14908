//! Lead capture and calculator backend for a mortgage marketing site.

pub mod admin;
pub mod calculator;
pub mod config;
pub mod content;
pub mod http;
pub mod leads;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::LeadsConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
