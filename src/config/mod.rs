//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LeadsConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<LeadsConfig>
//!     → limiter and intake observe new bounds
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Listener, CORS and storage path changes need a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, Bounds, CorsConfig, LeadsConfig, ListenerConfig, ObservabilityConfig,
    RateLimitConfig, SecurityConfig, SiteConfig, StorageConfig, TimeoutConfig, ValidationConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
