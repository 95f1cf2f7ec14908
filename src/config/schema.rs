//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the lead service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the lead service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LeadsConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Per-IP rate limiting on lead submission.
    pub rate_limit: RateLimitConfig,

    /// Lead persistence settings.
    pub storage: StorageConfig,

    /// Field bounds applied to submitted leads.
    pub validation: ValidationConfig,

    /// Cross-origin settings for the API.
    pub cors: CorsConfig,

    /// Static site hosting.
    pub site: SiteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub admin: AdminConfig,

    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent requests in flight (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 1_024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Requests allowed per client IP within one window.
    pub max_requests: u32,

    /// How often expired windows are evicted, in seconds.
    pub sweep_interval_secs: u64,

    /// Take the client IP from X-Forwarded-For / X-Real-IP.
    /// Only enable behind a proxy that overwrites these headers.
    pub trust_forwarded_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: 15 * 60,
            max_requests: 10,
            sweep_interval_secs: 60,
            trust_forwarded_headers: false,
        }
    }
}

/// Lead persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON array file holding every lead.
    pub leads_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            leads_path: "data/leads.json".to_string(),
        }
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Field limits for lead submissions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    pub loan_amount: Bounds,
    pub down_payment: Bounds,
    /// Annual interest rate in percent.
    pub interest_rate: Bounds,
    /// Amortization in whole years.
    pub amortization_years: Bounds,
    /// Character cap for short free-text fields (name, source).
    pub max_text_length: usize,
    /// Character cap for the message field.
    pub max_message_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            loan_amount: Bounds::new(1.0, 10_000_000.0),
            down_payment: Bounds::new(0.0, 10_000_000.0),
            interest_rate: Bounds::new(0.0, 30.0),
            amortization_years: Bounds::new(1.0, 40.0),
            max_text_length: 500,
            max_message_length: 2_000,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Static hosting of the built single-page application.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the built site. Unknown paths fall back to `index.html`.
    pub root: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

/// Key shipped in the defaults. Validation refuses it when admin is enabled.
pub const PLACEHOLDER_API_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_API_KEY.to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: LeadsConfig = toml::from_str("").unwrap();
        assert_eq!(config, LeadsConfig::default());
        assert_eq!(config.rate_limit.window_secs, 900);
        assert_eq!(config.rate_limit.max_requests, 10);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: LeadsConfig = toml::from_str(
            r#"
            [rate_limit]
            max_requests = 3

            [validation]
            interest_rate = { min = 0.5, max = 15.0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert_eq!(config.validation.interest_rate, Bounds::new(0.5, 15.0));
        assert_eq!(config.validation.max_text_length, 500);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let b = Bounds::new(1.0, 40.0);
        assert!(b.contains(1.0));
        assert!(b.contains(40.0));
        assert!(!b.contains(40.01));
        assert!(!b.contains(f64::NAN));
    }
}
