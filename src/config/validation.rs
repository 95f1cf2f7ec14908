//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window > 0, bounds ordered, addresses parse)
//! - Refuse an enabled admin API still carrying the placeholder key
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LeadsConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{Bounds, LeadsConfig, PLACEHOLDER_API_KEY};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &LeadsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::new("listener.max_connections", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let rl = &config.rate_limit;
    if rl.window_secs == 0 {
        errors.push(ValidationError::new("rate_limit.window_secs", "must be greater than 0"));
    }
    if rl.max_requests == 0 {
        errors.push(ValidationError::new("rate_limit.max_requests", "must be greater than 0"));
    }
    if rl.sweep_interval_secs == 0 {
        errors.push(ValidationError::new("rate_limit.sweep_interval_secs", "must be greater than 0"));
    }

    if config.storage.leads_path.trim().is_empty() {
        errors.push(ValidationError::new("storage.leads_path", "must not be empty"));
    }

    let v = &config.validation;
    check_bounds(&mut errors, "validation.loan_amount", v.loan_amount);
    check_bounds(&mut errors, "validation.down_payment", v.down_payment);
    check_bounds(&mut errors, "validation.interest_rate", v.interest_rate);
    check_bounds(&mut errors, "validation.amortization_years", v.amortization_years);
    if v.max_text_length == 0 {
        errors.push(ValidationError::new("validation.max_text_length", "must be greater than 0"));
    }
    if v.max_message_length == 0 {
        errors.push(ValidationError::new("validation.max_message_length", "must be greater than 0"));
    }

    if config.observability.metrics_enabled {
        check_addr(&mut errors, "observability.metrics_address", &config.observability.metrics_address);
    }
    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new("observability.log_format", "must be \"pretty\" or \"json\""));
    }

    if config.admin.enabled {
        if config.admin.api_key.is_empty() || config.admin.api_key == PLACEHOLDER_API_KEY {
            errors.push(ValidationError::new("admin.api_key", "must be set when admin is enabled"));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(field, format!("invalid socket address {:?}", value)));
    }
}

fn check_bounds(errors: &mut Vec<ValidationError>, field: &str, bounds: Bounds) {
    if !bounds.min.is_finite() || !bounds.max.is_finite() {
        errors.push(ValidationError::new(field, "bounds must be finite"));
    } else if bounds.min > bounds.max {
        errors.push(ValidationError::new(field, "min must not exceed max"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&LeadsConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = LeadsConfig::default();
        config.rate_limit.window_secs = 0;
        config.rate_limit.max_requests = 0;
        config.validation.interest_rate = Bounds::new(10.0, 1.0);
        config.listener.bind_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "rate_limit.window_secs",
                "rate_limit.max_requests",
                "validation.interest_rate",
            ]
        );
    }

    #[test]
    fn test_admin_requires_real_key() {
        let mut config = LeadsConfig::default();
        config.admin.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "admin.api_key");

        config.admin.api_key = "s3cret".into();
        assert!(validate_config(&config).is_ok());
    }
}
