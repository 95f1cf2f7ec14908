//! Lead field validation.
//!
//! Runs on sanitized values and reports every failing field at once so the
//! form can highlight all of them.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::{Bounds, ValidationConfig};
use crate::leads::types::FieldError;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[\d\s\-().]{10,20}$").unwrap());

const MAX_EMAIL_LENGTH: usize = 254;
const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

/// Sanitized candidate record, prior to validation.
#[derive(Debug, Clone, Default)]
pub struct LeadFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub loan_amount: Option<f64>,
    pub down_payment: Option<f64>,
    pub interest_rate: Option<f64>,
    pub amortization: Option<f64>,
    pub message: Option<String>,
    pub source: Option<String>,
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH && EMAIL.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    if !PHONE.is_match(phone) {
        return false;
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

pub fn validate_fields(fields: &LeadFields, limits: &ValidationConfig) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if fields.name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if fields.name.chars().count() > limits.max_text_length {
        errors.push(FieldError::new(
            "name",
            format!("Name must not exceed {} characters", limits.max_text_length),
        ));
    }

    if fields.email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&fields.email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }

    if fields.phone.is_empty() {
        errors.push(FieldError::new("phone", "Phone number is required"));
    } else if !is_valid_phone(&fields.phone) {
        errors.push(FieldError::new("phone", "Invalid phone number"));
    }

    check_range(&mut errors, "loanAmount", "Loan amount", fields.loan_amount, limits.loan_amount);
    check_range(&mut errors, "downPayment", "Down payment", fields.down_payment, limits.down_payment);
    check_range(&mut errors, "interestRate", "Interest rate", fields.interest_rate, limits.interest_rate);
    check_range(
        &mut errors,
        "amortization",
        "Amortization",
        fields.amortization,
        limits.amortization_years,
    );
    if let Some(years) = fields.amortization {
        if years.is_finite() && years.fract() != 0.0 {
            errors.push(FieldError::new("amortization", "Amortization must be a whole number of years"));
        }
    }

    if let Some(message) = &fields.message {
        if message.chars().count() > limits.max_message_length {
            errors.push(FieldError::new(
                "message",
                format!("Message must not exceed {} characters", limits.max_message_length),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_range(errors: &mut Vec<FieldError>, field: &str, label: &str, value: Option<f64>, bounds: Bounds) {
    let Some(value) = value else { return };
    if !value.is_finite() {
        errors.push(FieldError::new(field, format!("{} must be a number", label)));
    } else if !bounds.contains(value) {
        errors.push(FieldError::new(
            field,
            format!("{} must be between {} and {}", label, bounds.min, bounds.max),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> LeadFields {
        LeadFields {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "(416) 555-0199".into(),
            loan_amount: Some(450_000.0),
            down_payment: Some(90_000.0),
            interest_rate: Some(4.79),
            amortization: Some(25.0),
            ..Default::default()
        }
    }

    fn fields_of(result: Result<(), Vec<FieldError>>) -> Vec<String> {
        result.unwrap_err().into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_lead_passes() {
        assert!(validate_fields(&valid(), &ValidationConfig::default()).is_ok());
    }

    #[test]
    fn test_optional_numbers_may_be_absent() {
        let fields = LeadFields {
            loan_amount: None,
            down_payment: None,
            interest_rate: None,
            amortization: None,
            ..valid()
        };
        assert!(validate_fields(&fields, &ValidationConfig::default()).is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a.b+c@sub.example.ca"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two words@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email(&format!("{}@example.com", "a".repeat(250))));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone("416-555-0199"));
        assert!(is_valid_phone("+1 (416) 555.0199"));
        assert!(!is_valid_phone("555-0199"));
        assert!(!is_valid_phone("416-555-O199"));
        assert!(!is_valid_phone("-------------"));
    }

    #[test]
    fn test_reports_every_bad_field() {
        let fields = LeadFields {
            name: String::new(),
            email: "nope".into(),
            phone: "123".into(),
            loan_amount: Some(0.0),
            interest_rate: Some(45.0),
            amortization: Some(25.5),
            ..valid()
        };
        assert_eq!(
            fields_of(validate_fields(&fields, &ValidationConfig::default())),
            vec!["name", "email", "phone", "loanAmount", "interestRate", "amortization"]
        );
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        let fields = LeadFields {
            down_payment: Some(f64::INFINITY),
            ..valid()
        };
        assert_eq!(
            fields_of(validate_fields(&fields, &ValidationConfig::default())),
            vec!["downPayment"]
        );
    }

    #[test]
    fn test_message_length_cap() {
        let limits = ValidationConfig {
            max_message_length: 5,
            ..Default::default()
        };
        let fields = LeadFields {
            message: Some("too long".into()),
            ..valid()
        };
        assert_eq!(fields_of(validate_fields(&fields, &limits)), vec!["message"]);
    }

    #[test]
    fn test_loan_amount_bounds_are_inclusive() {
        let limits = ValidationConfig::default();
        for amount in [1.0, 999.0, 10_000_000.0] {
            let fields = LeadFields {
                loan_amount: Some(amount),
                ..valid()
            };
            assert!(validate_fields(&fields, &limits).is_ok(), "{amount}");
        }
        let fields = LeadFields {
            loan_amount: Some(10_000_000.5),
            ..valid()
        };
        assert_eq!(fields_of(validate_fields(&fields, &limits)), vec!["loanAmount"]);
    }

    #[test]
    fn test_name_length_cap() {
        let limits = ValidationConfig {
            max_text_length: 8,
            ..Default::default()
        };
        let exact = LeadFields {
            name: "Jane Doe".into(),
            ..valid()
        };
        assert!(validate_fields(&exact, &limits).is_ok());
        let long = LeadFields {
            name: "Jane Q. Doe".into(),
            ..valid()
        };
        assert_eq!(fields_of(validate_fields(&long, &limits)), vec!["name"]);
    }
}
