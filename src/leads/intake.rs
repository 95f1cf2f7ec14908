//! Lead intake pipeline: honeypot → sanitize → validate → persist.

use arc_swap::ArcSwap;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ValidationConfig;
use crate::leads::sanitize::{escape_html, plain_text, sanitize_email, sanitize_phone, sanitize_text};
use crate::leads::store::{JsonFileStore, StoreError};
use crate::leads::types::{ClientInfo, FieldError, Lead, LeadSubmission};
use crate::leads::validation::{validate_fields, LeadFields};
use crate::observability::metrics;

const MAX_USER_AGENT_LENGTH: usize = 512;

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Stored(Lead),
    /// Honeypot tripped. The caller answers as if stored.
    Discarded { id: Uuid },
}

impl SubmitOutcome {
    pub fn id(&self) -> Uuid {
        match self {
            SubmitOutcome::Stored(lead) => lead.id,
            SubmitOutcome::Discarded { id } => *id,
        }
    }
}

/// Sanitize a submission and validate the result.
///
/// `name` and `message` are length-checked as plain text, so the limits count
/// what the visitor typed; `name` is escaped afterwards and `message` at
/// persist time. `source` is truncated to `max_text_length` rather than
/// rejected.
pub fn validate_submission(
    submission: &LeadSubmission,
    limits: &ValidationConfig,
) -> Result<LeadFields, Vec<FieldError>> {
    let mut fields = LeadFields {
        name: plain_text(&submission.name),
        email: sanitize_email(&submission.email),
        phone: sanitize_phone(&submission.phone),
        loan_amount: submission.loan_amount,
        down_payment: submission.down_payment,
        interest_rate: submission.interest_rate,
        amortization: submission.amortization,
        message: non_empty(submission.message.as_deref().map(plain_text)),
        source: non_empty(
            submission
                .source
                .as_deref()
                .map(|s| sanitize_text(s, limits.max_text_length)),
        ),
    };

    validate_fields(&fields, limits)?;
    fields.name = escape_html(&fields.name);
    Ok(fields)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Accepts submissions and writes them to the lead file.
pub struct LeadIntake {
    store: Arc<JsonFileStore>,
    limits: ArcSwap<ValidationConfig>,
}

impl LeadIntake {
    pub fn new(store: Arc<JsonFileStore>, limits: ValidationConfig) -> Self {
        Self {
            store,
            limits: ArcSwap::from_pointee(limits),
        }
    }

    pub fn store(&self) -> &Arc<JsonFileStore> {
        &self.store
    }

    pub fn update_limits(&self, limits: ValidationConfig) {
        self.limits.store(Arc::new(limits));
    }

    pub async fn submit(&self, submission: LeadSubmission, client: ClientInfo) -> Result<SubmitOutcome, LeadError> {
        if submission.website.as_deref().is_some_and(|w| !w.trim().is_empty()) {
            let id = Uuid::new_v4();
            tracing::info!(lead_id = %id, client = ?client.ip, "Honeypot filled; discarding submission");
            metrics::record_lead_rejected("honeypot");
            return Ok(SubmitOutcome::Discarded { id });
        }

        let limits = self.limits.load_full();
        let fields = match validate_submission(&submission, &limits) {
            Ok(f) => f,
            Err(errors) => {
                tracing::info!(
                    fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                    "Lead failed validation"
                );
                metrics::record_lead_rejected("validation");
                return Err(LeadError::Validation(errors));
            }
        };

        let lead = build_lead(fields, client);
        match self.store.append(&lead).await {
            Ok(total) => {
                let source = lead.source.as_deref().unwrap_or("unknown");
                tracing::info!(lead_id = %lead.id, source, total, "Lead stored");
                metrics::record_lead_submitted(source);
                Ok(SubmitOutcome::Stored(lead))
            }
            Err(e) => {
                tracing::error!(lead_id = %lead.id, error = %e, "Failed to persist lead");
                metrics::record_lead_rejected("storage");
                Err(e.into())
            }
        }
    }
}

fn build_lead(fields: LeadFields, client: ClientInfo) -> Lead {
    Lead {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        name: fields.name,
        email: fields.email,
        phone: fields.phone,
        loan_amount: fields.loan_amount,
        down_payment: fields.down_payment,
        interest_rate: fields.interest_rate,
        // Validated as a whole number inside the configured year range.
        amortization: fields.amortization.map(|y| y as u32),
        message: fields.message.map(|m| escape_html(&m)),
        source: fields.source,
        ip_address: client.ip,
        user_agent: client
            .user_agent
            .map(|ua| sanitize_text(&ua, MAX_USER_AGENT_LENGTH))
            .filter(|ua| !ua.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn submission() -> LeadSubmission {
        LeadSubmission {
            name: "Jane <b>Doe</b>".into(),
            email: " Jane@Example.com ".into(),
            phone: "416-555-0199".into(),
            loan_amount: Some(400_000.0),
            amortization: Some(25.0),
            message: Some("Tom & Jerry's <script>x()</script>house".into()),
            source: Some("payment-calculator".into()),
            ..Default::default()
        }
    }

    fn intake() -> (tempfile::TempDir, LeadIntake) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("leads.json")));
        (dir, LeadIntake::new(store, ValidationConfig::default()))
    }

    #[tokio::test]
    async fn test_valid_submission_is_sanitized_and_stored() {
        let (_dir, intake) = intake();
        let client = ClientInfo {
            ip: Some(IpAddr::from([203, 0, 113, 5])),
            user_agent: Some("Mozilla/5.0".into()),
        };

        let outcome = intake.submit(submission(), client).await.unwrap();
        let SubmitOutcome::Stored(lead) = outcome else { panic!("expected stored lead") };

        assert_eq!(lead.name, "Jane Doe");
        assert_eq!(lead.email, "jane@example.com");
        assert_eq!(lead.amortization, Some(25));
        assert_eq!(lead.message.as_deref(), Some("Tom &amp; Jerry&#x27;s house"));
        assert_eq!(lead.ip_address, Some(IpAddr::from([203, 0, 113, 5])));

        let stored = intake.store().list().await.unwrap();
        assert_eq!(stored, vec![lead]);
    }

    #[tokio::test]
    async fn test_invalid_submission_is_not_stored() {
        let (_dir, intake) = intake();
        let sub = LeadSubmission {
            email: "bad".into(),
            interest_rate: Some(99.0),
            ..submission()
        };

        match intake.submit(sub, ClientInfo::default()).await {
            Err(LeadError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "interestRate"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(intake.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_name_of_only_markup_is_rejected() {
        let (_dir, intake) = intake();
        let sub = LeadSubmission {
            name: "<script>alert(1)</script>".into(),
            ..submission()
        };
        let err = intake.submit(sub, ClientInfo::default()).await.unwrap_err();
        assert!(matches!(err, LeadError::Validation(ref e) if e[0].field == "name"));
    }

    #[tokio::test]
    async fn test_honeypot_discards_silently() {
        let (_dir, intake) = intake();
        let sub = LeadSubmission {
            website: Some("http://spam.example".into()),
            ..submission()
        };
        let outcome = intake.submit(sub, ClientInfo::default()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Discarded { .. }));
        assert_eq!(intake.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_updated_limits_take_effect() {
        let (_dir, intake) = intake();
        intake.update_limits(ValidationConfig {
            loan_amount: crate::config::Bounds::new(500_000.0, 1_000_000.0),
            ..Default::default()
        });
        let err = intake.submit(submission(), ClientInfo::default()).await.unwrap_err();
        assert!(matches!(err, LeadError::Validation(ref e) if e[0].field == "loanAmount"));
    }

    #[test]
    fn test_blank_optional_text_becomes_none() {
        let sub = LeadSubmission {
            message: Some("   ".into()),
            source: Some("<br>".into()),
            ..submission()
        };
        let fields = validate_submission(&sub, &ValidationConfig::default()).unwrap();
        assert_eq!(fields.message, None);
        assert_eq!(fields.source, None);
    }

    #[test]
    fn test_name_is_measured_before_escaping() {
        let limits = ValidationConfig {
            max_text_length: 11,
            ..Default::default()
        };
        let sub = LeadSubmission {
            name: "Tom & Jerry".into(),
            ..submission()
        };
        let fields = validate_submission(&sub, &limits).unwrap();
        assert_eq!(fields.name, "Tom &amp; Jerry");

        let sub = LeadSubmission {
            name: "Tom & Jerry Sr".into(),
            ..submission()
        };
        let errors = validate_submission(&sub, &limits).unwrap_err();
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].message, "Name must not exceed 11 characters");
    }
}
