//! Lead submission and storage types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// Payload posted by the site's forms.
///
/// Numeric fields accept JSON numbers or numeric strings, since the
/// multi-step form posts raw input values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(deserialize_with = "number_or_string")]
    pub loan_amount: Option<f64>,
    #[serde(deserialize_with = "number_or_string")]
    pub down_payment: Option<f64>,
    /// Annual rate in percent.
    #[serde(deserialize_with = "number_or_string")]
    pub interest_rate: Option<f64>,
    /// Amortization in years.
    #[serde(deserialize_with = "number_or_string")]
    pub amortization: Option<f64>,
    pub message: Option<String>,
    /// Form or calculator the lead came from.
    pub source: Option<String>,
    /// Honeypot. Hidden from humans, so any content means a bot.
    pub website: Option<String>,
}

/// A persisted lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loan_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub down_payment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interest_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub amortization: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ip_address: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_agent: Option<String>,
}

/// Request metadata captured alongside a lead.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Blank strings count as absent; other strings must parse as numbers.
/// Thousands separators and a leading `$` are tolerated.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',' && *c != '_')
                .collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            cleaned
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid number {:?}", s)))
        }
    }
}
