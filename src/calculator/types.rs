//! Calculator input and output types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the quoted annual rate compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    Monthly,
    /// Canadian fixed-rate convention.
    #[default]
    SemiAnnual,
}

impl Compounding {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Compounding::Monthly => 12,
            Compounding::SemiAnnual => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    SemiMonthly,
    BiWeekly,
    Weekly,
    /// Half the monthly payment, every two weeks.
    AcceleratedBiWeekly,
    /// A quarter of the monthly payment, every week.
    AcceleratedWeekly,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::SemiMonthly => 24,
            PaymentFrequency::BiWeekly | PaymentFrequency::AcceleratedBiWeekly => 26,
            PaymentFrequency::Weekly | PaymentFrequency::AcceleratedWeekly => 52,
        }
    }

    /// Divisor applied to the monthly payment for accelerated schedules.
    pub fn acceleration_divisor(self) -> Option<f64> {
        match self {
            PaymentFrequency::AcceleratedBiWeekly => Some(2.0),
            PaymentFrequency::AcceleratedWeekly => Some(4.0),
            _ => None,
        }
    }
}

/// Loan terms shared by the payment and schedule calculators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageTerms {
    pub principal: f64,
    /// Annual rate in percent.
    pub annual_rate: f64,
    pub amortization_years: u32,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[serde(default)]
    pub compounding: Compounding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub payment: f64,
    pub periods_per_year: u32,
    pub number_of_payments: u32,
    pub total_paid: f64,
    pub total_interest: f64,
    /// Years until the balance reaches zero. Shorter than the amortization
    /// for accelerated schedules.
    pub payoff_years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityInput {
    pub annual_income: f64,
    #[serde(default)]
    pub monthly_debts: f64,
    #[serde(default)]
    pub monthly_property_tax: f64,
    #[serde(default)]
    pub monthly_heating: f64,
    #[serde(default)]
    pub monthly_condo_fees: f64,
    #[serde(default)]
    pub down_payment: f64,
    /// Contract rate in percent.
    pub annual_rate: f64,
    pub amortization_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityResult {
    /// Stress-test rate the maximum is qualified at, in percent.
    pub qualifying_rate: f64,
    /// Highest monthly principal and interest the ratios allow.
    pub max_monthly_payment: f64,
    pub max_mortgage: f64,
    pub max_purchase_price: f64,
    /// Monthly payment on `max_mortgage` at the contract rate.
    pub contract_monthly_payment: f64,
    /// Gross debt service ratio at the maximum, in percent.
    pub gds_ratio: f64,
    /// Total debt service ratio at the maximum, in percent.
    pub tds_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownPaymentQuote {
    pub purchase_price: f64,
    pub minimum_down_payment: f64,
    pub down_payment: f64,
    pub loan_amount: f64,
    /// Loan-to-value in percent.
    pub loan_to_value: f64,
    /// Default insurance premium rate in percent; zero when not required.
    pub insurance_rate: f64,
    pub insurance_premium: f64,
    /// Loan plus premium.
    pub total_mortgage: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{field} {reason}")]
    InvalidInput { field: &'static str, reason: &'static str },

    #[error("down payment must be at least {required:.2}")]
    InsufficientDownPayment { required: f64 },
}
