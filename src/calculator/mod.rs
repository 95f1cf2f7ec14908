//! Mortgage calculators behind the site's calculator pages.
//!
//! All rates are annual percentages. Money values are rounded to cents on
//! output only.

pub mod affordability;
pub mod down_payment;
pub mod payment;
pub mod types;

pub use affordability::affordability;
pub use down_payment::{down_payment_quote, minimum_down_payment};
pub use payment::{amortization_schedule, payment, periodic_rate};
pub use types::{
    AffordabilityInput, AffordabilityResult, CalcError, Compounding, DownPaymentQuote, MortgageTerms,
    PaymentFrequency, PaymentSummary, YearSummary,
};
