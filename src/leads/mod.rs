//! Lead capture subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/leads (JSON)
//!     → types.rs (LeadSubmission, numbers or numeric strings)
//!     → intake.rs (honeypot check)
//!     → sanitize.rs (strip markup, escape)
//!     → validation.rs (all field errors at once)
//!     → store.rs (read array, append, atomic rewrite)
//! ```

pub mod intake;
pub mod sanitize;
pub mod store;
pub mod types;
pub mod validation;

pub use intake::{validate_submission, LeadError, LeadIntake, SubmitOutcome};
pub use store::{JsonFileStore, StoreError};
pub use types::{ClientInfo, FieldError, Lead, LeadSubmission};
