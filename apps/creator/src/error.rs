//! # App Error Type
//!
//! Unified error type for the creator app.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Handling in Receipt Desk                       │
//! │                                                                         │
//! │  Validation errors   field-level, recoverable; block submission only    │
//! │                      and print inline per field path                    │
//! │                                                                         │
//! │  Auth errors         surfaced to the login/logout caller as a generic   │
//! │                      alert; the operator resubmits                      │
//! │                                                                         │
//! │  Storage errors      generic alert; the draft is left untouched so the  │
//! │                      operator can retry without re-entering data        │
//! │                                                                         │
//! │  No fatal class: every failure is locally recoverable by retry, and     │
//! │  nothing is retried automatically.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use receipt_cloud::{AuthError, ConfigError, StorageError};
use receipt_core::FieldErrors;

/// Errors surfaced by the creator app.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submission requires an active session.
    #[error("not signed in")]
    NotSignedIn,

    /// A create call is already outstanding; the submit action is disabled
    /// until it settles.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// The draft violates one or more field rules.
    #[error("receipt failed validation: {} field(s) need attention", errors.len())]
    Validation { errors: FieldErrors },

    /// Credential exchange / session termination failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Document create failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Backend configuration failure at startup.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The terminal prompt was interrupted or failed.
    #[error("prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),
}
