//! # Error Types
//!
//! Domain-specific error types for receipt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  receipt-core errors (this file)                                        │
//! │  └── DraftError       - Structural draft edit failures                  │
//! │                                                                         │
//! │  receipt-cloud errors (separate crate)                                  │
//! │  ├── AuthError        - Credential exchange failures                    │
//! │  └── StorageError     - Document create failures                        │
//! │                                                                         │
//! │  Creator app errors                                                     │
//! │  └── AppError         - What the operator sees                          │
//! │                                                                         │
//! │  Validation is NOT an error type here: per-field rule checks collect    │
//! │  every violation into a path -> message map (see `validation`), which   │
//! │  the app surfaces inline instead of short-circuiting.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Structural errors while editing a draft receipt.
///
/// These are programming/UI errors (a field path that does not exist), not
/// business-rule violations. Rule violations are collected by
/// [`crate::validation::validate_draft`] instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// A line-item edit referenced an index the draft does not have.
    #[error("draft has no line item at index {index} (len {len})")]
    NoSuchLineItem { index: usize, len: usize },
}

/// Convenience type alias for Results with DraftError.
pub type DraftResult<T> = Result<T, DraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DraftError::NoSuchLineItem { index: 3, len: 1 };
        assert_eq!(err.to_string(), "draft has no line item at index 3 (len 1)");
    }
}
