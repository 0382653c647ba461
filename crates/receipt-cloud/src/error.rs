//! # Collaborator Error Types
//!
//! Error types for auth and document-store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Provider REST response (reqwest::Error / error body)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AuthError / StorageError (this module) ← adds categorization           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (creator app) ← surfaced as a generic alert; the draft is     │
//! │       │                   left untouched so the operator can retry      │
//! │       ▼                                                                 │
//! │  Terminal message                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is locally recoverable by operator retry; nothing is
//! retried automatically and no variant is fatal.

use thiserror::Error;

/// Credential exchange / session termination failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider rejected the email/password pair.
    ///
    /// ## When This Occurs
    /// - Unknown email
    /// - Wrong password
    /// - Disabled account reported as a credential failure by the provider
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The provider rejected the request for another reason.
    #[error("auth provider rejected the request: {code}")]
    Provider { code: String },

    /// The request never produced a provider response.
    #[error("auth request failed: {0}")]
    Network(String),

    /// The provider responded with a body this client could not read.
    #[error("malformed auth response: {0}")]
    MalformedResponse(String),
}

/// Document create failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store rejected the create call (auth, quota, bad collection...).
    #[error("document store rejected the create ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a store response.
    #[error("document store request failed: {0}")]
    Network(String),

    /// The record could not be encoded for the wire.
    #[error("failed to encode record: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The store responded with a body this client could not read.
    #[error("malformed store response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "invalid email or password"
        );
        let err = AuthError::Provider {
            code: "USER_DISABLED".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "auth provider rejected the request: USER_DISABLED"
        );
    }

    #[test]
    fn test_storage_error_messages() {
        let err = StorageError::Rejected {
            status: 403,
            message: "PERMISSION_DENIED".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "document store rejected the create (403): PERMISSION_DENIED"
        );
    }
}
