//! Backend configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Only the backend connection is configurable; everything else
//! about the tool's behavior is fixed.

use std::env;

use thiserror::Error;

use receipt_core::RECEIPTS_COLLECTION;

/// Which backend the creator app talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The hosted provider (default).
    Firebase,
    /// The in-memory backend, for offline demos.
    Memory,
}

impl BackendKind {
    /// Reads `RECEIPTS_BACKEND` (`firebase` | `memory`), defaulting to
    /// the hosted provider.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("RECEIPTS_BACKEND") {
            Err(_) => Ok(BackendKind::Firebase),
            Ok(value) => match value.to_lowercase().as_str() {
                "firebase" => Ok(BackendKind::Firebase),
                "memory" => Ok(BackendKind::Memory),
                _ => Err(ConfigError::InvalidValue {
                    var: "RECEIPTS_BACKEND".to_string(),
                    value,
                }),
            },
        }
    }
}

/// Connection settings for the hosted provider.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Web API key for the identity toolkit endpoint.
    pub api_key: String,

    /// Project hosting the document database.
    pub project_id: String,

    /// Collection the finalized receipts are written to.
    pub collection: String,

    /// Identity toolkit base URL (override for emulators).
    pub auth_host: String,

    /// Document database base URL (override for emulators).
    pub firestore_host: String,
}

impl CloudConfig {
    /// Loads configuration from environment variables.
    ///
    /// ## Variables
    /// - `RECEIPTS_FIREBASE_API_KEY` (required)
    /// - `RECEIPTS_FIREBASE_PROJECT_ID` (required)
    /// - `RECEIPTS_COLLECTION` (default: `receipts`)
    /// - `RECEIPTS_AUTH_HOST` / `RECEIPTS_FIRESTORE_HOST` (emulator overrides)
    pub fn load() -> Result<Self, ConfigError> {
        Ok(CloudConfig {
            api_key: require_var("RECEIPTS_FIREBASE_API_KEY")?,
            project_id: require_var("RECEIPTS_FIREBASE_PROJECT_ID")?,
            collection: collection_from_env(),
            auth_host: env::var("RECEIPTS_AUTH_HOST")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_string()),
            firestore_host: env::var("RECEIPTS_FIRESTORE_HOST")
                .unwrap_or_else(|_| "https://firestore.googleapis.com".to_string()),
        })
    }
}

/// Reads the target collection name, defaulting to the receipts collection.
///
/// Shared by both backends so the memory mode writes where the hosted mode
/// would.
pub fn collection_from_env() -> String {
    env::var("RECEIPTS_COLLECTION").unwrap_or_else(|_| RECEIPTS_COLLECTION.to_string())
}

fn require_var(var: &str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing {
            var: var.to_string(),
        }),
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {var}")]
    Missing { var: String },

    /// A variable is set to something this tool does not understand.
    #[error("invalid value '{value}' for environment variable {var}")]
    InvalidValue { var: String, value: String },
}
