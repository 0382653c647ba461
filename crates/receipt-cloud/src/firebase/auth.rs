//! # Firebase Auth Client
//!
//! Email/password credential exchange against the identity toolkit REST
//! endpoint, with auth-state notification through a watch channel.
//!
//! ## Sign-in Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sign-in Flow                                       │
//! │                                                                         │
//! │  sign_in(email, password)                                               │
//! │       │                                                                 │
//! │       │  POST /v1/accounts:signInWithPassword?key={api_key}             │
//! │       │──────────────────────────────────────────────────►  provider    │
//! │       │                                                                 │
//! │       ├── 200: store idToken, notify SignedIn(uid, email)               │
//! │       │                                                                 │
//! │       └── 4xx: map error code                                           │
//! │            EMAIL_NOT_FOUND / INVALID_PASSWORD /                         │
//! │            INVALID_LOGIN_CREDENTIALS ──► InvalidCredentials             │
//! │            anything else ──────────────► Provider { code }              │
//! │                                                                         │
//! │  Single attempt. The caller resubmits; this client never retries.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sign-out is a local operation (clear the token, notify SignedOut),
//! matching the provider's client SDK behavior. Sessions are not persisted
//! across runs, so `resume` always reports SignedOut.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use async_trait::async_trait;

use crate::config::CloudConfig;
use crate::error::AuthError;
use crate::traits::{AuthGateway, AuthState, Identity, TokenSource};

/// Tokens held for the active session.
#[derive(Debug, Clone)]
struct SessionTokens {
    id_token: String,
}

/// REST client for the identity toolkit.
pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    auth_host: String,
    state_tx: watch::Sender<AuthState>,
    tokens: Mutex<Option<SessionTokens>>,
}

impl FirebaseAuth {
    /// Creates a client from the loaded configuration.
    ///
    /// The watch channel starts at [`AuthState::Unknown`]; subscribers see
    /// the first real state once [`AuthGateway::resume`] runs.
    pub fn new(config: &CloudConfig) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Unknown);
        FirebaseAuth {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            auth_host: config.auth_host.clone(),
            state_tx,
            tokens: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AuthGateway for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        debug!(email, "sign_in request");

        let url = format!(
            "{}/v1/accounts:signInWithPassword?key={}",
            self.auth_host, self.api_key
        );
        let request = SignInRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let code = response
                .json::<ApiErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "UNKNOWN".to_string());
            warn!(code, "sign_in rejected");
            return Err(map_error_code(&code));
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        {
            let mut tokens = self.tokens.lock().expect("token mutex poisoned");
            *tokens = Some(SessionTokens {
                id_token: body.id_token,
            });
        }

        info!(uid = %body.local_id, "signed in");

        // The notification, not this Ok, is what flips the session state.
        self.state_tx.send_replace(AuthState::SignedIn(Identity {
            uid: body.local_id,
            email: body.email,
        }));

        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        {
            let mut tokens = self.tokens.lock().expect("token mutex poisoned");
            *tokens = None;
        }
        info!("signed out");
        self.state_tx.send_replace(AuthState::SignedOut);
        Ok(())
    }

    async fn resume(&self) -> Result<(), AuthError> {
        // No session persistence across runs: the first notification is
        // always SignedOut.
        self.state_tx.send_replace(AuthState::SignedOut);
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }
}

impl TokenSource for FirebaseAuth {
    fn id_token(&self) -> Option<String> {
        let tokens = self.tokens.lock().expect("token mutex poisoned");
        tokens.as_ref().map(|t| t.id_token.clone())
    }
}

/// Maps an identity-toolkit error code to a typed error.
///
/// Codes sometimes arrive with a trailing explanation
/// (`"INVALID_PASSWORD : ..."`), so only the leading token is matched.
fn map_error_code(code: &str) -> AuthError {
    let leading = code.split_whitespace().next().unwrap_or(code);
    match leading {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            AuthError::InvalidCredentials
        }
        _ => AuthError::Provider {
            code: leading.to_string(),
        },
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_codes_map_to_invalid_credentials() {
        for code in [
            "EMAIL_NOT_FOUND",
            "INVALID_PASSWORD",
            "INVALID_LOGIN_CREDENTIALS",
            "INVALID_EMAIL",
        ] {
            assert!(matches!(map_error_code(code), AuthError::InvalidCredentials));
        }
    }

    #[test]
    fn test_error_code_with_trailing_explanation() {
        let err = map_error_code("INVALID_PASSWORD : The password is invalid");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_other_codes_stay_provider_errors() {
        match map_error_code("USER_DISABLED") {
            AuthError::Provider { code } => assert_eq!(code, "USER_DISABLED"),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_sign_in_response_parsing() {
        let body: SignInResponse = serde_json::from_str(
            r#"{"idToken":"tok","localId":"u1","email":"op@example.com","expiresIn":"3600"}"#,
        )
        .unwrap();
        assert_eq!(body.id_token, "tok");
        assert_eq!(body.local_id, "u1");
        assert_eq!(body.email.as_deref(), Some("op@example.com"));
    }
}
