//! # Collaborator Traits
//!
//! The seams between Receipt Desk and the hosted provider. The app depends
//! on these traits only; the Firebase and in-memory backends implement them.
//!
//! ## Auth State Notification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Auth State Notification                               │
//! │                                                                         │
//! │   sign_in() ──► provider ──► watch channel ──► session listener         │
//! │                                                                         │
//! │   The watch channel is the source of truth. A successful sign_in call   │
//! │   return is advisory; the session state machine only flips when the     │
//! │   SignedIn notification arrives. This mirrors the provider's own        │
//! │   auth-state-changed subscription model.                                │
//! │                                                                         │
//! │   Initial value: AuthState::Unknown, until resume() emits the first     │
//! │   notification. Dependent surfaces must not render before then.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use tokio::sync::watch;

use receipt_core::FinalizedReceipt;

use crate::error::{AuthError, StorageError};

// =============================================================================
// Identity & Auth State
// =============================================================================

/// The signed-in operator, as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque user reference; stamped onto receipts as `userId`.
    pub uid: String,

    /// Email shown in the signed-in header, when the provider reports one.
    pub email: Option<String>,
}

/// The auth collaborator's view of the session.
///
/// `Unknown` is the pre-first-notification state: the subscriber cannot yet
/// distinguish "signed out" from "provider still restoring a session".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No notification received yet.
    #[default]
    Unknown,
    /// A session exists for this identity.
    SignedIn(Identity),
    /// No session exists.
    SignedOut,
}

// =============================================================================
// Auth Gateway
// =============================================================================

/// The auth collaborator: credential exchange plus state notification.
///
/// ## Contract
/// - `sign_in` / `sign_out` are single attempts; failures propagate to the
///   caller unchanged, with no retry or backoff.
/// - State transitions are delivered through [`AuthGateway::watch`], never
///   through the call's return value.
/// - `resume` emits the initial notification (restoring any persisted
///   session the backend supports); until then the watch holds
///   [`AuthState::Unknown`].
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Attempts the email/password credential exchange.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Requests session termination.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Emits the initial auth-state notification.
    async fn resume(&self) -> Result<(), AuthError>;

    /// Subscribes to auth-state notifications.
    ///
    /// Dropping the receiver is the unsubscription; no explicit teardown
    /// call exists.
    fn watch(&self) -> watch::Receiver<AuthState>;
}

// =============================================================================
// Document Store
// =============================================================================

/// Outcome of a successful create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDocument {
    /// Identifier assigned by the store.
    pub id: String,
}

/// The storage collaborator: a single atomic create into a named collection.
///
/// No update, delete, or query operations are used by this system.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists one finalized receipt as a new document.
    async fn create_document(
        &self,
        collection: &str,
        record: &FinalizedReceipt,
    ) -> Result<CreatedDocument, StorageError>;
}

// =============================================================================
// Token Source
// =============================================================================

/// Read access to the current session token.
///
/// Lets the document store authenticate writes without depending on a
/// concrete auth type.
pub trait TokenSource: Send + Sync {
    /// The current ID token, if a session exists.
    fn id_token(&self) -> Option<String>;
}
