//! # In-Memory Backend
//!
//! Collaborator implementations with no network behind them. Used by the
//! session/form tests and by the CLI's offline demo mode
//! (`RECEIPTS_BACKEND=memory`).
//!
//! The contract matches the hosted backend exactly: sign-in success is
//! announced through the watch channel, creates are atomic, and an injected
//! failure surfaces the same typed error a rejected REST call would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info};

use async_trait::async_trait;

use receipt_core::ids::placeholder_id;
use receipt_core::FinalizedReceipt;

use crate::error::{AuthError, StorageError};
use crate::traits::{
    AuthGateway, AuthState, CreatedDocument, DocumentStore, Identity, TokenSource,
};

// =============================================================================
// Memory Auth
// =============================================================================

struct Account {
    password: String,
    uid: String,
}

/// In-memory auth gateway with seeded accounts.
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<Identity>>,
    state_tx: watch::Sender<AuthState>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(AuthState::Unknown);
        MemoryAuth {
            accounts: Mutex::new(HashMap::new()),
            current: Mutex::new(None),
            state_tx,
        }
    }

    /// Seeds an account and returns its generated uid.
    pub fn add_account(&self, email: &str, password: &str) -> String {
        let uid = placeholder_id();
        let mut accounts = self.accounts.lock().expect("account mutex poisoned");
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                uid: uid.clone(),
            },
        );
        uid
    }

    /// Builder-style account seeding.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.add_account(email, password);
        self
    }

    fn current_state(&self) -> AuthState {
        let current = self.current.lock().expect("session mutex poisoned");
        match current.as_ref() {
            Some(identity) => AuthState::SignedIn(identity.clone()),
            None => AuthState::SignedOut,
        }
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthGateway for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let identity = {
            let accounts = self.accounts.lock().expect("account mutex poisoned");
            let account = accounts
                .get(email)
                .filter(|a| a.password == password)
                .ok_or(AuthError::InvalidCredentials)?;
            Identity {
                uid: account.uid.clone(),
                email: Some(email.to_string()),
            }
        };

        {
            let mut current = self.current.lock().expect("session mutex poisoned");
            *current = Some(identity.clone());
        }

        info!(uid = %identity.uid, "memory sign-in");
        self.state_tx.send_replace(AuthState::SignedIn(identity));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        {
            let mut current = self.current.lock().expect("session mutex poisoned");
            *current = None;
        }
        self.state_tx.send_replace(AuthState::SignedOut);
        Ok(())
    }

    async fn resume(&self) -> Result<(), AuthError> {
        self.state_tx.send_replace(self.current_state());
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }
}

impl TokenSource for MemoryAuth {
    fn id_token(&self) -> Option<String> {
        let current = self.current.lock().expect("session mutex poisoned");
        current.as_ref().map(|id| format!("memory-token-{}", id.uid))
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory document store that records every create call.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<(String, Value)>>,
    create_calls: AtomicUsize,
    fail_next: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next create call fail with a rejection.
    pub fn fail_next_create(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of create calls that reached this store.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored `(collection, document)` pairs.
    pub fn documents(&self) -> Vec<(String, Value)> {
        self.documents.lock().expect("document mutex poisoned").clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(
        &self,
        collection: &str,
        record: &FinalizedReceipt,
    ) -> Result<CreatedDocument, StorageError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Rejected {
                status: 503,
                message: "injected failure".to_string(),
            });
        }

        let value = serde_json::to_value(record)?;
        let id = placeholder_id();

        {
            let mut documents = self.documents.lock().expect("document mutex poisoned");
            documents.push((collection.to_string(), value));
        }

        debug!(collection, document_id = %id, "memory document created");
        Ok(CreatedDocument { id })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use receipt_core::{finalize, DraftReceipt};

    fn sample_record() -> FinalizedReceipt {
        let mut draft = DraftReceipt::new("u1");
        draft.set_merchant_name("Corner Cafe");
        draft.set_item_name(0, "Coffee").unwrap();
        draft.set_item_price(0, Some(3.5)).unwrap();
        finalize(&draft, "u1", 1700000000000)
    }

    #[tokio::test]
    async fn test_sign_in_notifies_watch() {
        let auth = MemoryAuth::new().with_account("op@example.com", "hunter2");
        let mut rx = auth.watch();

        assert_eq!(*rx.borrow(), AuthState::Unknown);

        auth.resume().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);

        auth.sign_in("op@example.com", "hunter2").await.unwrap();
        match rx.borrow_and_update().clone() {
            AuthState::SignedIn(identity) => {
                assert_eq!(identity.email.as_deref(), Some("op@example.com"));
            }
            other => panic!("unexpected state: {other:?}"),
        }

        auth.sign_out().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_bad_credentials_leave_state_untouched() {
        let auth = MemoryAuth::new().with_account("op@example.com", "hunter2");
        let rx = auth.watch();
        auth.resume().await.unwrap();

        let err = auth.sign_in("op@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(*rx.borrow(), AuthState::SignedOut);
        assert!(auth.id_token().is_none());
    }

    #[tokio::test]
    async fn test_token_tracks_session() {
        let auth = MemoryAuth::new().with_account("op@example.com", "hunter2");
        auth.sign_in("op@example.com", "hunter2").await.unwrap();
        assert!(auth.id_token().is_some());

        auth.sign_out().await.unwrap();
        assert!(auth.id_token().is_none());
    }

    #[tokio::test]
    async fn test_store_records_documents() {
        let store = MemoryStore::new();
        let created = store
            .create_document("receipts", &sample_record())
            .await
            .unwrap();

        assert_eq!(created.id.len(), 20);
        assert_eq!(store.create_calls(), 1);

        let documents = store.documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].0, "receipts");
        assert_eq!(documents[0].1["merchantName"], "Corner Cafe");
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next_create();

        let err = store
            .create_document("receipts", &sample_record())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Rejected { status: 503, .. }));
        assert!(store.documents().is_empty());

        store
            .create_document("receipts", &sample_record())
            .await
            .unwrap();
        assert_eq!(store.create_calls(), 2);
        assert_eq!(store.documents().len(), 1);
    }
}
