//! # Receipt Form State
//!
//! The draft receipt under edit, plus the submission pipeline.
//!
//! ## Submission Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Submit                                               │
//! │                                                                         │
//! │  session check ──► in-flight flag ──► validate ──► finalize ──► create  │
//! │       │                  │                │                       │     │
//! │       ▼                  ▼                ▼                       ▼     │
//! │  NotSignedIn     SubmissionInFlight   Validation{..}       StorageError │
//! │  (flag never     (second caller       (flag cleared,       (flag       │
//! │   raised)         bounced)             draft kept)          cleared,   │
//! │                                                             draft kept)│
//! │                                                                         │
//! │  On success: draft replaced with a fresh single-item draft, flag        │
//! │  cleared. Exactly one create call per successful submission.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The in-flight flag is the sole concurrency guard; there is no queueing
//! and no automatic retry. The flag is cleared on every exit path by a
//! drop guard, so a panicking collaborator cannot wedge the form.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{info, warn};

use receipt_cloud::DocumentStore;
use receipt_core::{finalize, validate_draft, Currency, DraftReceipt, DraftResult};

use crate::error::AppError;
use crate::state::Session;

/// What a successful submission hands back to the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub document_id: String,
    pub total: f64,
}

/// The draft receipt and its submission guard.
///
/// Edits lock the draft briefly; `submit` clones a snapshot and releases the
/// lock before any await, so prompts never block behind the network.
pub struct ReceiptForm {
    draft: Mutex<DraftReceipt>,
    in_flight: AtomicBool,
}

impl ReceiptForm {
    /// Fresh form for the given owner: one empty line item, zero total.
    pub fn new(owner_id: &str) -> Self {
        ReceiptForm {
            draft: Mutex::new(DraftReceipt::new(owner_id)),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Clone of the current draft, for rendering.
    pub fn snapshot(&self) -> DraftReceipt {
        self.draft.lock().expect("draft mutex poisoned").clone()
    }

    pub fn add_line_item(&self) {
        let mut draft = self.draft.lock().expect("draft mutex poisoned");
        draft.add_line_item();
    }

    pub fn set_merchant_name(&self, name: &str) {
        let mut draft = self.draft.lock().expect("draft mutex poisoned");
        draft.set_merchant_name(name);
    }

    pub fn set_currency(&self, currency: Currency) {
        let mut draft = self.draft.lock().expect("draft mutex poisoned");
        draft.set_currency(currency);
    }

    pub fn set_item_name(&self, index: usize, name: &str) -> DraftResult<()> {
        let mut draft = self.draft.lock().expect("draft mutex poisoned");
        draft.set_item_name(index, name)
    }

    pub fn set_item_price(&self, index: usize, price: Option<f64>) -> DraftResult<()> {
        let mut draft = self.draft.lock().expect("draft mutex poisoned");
        draft.set_item_price(index, price)
    }

    /// Runs the field rules against the current draft without submitting.
    pub fn validate(&self) -> receipt_core::FieldErrors {
        let draft = self.draft.lock().expect("draft mutex poisoned");
        validate_draft(&draft)
    }

    /// Whether a create call is currently outstanding.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validates, finalizes, and creates the receipt document.
    ///
    /// The draft is reset only after the store confirms the create; every
    /// failure leaves the operator's entries intact for a manual retry.
    pub async fn submit(
        &self,
        store: &dyn DocumentStore,
        collection: &str,
        session: &Session,
    ) -> Result<SubmitOutcome, AppError> {
        let identity = session.identity().ok_or(AppError::NotSignedIn)?.clone();

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("submit rejected: another submission is in flight");
            return Err(AppError::SubmissionInFlight);
        }
        let _guard = InFlightGuard { flag: &self.in_flight };

        let draft = self.snapshot();

        let errors = validate_draft(&draft);
        if !errors.is_empty() {
            return Err(AppError::Validation { errors });
        }

        let now_ms = Utc::now().timestamp_millis();
        let record = finalize(&draft, &identity.uid, now_ms);

        let created = store.create_document(collection, &record).await?;

        info!(
            document_id = %created.id,
            total = record.total,
            "receipt created"
        );

        {
            let mut current = self.draft.lock().expect("draft mutex poisoned");
            *current = DraftReceipt::new(&identity.uid);
        }

        Ok(SubmitOutcome {
            document_id: created.id,
            total: record.total,
        })
    }
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use receipt_cloud::{CreatedDocument, Identity, MemoryStore, StorageError};
    use receipt_core::FinalizedReceipt;

    fn signed_in() -> Session {
        Session::Authenticated(Identity {
            uid: "owner-1".to_string(),
            email: Some("op@example.com".to_string()),
        })
    }

    fn filled_form() -> ReceiptForm {
        let form = ReceiptForm::new("owner-1");
        form.set_merchant_name("Corner Cafe");
        form.set_item_name(0, "Coffee").unwrap();
        form.set_item_price(0, Some(3.5)).unwrap();
        form
    }

    #[tokio::test]
    async fn test_submit_requires_session() {
        let store = MemoryStore::new();
        let form = filled_form();

        let err = form
            .submit(&store, "receipts", &Session::Unauthenticated)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotSignedIn));
        assert_eq!(store.create_calls(), 0);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_success_resets_draft() {
        let store = MemoryStore::new();
        let form = filled_form();
        form.add_line_item();
        form.set_item_name(1, "Muffin").unwrap();
        form.set_item_price(1, Some(2.25)).unwrap();

        let before = form.snapshot();
        let outcome = form.submit(&store, "receipts", &signed_in()).await.unwrap();

        assert_eq!(outcome.total, 5.75);
        assert_eq!(outcome.document_id.len(), 20);
        assert_eq!(store.create_calls(), 1);

        let after = form.snapshot();
        assert_eq!(after.line_items.len(), 1);
        assert_eq!(after.total, 0.0);
        assert_eq!(after.owner_id, "owner-1");
        assert_ne!(after.order_id, before.order_id);
        assert_ne!(after.merchant_id, before.merchant_id);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_submitted_document_wire_shape() {
        let store = MemoryStore::new();
        let form = filled_form();
        form.add_line_item();
        form.set_item_name(1, "Muffin").unwrap();
        form.set_item_price(1, Some(2.25)).unwrap();

        let order_id = form.snapshot().order_id.clone();
        form.submit(&store, "receipts", &signed_in()).await.unwrap();

        let documents = store.documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].0, "receipts");

        let doc = &documents[0].1;
        assert_eq!(doc["userId"], "owner-1");
        assert_eq!(doc["orderId"], serde_json::Value::from(order_id.as_str()));
        assert_eq!(doc["merchantName"], "Corner Cafe");
        assert_eq!(doc["currency"], "USD");
        assert_eq!(doc["total"], 5.75);
        assert_eq!(doc["paymentStatus"], "locked");
        assert_eq!(doc["success"], true);
        assert_eq!(doc["createdAt"], doc["lastModified"]);

        let items = doc["lineItems"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0]["id"].as_str().unwrap().starts_with("ITEM1"));
        assert!(items[1]["item"]["id"].as_str().unwrap().starts_with("PROD2"));
        assert_eq!(
            items[0]["orderRef"]["id"],
            serde_json::Value::from(order_id.as_str())
        );
        assert_eq!(items[1]["price"], 2.25);
        assert_eq!(items[0]["createdTime"], doc["createdAt"]);
    }

    #[tokio::test]
    async fn test_validation_failure_blocks_create() {
        let store = MemoryStore::new();
        let form = ReceiptForm::new("owner-1");

        let err = form
            .submit(&store, "receipts", &signed_in())
            .await
            .unwrap_err();
        match err {
            AppError::Validation { errors } => {
                assert!(errors.contains_key("merchantName"));
                assert!(errors.contains_key("lineItems.0.name"));
                assert!(errors.contains_key("lineItems.0.price"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.create_calls(), 0);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_store_failure_keeps_draft_for_retry() {
        let store = MemoryStore::new();
        store.fail_next_create();
        let form = filled_form();
        let before = form.snapshot();

        let err = form
            .submit(&store, "receipts", &signed_in())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        // Entries survive the failure.
        let after = form.snapshot();
        assert_eq!(after.merchant_name, before.merchant_name);
        assert_eq!(after.line_items[0].price, Some(3.5));
        assert!(!form.is_submitting());

        // Manual retry succeeds.
        let outcome = form.submit(&store, "receipts", &signed_in()).await.unwrap();
        assert_eq!(outcome.total, 3.5);
        assert_eq!(store.create_calls(), 2);
    }

    /// Store that parks inside create until released, so a second submit
    /// can race the first.
    struct BlockingStore {
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for BlockingStore {
        async fn create_document(
            &self,
            _collection: &str,
            _record: &FinalizedReceipt,
        ) -> Result<CreatedDocument, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(CreatedDocument {
                id: "doc-1".to_string(),
            })
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_duplicate_submit_is_bounced() {
        let store = Arc::new(BlockingStore {
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let form = Arc::new(filled_form());

        let first = {
            let store = store.clone();
            let form = form.clone();
            tokio::spawn(async move { form.submit(store.as_ref(), "receipts", &signed_in()).await })
        };

        // Wait until the first submit is parked inside the store.
        while store.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(form.is_submitting());

        let err = form
            .submit(store.as_ref(), "receipts", &signed_in())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SubmissionInFlight));

        store.release.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.document_id, "doc-1");
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert!(!form.is_submitting());
    }
}
