//! # Firestore Client
//!
//! Single-operation REST client for the document database: create one
//! document in the receipts collection.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Document Create Flow                               │
//! │                                                                         │
//! │  FinalizedReceipt (plain JSON)                                          │
//! │       │                                                                 │
//! │       ▼  encode_document                                                │
//! │  Typed value format: {"fields": {"total": {"doubleValue": 5.75}, ...}}  │
//! │       │                                                                 │
//! │       ▼  POST /v1/projects/{p}/databases/(default)/documents/{coll}     │
//! │  Bearer {idToken}                                                       │
//! │       │                                                                 │
//! │       ├── 200: {"name": ".../documents/receipts/{assigned id}"}         │
//! │       │        ──► CreatedDocument { id }                               │
//! │       │                                                                 │
//! │       └── error: StorageError::Rejected { status, message }             │
//! │                  (no retry; the caller keeps its draft and may retry)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Integer fields travel as `integerValue` strings, per the store's wire
//! format; everything else maps structurally.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use async_trait::async_trait;

use receipt_core::FinalizedReceipt;

use crate::config::CloudConfig;
use crate::error::StorageError;
use crate::traits::{CreatedDocument, DocumentStore, TokenSource};

/// REST client for the document database.
pub struct Firestore {
    http: reqwest::Client,
    project_id: String,
    host: String,
    tokens: Arc<dyn TokenSource>,
}

impl Firestore {
    /// Creates a client that authenticates writes with tokens from `tokens`.
    pub fn new(config: &CloudConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Firestore {
            http: reqwest::Client::new(),
            project_id: config.project_id.clone(),
            host: config.firestore_host.clone(),
            tokens,
        }
    }
}

#[async_trait]
impl DocumentStore for Firestore {
    async fn create_document(
        &self,
        collection: &str,
        record: &FinalizedReceipt,
    ) -> Result<CreatedDocument, StorageError> {
        debug!(collection, order_id = %record.order_id, "create_document request");

        let url = format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.host, self.project_id, collection
        );
        let body = encode_document(&serde_json::to_value(record)?);

        let mut request = self.http.post(&url).json(&body);
        if let Some(token) = self.tokens.id_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreateDocumentResponse = response
            .json()
            .await
            .map_err(|e| StorageError::MalformedResponse(e.to_string()))?;

        // The resource name ends with the assigned document ID.
        let id = created
            .name
            .rsplit('/')
            .next()
            .unwrap_or(created.name.as_str())
            .to_string();

        info!(collection, document_id = %id, "receipt document created");

        Ok(CreatedDocument { id })
    }
}

#[derive(Debug, Deserialize)]
struct CreateDocumentResponse {
    /// Full resource name: `projects/{p}/databases/(default)/documents/{c}/{id}`.
    name: String,
}

// =============================================================================
// Typed Value Encoding
// =============================================================================

/// Wraps a plain JSON object into the store's `{"fields": ...}` envelope.
fn encode_document(record: &Value) -> Value {
    match record {
        Value::Object(map) => json!({ "fields": encode_fields(map) }),
        // Records are always objects; anything else is a single-value doc.
        other => json!({ "fields": { "value": encode_value(other) } }),
    }
}

fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect(),
    )
}

/// Maps one plain JSON value to the store's typed value format.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // int64 travels as a string on this wire
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use receipt_core::{finalize, Currency, DraftReceipt};

    #[test]
    fn test_scalar_encoding() {
        assert_eq!(encode_value(&json!(true)), json!({"booleanValue": true}));
        assert_eq!(encode_value(&json!("hi")), json!({"stringValue": "hi"}));
        assert_eq!(encode_value(&json!(null)), json!({"nullValue": null}));
    }

    #[test]
    fn test_integers_travel_as_strings() {
        assert_eq!(
            encode_value(&json!(1700000000000i64)),
            json!({"integerValue": "1700000000000"})
        );
    }

    #[test]
    fn test_floats_stay_doubles() {
        assert_eq!(encode_value(&json!(5.75)), json!({"doubleValue": 5.75}));
    }

    #[test]
    fn test_nested_structures() {
        let encoded = encode_value(&json!({"items": [{"price": 3.5}]}));
        assert_eq!(
            encoded["mapValue"]["fields"]["items"]["arrayValue"]["values"][0]["mapValue"]["fields"]
                ["price"],
            json!({"doubleValue": 3.5})
        );
    }

    #[test]
    fn test_receipt_document_envelope() {
        let mut draft = DraftReceipt::new("u1");
        draft.set_merchant_name("Corner Cafe");
        draft.set_currency(Currency::Usd);
        draft.set_item_name(0, "Coffee").unwrap();
        draft.set_item_price(0, Some(3.5)).unwrap();

        let record = finalize(&draft, "u1", 1700000000000);
        let doc = encode_document(&serde_json::to_value(&record).unwrap());

        let fields = &doc["fields"];
        assert_eq!(fields["userId"], json!({"stringValue": "u1"}));
        assert_eq!(fields["paymentStatus"], json!({"stringValue": "locked"}));
        assert_eq!(fields["success"], json!({"booleanValue": true}));
        assert_eq!(
            fields["createdAt"],
            json!({"integerValue": "1700000000000"})
        );

        let item = &fields["lineItems"]["arrayValue"]["values"][0]["mapValue"]["fields"];
        assert_eq!(
            item["id"],
            json!({"stringValue": "ITEM11700000000000"})
        );
        assert_eq!(
            item["orderRef"]["mapValue"]["fields"]["id"],
            json!({"stringValue": record.order_id})
        );
    }
}
