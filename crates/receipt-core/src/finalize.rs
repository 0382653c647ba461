//! # Finalization
//!
//! Transforms a draft receipt into the fully stamped record that is handed
//! to the document store.
//!
//! ## Finalization Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Finalization Flow                                  │
//! │                                                                         │
//! │  DraftReceipt + owner_id + now_ms                                       │
//! │       │                                                                 │
//! │       ├── total ◄── recomputed from line items (cached value ignored)   │
//! │       │                                                                 │
//! │       ├── one shared `now` for createdAt, lastModified, and every       │
//! │       │   line item's createdTime / orderClientCreatedTime              │
//! │       │                                                                 │
//! │       ├── per item: id = ITEM{i+1}{now}, item.id = PROD{i+1}{now},      │
//! │       │             orderRef.id = draft.order_id                        │
//! │       │                                                                 │
//! │       └── paymentStatus = "locked", success = true                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure function: no clock reads, no RNG. The caller supplies the timestamp
//! so the same draft finalized at the same instant yields the same record.

use crate::ids::{line_item_id, product_ref_id};
use crate::types::{compute_total, DraftReceipt, FinalizedLineItem, FinalizedReceipt, ItemRef, OrderRef};
use crate::PAYMENT_STATUS_LOCKED;

/// Builds the finalized record for `draft`.
///
/// `owner_id` re-stamps ownership from the active session (the draft's own
/// `owner_id` may predate a re-login). `now_ms` is the single shared
/// submission timestamp in epoch milliseconds.
///
/// The total is recomputed here from the line items so the persisted value
/// can never be stale, even if an intermediate re-derivation was missed.
pub fn finalize(draft: &DraftReceipt, owner_id: &str, now_ms: i64) -> FinalizedReceipt {
    let line_items = draft
        .line_items
        .iter()
        .enumerate()
        .map(|(index, item)| FinalizedLineItem {
            id: line_item_id(index, now_ms),
            order_ref: OrderRef {
                id: draft.order_id.clone(),
            },
            item: ItemRef {
                id: product_ref_id(index, now_ms),
            },
            name: item.name.clone(),
            price: item.price_or_zero(),
            printed: item.printed,
            created_time: now_ms,
            order_client_created_time: now_ms,
            exchanged: item.exchanged,
            refunded: item.refunded,
            is_revenue: item.is_revenue,
            is_order_fee: item.is_order_fee,
        })
        .collect();

    FinalizedReceipt {
        user_id: owner_id.to_string(),
        order_id: draft.order_id.clone(),
        merchant_id: draft.merchant_id.clone(),
        merchant_name: draft.merchant_name.clone(),
        currency: draft.currency,
        total: compute_total(&draft.line_items),
        line_items,
        created_at: now_ms,
        last_modified: now_ms,
        payment_status: PAYMENT_STATUS_LOCKED.to_string(),
        success: true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;

    const T: i64 = 1700000000000;

    fn sample_draft() -> DraftReceipt {
        let mut draft = DraftReceipt::new("stale-owner");
        draft.set_merchant_name("Corner Cafe");
        draft.set_currency(Currency::Eur);
        draft.set_item_name(0, "Coffee").unwrap();
        draft.set_item_price(0, Some(3.5)).unwrap();
        let idx = draft.add_line_item();
        draft.set_item_name(idx, "Muffin").unwrap();
        draft.set_item_price(idx, Some(2.25)).unwrap();
        draft
    }

    #[test]
    fn test_finalize_stamps_generated_fields() {
        let draft = sample_draft();
        let receipt = finalize(&draft, "u1", T);

        assert_eq!(receipt.user_id, "u1");
        assert_eq!(receipt.line_items[0].id, format!("ITEM1{T}"));
        assert_eq!(receipt.line_items[0].item.id, format!("PROD1{T}"));
        assert_eq!(receipt.line_items[0].order_ref.id, draft.order_id);
        assert_eq!(receipt.line_items[1].id, format!("ITEM2{T}"));
        assert_eq!(receipt.payment_status, "locked");
        assert!(receipt.success);
    }

    #[test]
    fn test_finalize_shares_one_timestamp() {
        let receipt = finalize(&sample_draft(), "u1", T);

        assert_eq!(receipt.created_at, T);
        assert_eq!(receipt.last_modified, T);
        for item in &receipt.line_items {
            assert_eq!(item.created_time, T);
            assert_eq!(item.order_client_created_time, T);
        }
    }

    #[test]
    fn test_finalize_recomputes_total_authoritatively() {
        let mut draft = sample_draft();
        // Simulate a missed re-derivation: the cached total is garbage.
        draft.total = 999.0;

        let receipt = finalize(&draft, "u1", T);
        assert_eq!(receipt.total, 5.75);
    }

    #[test]
    fn test_finalize_freezes_draft_fields() {
        let draft = sample_draft();
        let receipt = finalize(&draft, "u1", T);

        assert_eq!(receipt.order_id, draft.order_id);
        assert_eq!(receipt.merchant_id, draft.merchant_id);
        assert_eq!(receipt.merchant_name, "Corner Cafe");
        assert_eq!(receipt.currency, Currency::Eur);
        assert_eq!(receipt.line_items[1].name, "Muffin");
        assert_eq!(receipt.line_items[1].price, 2.25);
        assert!(receipt.line_items[0].is_revenue);
        assert!(!receipt.line_items[0].printed);
    }

    #[test]
    fn test_finalize_blank_price_persists_as_zero() {
        let mut draft = sample_draft();
        let idx = draft.add_line_item();
        draft.set_item_name(idx, "Mystery").unwrap();

        let receipt = finalize(&draft, "u1", T);
        assert_eq!(receipt.line_items[idx].price, 0.0);
        assert_eq!(receipt.total, 5.75);
    }
}
