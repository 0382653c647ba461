//! # Domain Types
//!
//! Draft and finalized receipt types for Receipt Desk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────┐                    │
//! │  │  DraftReceipt   │        │  FinalizedReceipt    │                    │
//! │  │  ─────────────  │finalize│  ──────────────────  │                    │
//! │  │  owner_id       │───────►│  user_id             │                    │
//! │  │  order_id       │        │  created_at          │                    │
//! │  │  merchant_name  │        │  last_modified       │                    │
//! │  │  total (derived)│        │  payment_status      │                    │
//! │  │  line_items[]   │        │  success             │                    │
//! │  └─────────────────┘        └──────────────────────┘                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────┐                    │
//! │  │  LineItemDraft  │        │  FinalizedLineItem   │                    │
//! │  │  ─────────────  │        │  ──────────────────  │                    │
//! │  │  name           │        │  id = ITEM{i}{now}   │                    │
//! │  │  price: Option  │        │  item.id = PROD{...} │                    │
//! │  │  fixed booleans │        │  order_ref.id        │                    │
//! │  └─────────────────┘        └──────────────────────┘                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The finalized shapes serialize with camelCase keys (`userId`, `orderRef`,
//! `paymentStatus`, ...) so the documents written by this tool match the
//! receipts collection's existing documents byte-for-byte in shape.

use serde::{Deserialize, Serialize};

use crate::error::{DraftError, DraftResult};
use crate::ids::placeholder_id;

// =============================================================================
// Currency
// =============================================================================

/// The fixed set of currencies the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    /// Every selectable currency, in the order the form presents them.
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];

    /// The upper-case ISO code used on the wire.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Line Item (draft)
// =============================================================================

/// A line item while the receipt is being edited.
///
/// ## Design Notes
/// - `price` is `Option<f64>`: the form's price field may be left blank, and
///   a blank price contributes 0 to the derived total while still failing
///   validation. Prices stay floating point to match the persisted format.
/// - The five booleans are fixed defaults. They are not editable in the
///   form but are persisted on every finalized line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
    /// Display name (required, non-empty).
    pub name: String,

    /// Price entered by the operator; `None` until filled in.
    pub price: Option<f64>,

    /// Whether the item was printed. Fixed default: false.
    pub printed: bool,

    /// Whether the item was exchanged. Fixed default: false.
    pub exchanged: bool,

    /// Whether the item was refunded. Fixed default: false.
    pub refunded: bool,

    /// Whether the line counts as revenue. Fixed default: true.
    pub is_revenue: bool,

    /// Whether the line is an order-level fee. Fixed default: false.
    pub is_order_fee: bool,
}

impl Default for LineItemDraft {
    fn default() -> Self {
        LineItemDraft {
            name: String::new(),
            price: None,
            printed: false,
            exchanged: false,
            refunded: false,
            is_revenue: true,
            is_order_fee: false,
        }
    }
}

impl LineItemDraft {
    /// The price this item contributes to the total.
    ///
    /// Absent or non-finite prices count as zero, never as an error: the
    /// total must stay derivable at every keystroke of the edit session.
    pub fn price_or_zero(&self) -> f64 {
        self.price.filter(|p| p.is_finite()).unwrap_or(0.0)
    }
}

/// Sums line-item prices, treating absent/non-finite prices as 0.
///
/// This is the single definition of the derived total. It runs reactively
/// after every price edit and again, authoritatively, at submission.
pub fn compute_total(items: &[LineItemDraft]) -> f64 {
    items.iter().map(LineItemDraft::price_or_zero).sum()
}

// =============================================================================
// Draft Receipt
// =============================================================================

/// The in-progress receipt being edited.
///
/// ## Invariants
/// - Exactly one draft exists per active form; it has a single writer.
/// - `total` equals the sum of line-item prices after every price edit
///   (and is recomputed once more at finalization, so a missed re-derivation
///   can never reach storage).
/// - `line_items` is append-only during editing; there is no removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReceipt {
    /// Identity of the signed-in operator; re-stamped at submission.
    pub owner_id: String,

    /// Client-minted placeholder order identifier.
    pub order_id: String,

    /// Client-minted placeholder merchant identifier.
    pub merchant_id: String,

    /// Merchant display name (required, non-empty).
    pub merchant_name: String,

    /// Selected currency.
    pub currency: Currency,

    /// Derived sum of line-item prices. Not independently editable.
    pub total: f64,

    /// Ordered line items. Append-only during editing.
    pub line_items: Vec<LineItemDraft>,
}

impl DraftReceipt {
    /// Creates a fresh draft: one empty line item, default currency, zero
    /// total, and two freshly minted placeholder identifiers.
    pub fn new(owner_id: impl Into<String>) -> Self {
        DraftReceipt {
            owner_id: owner_id.into(),
            order_id: placeholder_id(),
            merchant_id: placeholder_id(),
            merchant_name: String::new(),
            currency: Currency::default(),
            total: 0.0,
            line_items: vec![LineItemDraft::default()],
        }
    }

    /// Appends one empty line item and returns its index.
    ///
    /// No upper bound is enforced; removal does not exist in this version.
    pub fn add_line_item(&mut self) -> usize {
        self.line_items.push(LineItemDraft::default());
        self.line_items.len() - 1
    }

    /// Sets the merchant name.
    pub fn set_merchant_name(&mut self, name: impl Into<String>) {
        self.merchant_name = name.into();
    }

    /// Sets the currency.
    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
    }

    /// Sets the name of the line item at `index`.
    pub fn set_item_name(&mut self, index: usize, name: impl Into<String>) -> DraftResult<()> {
        let item = self.line_item_mut(index)?;
        item.name = name.into();
        Ok(())
    }

    /// Sets the price of the line item at `index` and re-derives the total.
    ///
    /// `None` models a cleared/blank price field.
    pub fn set_item_price(&mut self, index: usize, price: Option<f64>) -> DraftResult<()> {
        let item = self.line_item_mut(index)?;
        item.price = price;
        self.recompute_total();
        Ok(())
    }

    /// Re-derives `total` from the current line items.
    pub fn recompute_total(&mut self) {
        self.total = compute_total(&self.line_items);
    }

    fn line_item_mut(&mut self, index: usize) -> DraftResult<&mut LineItemDraft> {
        let len = self.line_items.len();
        self.line_items
            .get_mut(index)
            .ok_or(DraftError::NoSuchLineItem { index, len })
    }
}

// =============================================================================
// Finalized Receipt
// =============================================================================

/// Reference back to the receipt's order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub id: String,
}

/// Synthetic product reference for a finalized line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub id: String,
}

/// A line item as persisted.
///
/// Generated fields (`id`, `item`, `order_ref`, both timestamps) are
/// stamped at finalization; everything else is frozen from the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedLineItem {
    /// `ITEM{1-based index}{submission timestamp}` - unique within the receipt.
    pub id: String,

    /// Reference back to the receipt's order id.
    pub order_ref: OrderRef,

    /// Synthetic product reference (`PROD{index}{timestamp}`).
    pub item: ItemRef,

    pub name: String,
    pub price: f64,
    pub printed: bool,

    /// Submission timestamp in epoch milliseconds.
    pub created_time: i64,

    /// Echo of the order creation time; identical to `created_time`.
    pub order_client_created_time: i64,

    pub exchanged: bool,
    pub refunded: bool,
    pub is_revenue: bool,
    pub is_order_fee: bool,
}

/// The fully stamped record handed to the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedReceipt {
    /// Identity of the operator that submitted the receipt.
    pub user_id: String,

    pub order_id: String,
    pub merchant_id: String,
    pub merchant_name: String,
    pub currency: Currency,

    /// Authoritative total, recomputed from the line items at finalization.
    pub total: f64,

    pub line_items: Vec<FinalizedLineItem>,

    /// Submission timestamp in epoch milliseconds.
    pub created_at: i64,

    /// Identical to `created_at` on a freshly created record.
    pub last_modified: i64,

    /// Always the locked constant; see [`crate::PAYMENT_STATUS_LOCKED`].
    pub payment_status: String,

    /// Always true on records produced by this tool.
    pub success: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ID_ALPHABET;

    #[test]
    fn test_currency_default_and_codes() {
        assert_eq!(Currency::default(), Currency::Usd);
        assert_eq!(Currency::Eur.code(), "EUR");
        assert_eq!(Currency::Gbp.to_string(), "GBP");
    }

    #[test]
    fn test_currency_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
    }

    #[test]
    fn test_line_item_defaults() {
        let item = LineItemDraft::default();
        assert!(item.name.is_empty());
        assert_eq!(item.price, None);
        assert!(!item.printed);
        assert!(!item.exchanged);
        assert!(!item.refunded);
        assert!(item.is_revenue);
        assert!(!item.is_order_fee);
    }

    #[test]
    fn test_new_draft_shape() {
        let draft = DraftReceipt::new("u1");
        assert_eq!(draft.owner_id, "u1");
        assert_eq!(draft.line_items.len(), 1);
        assert_eq!(draft.total, 0.0);
        assert_eq!(draft.currency, Currency::Usd);
        assert_eq!(draft.order_id.len(), 20);
        assert_eq!(draft.merchant_id.len(), 20);
        assert!(draft.order_id.chars().all(|c| ID_ALPHABET.contains(c)));
        assert_ne!(draft.order_id, draft.merchant_id);
    }

    #[test]
    fn test_compute_total_example() {
        // Draft with [Coffee 3.5, Muffin 2.25] totals 5.75.
        let mut draft = DraftReceipt::new("u1");
        draft.set_item_name(0, "Coffee").unwrap();
        draft.set_item_price(0, Some(3.5)).unwrap();
        let idx = draft.add_line_item();
        draft.set_item_name(idx, "Muffin").unwrap();
        draft.set_item_price(idx, Some(2.25)).unwrap();

        assert_eq!(draft.total, 5.75);
    }

    #[test]
    fn test_blank_price_contributes_zero() {
        let mut draft = DraftReceipt::new("u1");
        draft.set_item_price(0, Some(3.5)).unwrap();
        let idx = draft.add_line_item();
        assert_eq!(draft.line_items[idx].price, None);

        draft.recompute_total();
        assert_eq!(draft.total, 3.5);
    }

    #[test]
    fn test_non_finite_price_contributes_zero() {
        let mut draft = DraftReceipt::new("u1");
        draft.set_item_price(0, Some(f64::NAN)).unwrap();
        assert_eq!(draft.total, 0.0);
    }

    #[test]
    fn test_price_edit_rederives_total() {
        let mut draft = DraftReceipt::new("u1");
        draft.set_item_price(0, Some(10.0)).unwrap();
        assert_eq!(draft.total, 10.0);

        draft.set_item_price(0, Some(4.0)).unwrap();
        assert_eq!(draft.total, 4.0);

        draft.set_item_price(0, None).unwrap();
        assert_eq!(draft.total, 0.0);
    }

    #[test]
    fn test_add_line_item_appends() {
        let mut draft = DraftReceipt::new("u1");
        let idx = draft.add_line_item();
        assert_eq!(idx, 1);
        assert_eq!(draft.line_items.len(), 2);
        assert_eq!(draft.line_items[1], LineItemDraft::default());
    }

    #[test]
    fn test_item_edit_out_of_range() {
        let mut draft = DraftReceipt::new("u1");
        let err = draft.set_item_name(5, "nope").unwrap_err();
        assert_eq!(err, DraftError::NoSuchLineItem { index: 5, len: 1 });
    }

    #[test]
    fn test_finalized_receipt_wire_keys() {
        let receipt = FinalizedReceipt {
            user_id: "u1".into(),
            order_id: "o".into(),
            merchant_id: "m".into(),
            merchant_name: "Cafe".into(),
            currency: Currency::Usd,
            total: 1.0,
            line_items: vec![FinalizedLineItem {
                id: "ITEM11".into(),
                order_ref: OrderRef { id: "o".into() },
                item: ItemRef { id: "PROD11".into() },
                name: "Coffee".into(),
                price: 1.0,
                printed: false,
                created_time: 1,
                order_client_created_time: 1,
                exchanged: false,
                refunded: false,
                is_revenue: true,
                is_order_fee: false,
            }],
            created_at: 1,
            last_modified: 1,
            payment_status: "locked".into(),
            success: true,
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("merchantName").is_some());
        assert!(json.get("paymentStatus").is_some());
        assert!(json.get("lastModified").is_some());
        let item = &json["lineItems"][0];
        assert!(item.get("orderRef").is_some());
        assert!(item.get("orderClientCreatedTime").is_some());
        assert!(item.get("isOrderFee").is_some());
        assert_eq!(json["currency"], "USD");
    }
}
