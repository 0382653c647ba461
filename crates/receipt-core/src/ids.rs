//! # Identifier Generation
//!
//! Placeholder and per-line-item identifier generation.
//!
//! ## Two Identifier Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Identifier Generation                               │
//! │                                                                         │
//! │  Placeholder IDs (orderId, merchantId)                                  │
//! │  ├── 20 chars sampled uniformly from A-Z a-z 0-9                        │
//! │  ├── minted client-side at draft creation                               │
//! │  └── regenerated after every successful submission                      │
//! │                                                                         │
//! │  Per-line-item IDs (id, item.id)                                        │
//! │  ├── ITEM{1-based index}{submission timestamp}                          │
//! │  ├── PROD{1-based index}{submission timestamp}                          │
//! │  └── unique within a receipt: index varies, timestamp is shared         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Placeholder IDs are cosmetic: they mimic the document store's native ID
//! shape and carry no cryptographic or collision-prevention guarantee.
//! Collisions are not checked for at this scale.

use rand::Rng;

use crate::{ID_ALPHABET, LINE_ITEM_ID_PREFIX, PLACEHOLDER_ID_LEN, PRODUCT_REF_PREFIX};

/// Generates a placeholder identifier of the default length (20).
///
/// ## Example
/// ```rust
/// use receipt_core::ids::placeholder_id;
///
/// let id = placeholder_id();
/// assert_eq!(id.len(), 20);
/// ```
pub fn placeholder_id() -> String {
    placeholder_id_with_len(PLACEHOLDER_ID_LEN)
}

/// Generates a placeholder identifier of an arbitrary length.
///
/// Each character is sampled uniformly and independently from the fixed
/// 62-character alphabet.
pub fn placeholder_id_with_len(len: usize) -> String {
    let alphabet = ID_ALPHABET.as_bytes();
    let mut rng = rand::thread_rng();

    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Generates the identifier for a finalized line item.
///
/// `index` is zero-based (the draft's ordering); the generated ID carries
/// the 1-based position, e.g. `ITEM1{now_ms}` for the first item.
pub fn line_item_id(index: usize, now_ms: i64) -> String {
    format!("{}{}{}", LINE_ITEM_ID_PREFIX, index + 1, now_ms)
}

/// Generates the synthetic product-reference identifier for a finalized
/// line item, using the same index + timestamp scheme as [`line_item_id`].
pub fn product_ref_id(index: usize, now_ms: i64) -> String {
    format!("{}{}{}", PRODUCT_REF_PREFIX, index + 1, now_ms)
}

// =============================================================================
// Unit Tests
// =============================================================================
