//! # Validation Module
//!
//! Per-field rule checks for a draft receipt.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Strategy                                │
//! │                                                                         │
//! │  validate_draft(draft)                                                  │
//! │       │                                                                 │
//! │       ├── merchantName empty? ──────► "Merchant name is required"       │
//! │       │                                                                 │
//! │       ├── lineItems.{i}.name empty? ► "Item name is required"           │
//! │       │                                                                 │
//! │       ├── lineItems.{i}.price None? ► "Price is required"               │
//! │       │                                                                 │
//! │       └── lineItems.{i}.price < 0? ─► "Price must be zero or greater"   │
//! │                                                                         │
//! │  Every rule runs; nothing short-circuits. The result is a map from      │
//! │  field path to message, surfaced inline next to each field.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The currency rule ("must be one of the fixed set, non-empty") holds by
//! construction: [`crate::types::Currency`] is a closed enum.

use std::collections::BTreeMap;

use crate::types::DraftReceipt;

/// Field path -> human-readable message, ordered for stable display.
///
/// Paths use the wire-format spelling (`merchantName`, `lineItems.0.price`)
/// so a message can be matched to the field it belongs to.
pub type FieldErrors = BTreeMap<String, String>;

/// Checks every field rule and collects all violations.
///
/// An empty map means the draft may be submitted. Blocking is the only
/// consequence of a violation: validation never mutates the draft and the
/// derived total is computed independently of it.
///
/// ## Example
/// ```rust
/// use receipt_core::{validate_draft, DraftReceipt};
///
/// let draft = DraftReceipt::new("u1");
/// let errors = validate_draft(&draft);
/// assert!(errors.contains_key("merchantName"));
/// assert!(errors.contains_key("lineItems.0.price"));
/// ```
pub fn validate_draft(draft: &DraftReceipt) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.merchant_name.trim().is_empty() {
        errors.insert(
            "merchantName".to_string(),
            "Merchant name is required".to_string(),
        );
    }

    for (index, item) in draft.line_items.iter().enumerate() {
        if item.name.trim().is_empty() {
            errors.insert(
                format!("lineItems.{index}.name"),
                "Item name is required".to_string(),
            );
        }

        match item.price {
            None => {
                errors.insert(
                    format!("lineItems.{index}.price"),
                    "Price is required".to_string(),
                );
            }
            // NaN fails the comparison and is rejected alongside negatives.
            Some(price) if !(price >= 0.0) => {
                errors.insert(
                    format!("lineItems.{index}.price"),
                    "Price must be zero or greater".to_string(),
                );
            }
            Some(_) => {}
        }
    }

    errors
}

// =============================================================================
// Unit Tests
// =============================================================================
