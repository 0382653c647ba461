//! # receipt-core: Pure Business Logic for Receipt Desk
//!
//! This crate is the **heart** of Receipt Desk. It contains the entire
//! receipt-construction workflow as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Receipt Desk Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/creator (terminal)                      │   │
//! │  │    Login surface ──► Creator surface ──► Submit                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ receipt-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │    ids    │  │ validation│  │ finalize  │   │   │
//! │  │   │  Draft    │  │ 62-char   │  │  per-field│  │ stamped   │   │   │
//! │  │   │  Receipt  │  │ alphabet  │  │  messages │  │ record    │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              receipt-cloud (collaborator layer)                 │   │
//! │  │        Auth REST calls, document-store create calls             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Draft and finalized receipt types
//! - [`ids`] - Placeholder and per-line-item identifier generation
//! - [`validation`] - Per-field rule checks (collects all violations)
//! - [`finalize`] - Draft -> finalized record transformation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: finalization of the same draft at the same
//!    timestamp produces the same record (placeholder IDs aside)
//! 2. **No I/O**: network, file system, and terminal access are FORBIDDEN here
//! 3. **Derived Total**: `total` is never authoritative input; it is always
//!    recomputed from the line items at finalization time
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod finalize;
pub mod ids;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{DraftError, DraftResult};
pub use finalize::finalize;
pub use types::{
    compute_total, Currency, DraftReceipt, FinalizedLineItem, FinalizedReceipt, ItemRef,
    LineItemDraft, OrderRef,
};
pub use validation::{validate_draft, FieldErrors};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Alphabet used for placeholder identifiers.
///
/// ## Why These 62 Characters?
/// They mirror the shape of the document store's auto-generated IDs, so a
/// client-minted `orderId` is indistinguishable from a server-assigned one.
pub const ID_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a placeholder identifier.
pub const PLACEHOLDER_ID_LEN: usize = 20;

/// Prefix for generated line-item identifiers (`ITEM{index}{timestamp}`).
pub const LINE_ITEM_ID_PREFIX: &str = "ITEM";

/// Prefix for generated product-reference identifiers (`PROD{index}{timestamp}`).
pub const PRODUCT_REF_PREFIX: &str = "PROD";

/// Payment status stamped on every finalized receipt.
///
/// The creator tool only produces settled demo receipts, so the status is a
/// locked constant rather than a user-editable field.
pub const PAYMENT_STATUS_LOCKED: &str = "locked";

/// Collection name the finalized receipts are written to.
pub const RECEIPTS_COLLECTION: &str = "receipts";
