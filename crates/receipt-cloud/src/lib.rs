//! # receipt-cloud: Backend Collaborator Layer
//!
//! This crate provides access to the hosted auth and document-store
//! collaborators for Receipt Desk.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Receipt Desk Data Flow                              │
//! │                                                                         │
//! │  Creator app (login, submit)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  receipt-cloud (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │    traits     │    │   firebase    │    │   memory     │   │   │
//! │  │   │ AuthGateway   │    │ FirebaseAuth  │    │ MemoryAuth   │   │   │
//! │  │   │ DocumentStore │◄───│ Firestore     │    │ MemoryStore  │   │   │
//! │  │   │ TokenSource   │    │ (REST)        │    │ (tests/demo) │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Hosted provider (identity toolkit + document database)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`traits`] - Collaborator seams (`AuthGateway`, `DocumentStore`)
//! - [`config`] - Environment-based backend configuration
//! - [`firebase`] - REST implementations against the hosted provider
//! - [`memory`] - In-memory backend for tests and offline demos
//! - [`error`] - Auth/storage/config error types
//!
//! ## Contract Notes
//!
//! - Auth state flows through a `tokio::sync::watch` channel: the call
//!   return of `sign_in` is advisory, the notification is the source of
//!   truth.
//! - `create_document` is a single atomic create. Nothing here retries,
//!   queues, or cancels; a failed call surfaces a typed error and the
//!   caller decides what to do.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod firebase;
pub mod memory;
pub mod traits;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{collection_from_env, BackendKind, CloudConfig, ConfigError};
pub use error::{AuthError, StorageError};
pub use firebase::{FirebaseAuth, Firestore};
pub use memory::{MemoryAuth, MemoryStore};
pub use traits::{AuthGateway, AuthState, CreatedDocument, DocumentStore, Identity, TokenSource};
