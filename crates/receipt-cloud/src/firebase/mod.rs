//! # Firebase Backend
//!
//! REST implementations of the collaborator traits against the hosted
//! provider: identity toolkit for email/password sign-in, the document
//! database for receipt creation.
//!
//! Both clients are deliberately thin. No retries, no backoff, no local
//! timeouts; whatever defaults the HTTP client and provider use apply.

mod auth;
mod firestore;

pub use auth::FirebaseAuth;
pub use firestore::Firestore;
