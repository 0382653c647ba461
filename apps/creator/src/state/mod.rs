//! # State Module
//!
//! Application state for the creator app.
//!
//! ## Why Two State Types?
//! The session and the form have different owners and lifecycles:
//!
//! 1. **SessionManager**: driven by auth-collaborator notifications via a
//!    background listener; lives for the whole run.
//! 2. **ReceiptForm**: the single-owner draft plus the in-flight submission
//!    guard; recreated fresh for each authenticated visit to the creator
//!    surface.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  auth watch ──► SessionManager ──► session watch ──► surface loop       │
//! │                      │                                                  │
//! │                      └── Navigator (redirect side effect)               │
//! │                                                                         │
//! │  prompts ──► ReceiptForm ──► validate / finalize ──► DocumentStore      │
//! │                  │                                                      │
//! │                  └── in-flight flag (sole concurrency guard)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod form;
mod session;

pub use form::{ReceiptForm, SubmitOutcome};
pub use session::{Navigator, Session, SessionManager, Surface};
