//! # Login Surface
//!
//! Email/password prompt. Failures print a single generic alert and the
//! prompt re-renders; success waits for the session notification before
//! returning, because the notification is the source of truth, not the
//! call's return value.

use inquire::{Password, Text};
use tokio::sync::watch;
use tracing::debug;

use crate::error::AppError;
use crate::state::{Session, SessionManager};

/// Runs one round of the login prompt.
///
/// Returns once the session leaves `Unauthenticated` (sign-in confirmed by
/// notification) or after a failed attempt, letting the surface loop decide
/// what renders next.
pub async fn run(
    manager: &SessionManager,
    session_rx: &mut watch::Receiver<Session>,
) -> Result<(), AppError> {
    println!();
    println!("=== Sign in ===");

    let email = Text::new("Email:").prompt()?;
    let password = Password::new("Password:")
        .without_confirmation()
        .prompt()?;

    match manager.login(email.trim(), &password).await {
        Ok(()) => {
            debug!("credential exchange accepted; waiting for session notification");
            while !session_rx.borrow_and_update().is_authenticated() {
                if session_rx.changed().await.is_err() {
                    break;
                }
            }
            Ok(())
        }
        Err(err) => {
            // One generic alert, no retry loop here: the surface re-renders.
            println!("Sign-in failed: {err}. Please try again.");
            Ok(())
        }
    }
}
