//! # Session State
//!
//! The session state machine and its redirect side effect.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Machine                                │
//! │                                                                         │
//! │                 ┌──────────────┐                                        │
//! │                 │ Initializing │  (no surface renders yet)              │
//! │                 └──────┬───────┘                                        │
//! │          first         │                                                │
//! │          notification  ▼                                                │
//! │   ┌───────────────────────────────────────┐                             │
//! │   │                                       │                             │
//! │   ▼                                       ▼                             │
//! │  Unauthenticated ◄──── sign-out ──── Authenticated(identity)            │
//! │   │                                       ▲                             │
//! │   └────────────── sign-in ────────────────┘                             │
//! │                                                                         │
//! │  Transitions are driven EXCLUSIVELY by auth-collaborator                │
//! │  notifications; login()/logout() return values never flip the state.    │
//! │                                                                         │
//! │  Redirect side effect:                                                  │
//! │  • Unauthenticated + not on login surface ──► navigate to login         │
//! │  • Authenticated + on login surface ────────► navigate to creator       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use receipt_cloud::{AuthError, AuthGateway, AuthState, Identity};

// =============================================================================
// Session
// =============================================================================

/// The current signed-in identity, or the lack of one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No notification from the auth collaborator yet. Dependent surfaces
    /// must not render (prevents a flash of unauthenticated content).
    #[default]
    Initializing,
    /// A session exists.
    Authenticated(Identity),
    /// No session exists.
    Unauthenticated,
}

impl Session {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// The UI surfaces the app can sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Login,
    Creator,
}

/// Presentation seam for the redirect side effect.
///
/// The session listener calls this; the surface loop decides what
/// "navigating" means (here: which prompt screen runs next).
pub trait Navigator: Send + Sync {
    fn current(&self) -> Surface;
    fn navigate(&self, to: Surface);
}

// =============================================================================
// Session Manager
// =============================================================================

/// Tracks the signed-in identity and drives the redirect side effect.
///
/// State replacements arrive from the auth collaborator's watch channel and
/// are re-broadcast on this manager's own channel, so dependents observe
/// `Session` values without knowing the collaborator's wire states.
pub struct SessionManager {
    auth: Arc<dyn AuthGateway>,
    state_tx: watch::Sender<Session>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthGateway>) -> Self {
        let (state_tx, _) = watch::channel(Session::Initializing);
        SessionManager { auth, state_tx }
    }

    /// Subscribes to session replacements.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state_tx.subscribe()
    }

    /// The session as of the latest notification.
    pub fn current(&self) -> Session {
        self.state_tx.borrow().clone()
    }

    /// Attempts the credential exchange.
    ///
    /// A success return is advisory: the machine flips to `Authenticated`
    /// only when the collaborator's notification arrives. Failures propagate
    /// unchanged; there is no retry, the operator resubmits.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.auth.sign_in(email, password).await
    }

    /// Requests session termination, with the same propagation contract.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await
    }

    /// Spawns the listener that turns auth notifications into session
    /// replacements and redirects.
    ///
    /// The task ends when the auth collaborator drops its channel; aborting
    /// the handle is the teardown path on shutdown.
    pub fn spawn_listener(&self, navigator: Arc<dyn Navigator>) -> JoinHandle<()> {
        let mut auth_rx = self.auth.watch();
        let state_tx = self.state_tx.clone();

        tokio::spawn(async move {
            loop {
                let auth_state = auth_rx.borrow_and_update().clone();
                apply(&state_tx, navigator.as_ref(), auth_state);

                if auth_rx.changed().await.is_err() {
                    debug!("auth gateway gone; session listener stopping");
                    break;
                }
            }
        })
    }
}

/// Applies one auth notification: replace the session, then redirect.
fn apply(state_tx: &watch::Sender<Session>, navigator: &dyn Navigator, auth_state: AuthState) {
    let session = match auth_state {
        AuthState::Unknown => Session::Initializing,
        AuthState::SignedIn(identity) => Session::Authenticated(identity),
        AuthState::SignedOut => Session::Unauthenticated,
    };

    debug!(?session, "session replaced");
    state_tx.send_replace(session.clone());
    redirect(navigator, &session);
}

/// The presentation side effect: keep the surface consistent with the
/// session. Not a data contract, but reproduced for UX parity.
fn redirect(navigator: &dyn Navigator, session: &Session) {
    match session {
        Session::Unauthenticated if navigator.current() != Surface::Login => {
            info!("redirecting to login surface");
            navigator.navigate(Surface::Login);
        }
        Session::Authenticated(_) if navigator.current() == Surface::Login => {
            info!("redirecting to creator surface");
            navigator.navigate(Surface::Creator);
        }
        // Initializing never redirects: nothing renders yet.
        _ => {}
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
