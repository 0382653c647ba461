//! # App Wiring
//!
//! Builds the backend collaborators from the environment, spawns the
//! session listener, and runs the surface loop.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Surface Loop                                         │
//! │                                                                         │
//! │  resume() ──► Initializing (nothing renders)                            │
//! │                    │ first notification                                 │
//! │                    ▼                                                    │
//! │          ┌── Login surface ◄────────── signed out / redirect ──┐        │
//! │          │                                                     │        │
//! │          └── signed in ──► Creator surface (fresh form) ───────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use receipt_cloud::{
    collection_from_env, AuthGateway, BackendKind, CloudConfig, DocumentStore, FirebaseAuth,
    Firestore, MemoryAuth, MemoryStore, TokenSource,
};

use crate::error::AppError;
use crate::state::{Navigator, ReceiptForm, SessionManager, Surface};
use crate::ui;

// =============================================================================
// Surface Router
// =============================================================================

/// Navigator backed by a watch channel the surface loop observes.
struct SurfaceRouter {
    tx: watch::Sender<Surface>,
}

impl SurfaceRouter {
    fn new() -> Self {
        let (tx, _) = watch::channel(Surface::Login);
        SurfaceRouter { tx }
    }

    fn subscribe(&self) -> watch::Receiver<Surface> {
        self.tx.subscribe()
    }
}

impl Navigator for SurfaceRouter {
    fn current(&self) -> Surface {
        *self.tx.borrow()
    }

    fn navigate(&self, to: Surface) {
        if *self.tx.borrow() != to {
            debug!(?to, "surface change");
            self.tx.send_replace(to);
        }
    }
}

// =============================================================================
// Backend Selection
// =============================================================================

struct Backend {
    auth: Arc<dyn AuthGateway>,
    store: Arc<dyn DocumentStore>,
    collection: String,
}

fn build_backend() -> Result<Backend, AppError> {
    match BackendKind::from_env()? {
        BackendKind::Firebase => {
            let config = CloudConfig::load()?;
            info!(project_id = %config.project_id, collection = %config.collection, "using hosted backend");

            let auth = Arc::new(FirebaseAuth::new(&config));
            let tokens: Arc<dyn TokenSource> = auth.clone();
            let store = Arc::new(Firestore::new(&config, tokens));
            Ok(Backend {
                collection: config.collection,
                auth,
                store,
            })
        }
        BackendKind::Memory => {
            let email = std::env::var("RECEIPTS_DEMO_EMAIL")
                .unwrap_or_else(|_| "demo@example.com".to_string());
            let password = std::env::var("RECEIPTS_DEMO_PASSWORD")
                .unwrap_or_else(|_| "demo-pass".to_string());

            info!("using in-memory backend");
            println!("Offline demo mode. Sign in as {email} / {password}");

            let auth = Arc::new(MemoryAuth::new().with_account(&email, &password));
            Ok(Backend {
                auth,
                store: Arc::new(MemoryStore::new()),
                collection: collection_from_env(),
            })
        }
    }
}

// =============================================================================
// Run Loop
// =============================================================================

pub async fn run() -> Result<(), AppError> {
    let backend = build_backend()?;

    let manager = SessionManager::new(backend.auth.clone());
    let router = Arc::new(SurfaceRouter::new());
    let mut surface_rx = router.subscribe();
    let mut session_rx = manager.subscribe();

    let listener = manager.spawn_listener(router.clone());

    // Announce the persisted-session check; until the collaborator answers,
    // the session stays Initializing and nothing renders.
    backend.auth.resume().await?;

    loop {
        while matches!(*session_rx.borrow_and_update(), crate::state::Session::Initializing) {
            if session_rx.changed().await.is_err() {
                listener.abort();
                return Ok(());
            }
        }

        let surface = *surface_rx.borrow_and_update();
        match surface {
            Surface::Login => {
                ui::login::run(&manager, &mut session_rx).await?;
            }
            Surface::Creator => {
                let session = session_rx.borrow().clone();
                let Some(identity) = session.identity().cloned() else {
                    // Redirect already queued; loop around to the login surface.
                    continue;
                };

                if let Some(email) = identity.email.as_deref() {
                    println!("Signed in as {email}");
                }

                // A fresh draft per visit: one empty line item, zero total.
                let form = ReceiptForm::new(&identity.uid);
                ui::creator::run(
                    &manager,
                    &form,
                    backend.store.as_ref(),
                    &backend.collection,
                    &mut session_rx,
                    &mut surface_rx,
                )
                .await?;
            }
        }
    }
}
