//! Terminal receipt creator for Receipt Desk.
//!
//! Signs an operator in against the configured backend, walks them through
//! building a receipt draft, and writes the finalized record to the
//! receipts collection.

mod app;
mod error;
mod state;
mod ui;

use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,receipt_creator=debug,receipt_cloud=debug,receipt_core=debug")
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = app::run().await {
        tracing::error!(%err, "creator exited with error");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
