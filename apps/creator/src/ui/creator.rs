//! # Creator Surface
//!
//! The receipt-building screen: edit the draft, watch the derived total,
//! submit. One action per loop iteration; after every action the surface
//! checks whether a redirect or sign-out has moved it off-screen.

use std::fmt;

use inquire::{Select, Text};
use tokio::sync::watch;
use tracing::warn;

use receipt_cloud::DocumentStore;
use receipt_core::{Currency, DraftReceipt};

use crate::error::AppError;
use crate::state::{ReceiptForm, Session, SessionManager, Surface};

const ACTION_MERCHANT: &str = "Set merchant name";
const ACTION_CURRENCY: &str = "Set currency";
const ACTION_EDIT_ITEM: &str = "Edit line item";
const ACTION_ADD_ITEM: &str = "Add line item";
const ACTION_SHOW: &str = "Show draft";
const ACTION_SUBMIT: &str = "Submit receipt";
const ACTION_SIGN_OUT: &str = "Sign out";

/// Runs the creator surface until the operator signs out or a redirect
/// moves the app elsewhere.
pub async fn run(
    manager: &SessionManager,
    form: &ReceiptForm,
    store: &dyn DocumentStore,
    collection: &str,
    session_rx: &mut watch::Receiver<Session>,
    surface_rx: &mut watch::Receiver<Surface>,
) -> Result<(), AppError> {
    println!();
    println!("=== Create receipt ===");

    loop {
        if *surface_rx.borrow_and_update() != Surface::Creator {
            return Ok(());
        }
        let session = session_rx.borrow_and_update().clone();
        if !session.is_authenticated() {
            return Ok(());
        }

        let action = Select::new(
            "Action",
            vec![
                ACTION_MERCHANT,
                ACTION_CURRENCY,
                ACTION_EDIT_ITEM,
                ACTION_ADD_ITEM,
                ACTION_SHOW,
                ACTION_SUBMIT,
                ACTION_SIGN_OUT,
            ],
        )
        .prompt()?;

        match action {
            ACTION_MERCHANT => {
                let name = Text::new("Merchant name:").prompt()?;
                form.set_merchant_name(name.trim());
            }
            ACTION_CURRENCY => {
                let currency = Select::new("Currency", Currency::ALL.to_vec()).prompt()?;
                form.set_currency(currency);
            }
            ACTION_EDIT_ITEM => edit_item(form)?,
            ACTION_ADD_ITEM => {
                form.add_line_item();
                println!("Line item added.");
            }
            ACTION_SHOW => render_draft(&form.snapshot()),
            ACTION_SUBMIT => submit(form, store, collection, &session).await,
            ACTION_SIGN_OUT => {
                manager.logout().await?;
                // The notification flips the session; the next loop
                // iteration observes it and leaves the surface.
                let _ = session_rx.changed().await;
            }
            _ => {}
        }
    }
}

/// Name/price edit for one selected line item.
fn edit_item(form: &ReceiptForm) -> Result<(), AppError> {
    let draft = form.snapshot();
    let choices: Vec<ItemChoice> = draft
        .line_items
        .iter()
        .enumerate()
        .map(|(index, item)| ItemChoice {
            index,
            label: if item.name.is_empty() {
                format!("Item {} (unnamed)", index + 1)
            } else {
                format!("Item {}: {}", index + 1, item.name)
            },
        })
        .collect();

    let choice = Select::new("Line item", choices).prompt()?;

    let name = Text::new("Item name:").prompt()?;
    if !name.trim().is_empty() {
        if let Err(err) = form.set_item_name(choice.index, name.trim()) {
            warn!(%err, "item name edit rejected");
        }
    }

    let raw = Text::new("Price (blank to clear):").prompt()?;
    if let Err(err) = form.set_item_price(choice.index, parse_price(&raw)) {
        warn!(%err, "item price edit rejected");
    }

    println!("Total: {:.2}", form.snapshot().total);
    Ok(())
}

async fn submit(form: &ReceiptForm, store: &dyn DocumentStore, collection: &str, session: &Session) {
    match form.submit(store, collection, session).await {
        Ok(outcome) => {
            println!(
                "Receipt created with ID: {} (total {:.2})",
                outcome.document_id, outcome.total
            );
        }
        Err(AppError::Validation { errors }) => {
            println!("The receipt has problems:");
            for (path, message) in &errors {
                println!("  {path}: {message}");
            }
        }
        Err(err @ (AppError::NotSignedIn | AppError::SubmissionInFlight)) => {
            println!("{err}");
        }
        Err(err) => {
            warn!(%err, "receipt creation failed");
            println!("Error creating receipt. Please try again.");
        }
    }
}

fn render_draft(draft: &DraftReceipt) {
    println!();
    println!("Merchant: {}", draft.merchant_name);
    println!("Currency: {}", draft.currency);
    for (index, item) in draft.line_items.iter().enumerate() {
        let price = match item.price {
            Some(p) => format!("{p:.2}"),
            None => "-".to_string(),
        };
        println!("  {}. {} {}", index + 1, item.name, price);
    }
    println!("Total: {:.2}", draft.total);
}

struct ItemChoice {
    index: usize,
    label: String,
}

impl fmt::Display for ItemChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Parses the price field. Blank clears the price; anything unparseable or
/// non-finite also clears it (and warns), matching a cleared input box.
fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!(input = trimmed, "unparseable price treated as blank");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_accepts_decimals() {
        assert_eq!(parse_price("3.5"), Some(3.5));
        assert_eq!(parse_price(" 2.25 "), Some(2.25));
        assert_eq!(parse_price("0"), Some(0.0));
        assert_eq!(parse_price("-1"), Some(-1.0));
    }

    #[test]
    fn test_parse_price_blank_and_garbage_clear() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("   "), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }
}
