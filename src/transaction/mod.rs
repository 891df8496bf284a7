//! Transactions: money spent or earned in an account.
//!
//! A new transaction can be counted against a budget line and can move the
//! saved amount of a goal in the same account.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod page;
mod query;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use core::{
    Transaction, TransactionData, TransactionKind, TransactionLinks, create_transaction,
    create_transaction_table,
};
pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use delete::delete_transaction_endpoint;
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use page::get_transactions_page;
pub use query::{TransactionFilters, TransactionRow, get_transactions, transaction_totals};

/// The state needed for the transaction pages and endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[cfg(test)]
impl TransactionState {
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }
}
