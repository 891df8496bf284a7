//! Database query helpers for the transactions page.

use rusqlite::{Connection, ToSql, params_from_iter};
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::{Error, auth::UserID};

use super::core::{Transaction, TransactionKind, map_transaction_row};

/// The query parameters of the transactions page.
///
/// Every filter is optional. Empty form fields are treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFilters {
    #[serde(default)]
    pub date_from: Option<Date>,
    #[serde(default)]
    pub date_to: Option<Date>,
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionKind>,
    /// Matches transactions in any of these categories.
    #[serde(default, rename = "category_id")]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub amount_min: Option<f64>,
    #[serde(default)]
    pub amount_max: Option<f64>,
    /// Set after a new transaction moved a goal's saved amount.
    #[serde(default)]
    pub goal_updated: bool,
}

impl TransactionFilters {
    /// Whether any filter narrows the listing.
    pub fn is_active(&self) -> bool {
        self.date_from.is_some()
            || self.date_to.is_some()
            || self.kind.is_some()
            || !self.category_ids.is_empty()
            || self.amount_min.is_some()
            || self.amount_max.is_some()
    }
}

/// A transaction with the category details needed to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub transaction: Transaction,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub category_icon: Option<String>,
}

/// Sums over a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionTotals {
    pub income: f64,
    pub expenses: f64,
    /// `income - expenses`
    pub net: f64,
}

/// Get the transactions of `account_id` that match `filters`, newest first.
///
/// Date and amount bounds are inclusive.
pub fn get_transactions(
    user_id: UserID,
    account_id: Uuid,
    filters: &TransactionFilters,
    connection: &Connection,
) -> Result<Vec<TransactionRow>, Error> {
    let user_id = user_id.as_i64();
    let mut conditions = vec![
        "\"transaction\".user_id = ?".to_owned(),
        "\"transaction\".account_id = ?".to_owned(),
    ];
    let mut params: Vec<&dyn ToSql> = Vec::with_capacity(filters.category_ids.len() + 8);
    params.push(&user_id);
    params.push(&account_id);

    if let Some(date_from) = &filters.date_from {
        conditions.push("\"transaction\".date >= ?".to_owned());
        params.push(date_from);
    }
    if let Some(date_to) = &filters.date_to {
        conditions.push("\"transaction\".date <= ?".to_owned());
        params.push(date_to);
    }
    if let Some(kind) = &filters.kind {
        conditions.push("\"transaction\".kind = ?".to_owned());
        params.push(kind);
    }
    if !filters.category_ids.is_empty() {
        let placeholders = vec!["?"; filters.category_ids.len()].join(", ");
        conditions.push(format!("\"transaction\".category_id IN ({placeholders})"));
        for category_id in &filters.category_ids {
            params.push(category_id);
        }
    }
    if let Some(amount_min) = &filters.amount_min {
        conditions.push("\"transaction\".amount >= ?".to_owned());
        params.push(amount_min);
    }
    if let Some(amount_max) = &filters.amount_max {
        conditions.push("\"transaction\".amount <= ?".to_owned());
        params.push(amount_max);
    }

    // Sort by date, and then insertion order to keep the order stable after updates
    let query = format!(
        "SELECT \"transaction\".id, \"transaction\".user_id, \"transaction\".account_id, \
            \"transaction\".amount, \"transaction\".kind, \"transaction\".date, \
            \"transaction\".category_id, \"transaction\".description, \
            \"transaction\".budget_item_id, category.name, category.color, category.icon
        FROM \"transaction\"
        LEFT JOIN category ON \"transaction\".category_id = category.id
        WHERE {}
        ORDER BY \"transaction\".date DESC, \"transaction\".rowid DESC",
        conditions.join(" AND ")
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), |row| {
            Ok(TransactionRow {
                transaction: map_transaction_row(row)?,
                category_name: row.get(9)?,
                category_color: row.get(10)?,
                category_icon: row.get(11)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

pub fn transaction_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> TransactionTotals {
    let mut totals = TransactionTotals::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => totals.income += transaction.amount,
            TransactionKind::Expense => totals.expenses += transaction.amount,
        }
    }
    totals.net = totals.income - totals.expenses;

    totals
}
