//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row, ToSql, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::{
    Error,
    account::get_account,
    auth::UserID,
    budget::ensure_budget_item_in_account,
    category::ensure_category_exists,
    goal::{adjust_goal_amount, ensure_goal_in_account},
};

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Expense, TransactionKind::Income];

    /// The value stored in the database and sent by forms.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
        }
    }

    /// `amount` with the sign it has on the account balance.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Expense => -amount,
            TransactionKind::Income => amount,
        }
    }

    fn from_db_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|text| Self::from_db_str(text).ok_or(FromSqlError::InvalidType))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: UserID,
    pub account_id: Uuid,
    /// Always positive, [Transaction::kind] gives the direction.
    pub amount: f64,
    pub kind: TransactionKind,
    /// When the transaction happened. May be in the future.
    pub date: Date,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    /// The budget line this transaction was spent against.
    pub budget_item_id: Option<Uuid>,
}

/// The user editable fields of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionData {
    pub amount: f64,
    pub kind: TransactionKind,
    pub date: Date,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
}

impl TransactionData {
    /// Trim the description and check that the amount can be stored.
    ///
    /// A blank description is stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NonPositiveAmount] for an amount of zero or less.
    pub fn validate(self) -> Result<Self, Error> {
        if !self.amount.is_finite() {
            return Err(Error::NonFiniteAmount("Amount"));
        }
        if self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount("Amount"));
        }

        let description = self
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty());

        Ok(Self {
            description,
            ..self
        })
    }
}

/// What a new transaction is linked to besides its category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionLinks {
    /// Stored with the transaction.
    pub budget_item_id: Option<Uuid>,
    /// Not stored. The goal's saved amount is moved by the transaction amount.
    pub goal_id: Option<Uuid>,
}

/// The result of [create_transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTransaction {
    pub transaction: Transaction,
    /// Whether a goal's saved amount was changed.
    pub goal_updated: bool,
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id BLOB PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            account_id BLOB NOT NULL REFERENCES account(id) ON DELETE CASCADE,
            amount REAL NOT NULL CHECK (amount > 0),
            kind TEXT NOT NULL CHECK (kind IN ('expense', 'income')),
            date TEXT NOT NULL,
            category_id BLOB REFERENCES category(id) ON DELETE SET NULL,
            description TEXT,
            budget_item_id BLOB REFERENCES budget_item(id) ON DELETE SET NULL
        )",
        (),
    )?;

    // Improve performance of the per-account listings, which are ordered by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date
        ON \"transaction\"(account_id, date)",
        (),
    )?;

    Ok(())
}

pub(super) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        account_id: row.get(2)?,
        amount: row.get(3)?,
        kind: row.get(4)?,
        date: row.get(5)?,
        category_id: row.get(6)?,
        description: row.get(7)?,
        budget_item_id: row.get(8)?,
    })
}

/// Record a transaction in `account_id`.
///
/// The account must belong to the user, and the category, budget item and
/// goal must exist in the same account. If a goal is given, its saved amount
/// goes up by the amount of an income and down by the amount of an expense,
/// stopping at zero. Everything is written in one SQL transaction.
///
/// # Errors
///
/// Returns [Error::InvalidAccount], [Error::InvalidCategory],
/// [Error::InvalidBudgetItem] or [Error::InvalidGoal] for invalid links.
pub fn create_transaction(
    user_id: UserID,
    account_id: Uuid,
    data: &TransactionData,
    links: &TransactionLinks,
    connection: &Connection,
) -> Result<CreatedTransaction, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    match get_account(user_id, account_id, &sql_transaction) {
        Ok(_) => {}
        Err(Error::NotFound) => return Err(Error::InvalidAccount),
        Err(error) => return Err(error),
    }
    if let Some(category_id) = data.category_id {
        ensure_category_exists(category_id, &sql_transaction)?;
    }
    if let Some(budget_item_id) = links.budget_item_id {
        ensure_budget_item_in_account(user_id, account_id, budget_item_id, &sql_transaction)?;
    }
    if let Some(goal_id) = links.goal_id {
        ensure_goal_in_account(user_id, account_id, goal_id, &sql_transaction)?;
    }

    let id = Uuid::new_v4();
    sql_transaction.execute(
        "INSERT INTO \"transaction\" (id, user_id, account_id, amount, kind, date, category_id, \
            description, budget_item_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            user_id.as_i64(),
            account_id,
            data.amount,
            data.kind,
            data.date,
            data.category_id,
            data.description,
            links.budget_item_id
        ],
    )?;

    let goal_updated = match links.goal_id {
        Some(goal_id) => {
            adjust_goal_amount(user_id, goal_id, data.kind.signed(data.amount), &sql_transaction)?;
            true
        }
        None => false,
    };

    sql_transaction.commit()?;

    Ok(CreatedTransaction {
        transaction: Transaction {
            id,
            user_id,
            account_id,
            amount: data.amount,
            kind: data.kind,
            date: data.date,
            category_id: data.category_id,
            description: data.description.clone(),
            budget_item_id: links.budget_item_id,
        },
        goal_updated,
    })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no such transaction.
pub fn get_transaction(
    user_id: UserID,
    id: Uuid,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .query_row(
            "SELECT id, user_id, account_id, amount, kind, date, category_id, description, \
                budget_item_id
            FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            params![id, user_id.as_i64()],
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Overwrite the editable fields of transaction `id`.
///
/// The budget item link is kept as it is.
///
/// # Errors
///
/// Returns [Error::UpdateMissingTransaction] if the user has no such
/// transaction and [Error::InvalidCategory] for an unknown category.
pub fn update_transaction(
    user_id: UserID,
    id: Uuid,
    data: &TransactionData,
    connection: &Connection,
) -> Result<(), Error> {
    if let Some(category_id) = data.category_id {
        ensure_category_exists(category_id, connection)?;
    }

    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
        SET amount = ?1, kind = ?2, date = ?3, category_id = ?4, description = ?5
        WHERE id = ?6 AND user_id = ?7",
        params![
            data.amount,
            data.kind,
            data.date,
            data.category_id,
            data.description,
            id,
            user_id.as_i64()
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete transaction `id`. Goals it moved are not changed back.
///
/// # Errors
///
/// Returns [Error::DeleteMissingTransaction] if the user has no such transaction.
pub fn delete_transaction(user_id: UserID, id: Uuid, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        params![id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}
