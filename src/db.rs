//! Database initialization.
//!
//! Each feature module owns the `CREATE TABLE` statement for its data. This
//! module creates them all in dependency order inside one transaction.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    account::create_account_table,
    auth::create_user_table,
    budget::create_budget_item_table,
    category::{create_category_table, seed_default_categories},
    goal::create_goal_table,
    settings::create_setting_table,
    transaction::create_transaction_table,
};

/// Create the tables for all of the domain models and seed the reference data.
///
/// Calling this function on an initialized database is a no-op apart from
/// enabling foreign key enforcement for the connection.
///
/// # Errors
/// Returns an error if any of the SQL queries fail.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    create_goal_table(&transaction)?;
    create_budget_item_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_setting_table(&transaction)?;
    seed_default_categories(&transaction)?;

    transaction.commit()
}
