//! The account table and the queries on it.
//!
//! Every query takes the owning [UserID] so that one user can never see or
//! change another user's accounts.

use rusqlite::{Connection, Row, params};
use uuid::Uuid;

use crate::{Error, auth::UserID};

/// The name of the account created for every new user.
pub const DEFAULT_ACCOUNT_NAME: &str = "Main account";
/// The color new accounts start with.
pub const DEFAULT_ACCOUNT_COLOR: &str = "#6366f1";
/// The icon new accounts start with.
pub const DEFAULT_ACCOUNT_ICON: &str = "landmark";

/// The icons an account can be shown with, as `(name, glyph)` pairs.
pub const ACCOUNT_ICONS: [(&str, &str); 6] = [
    ("landmark", "🏦"),
    ("wallet", "👛"),
    ("credit-card", "💳"),
    ("piggy-bank", "🐷"),
    ("building", "🏢"),
    ("banknote", "💶"),
];

/// The glyph for the icon called `name`, falling back to the default icon.
pub fn account_icon_glyph(name: &str) -> &'static str {
    ACCOUNT_ICONS
        .iter()
        .find(|(icon, _)| *icon == name)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(ACCOUNT_ICONS[0].1)
}

/// A bank account, wallet or any other pot of money the user tracks separately.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub user_id: UserID,
    pub name: String,
    /// A CSS hex color, e.g. "#6366f1".
    pub color: String,
    /// One of the names in [ACCOUNT_ICONS].
    pub icon: String,
    /// The balance before any of the recorded transactions.
    pub initial_balance: f64,
    pub sort_order: i64,
}

/// The user editable fields of an account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountData {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub initial_balance: f64,
}

impl AccountData {
    /// Trim the text fields and check that the account can be stored.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyField] for a blank name, color or icon and
    /// [Error::NonFiniteAmount] for a NaN or infinite initial balance.
    pub fn validate(self) -> Result<Self, Error> {
        let name = self.name.trim().to_owned();
        let color = self.color.trim().to_owned();
        let icon = self.icon.trim().to_owned();

        if name.is_empty() {
            return Err(Error::EmptyField("Name"));
        }
        if color.is_empty() {
            return Err(Error::EmptyField("Color"));
        }
        if icon.is_empty() {
            return Err(Error::EmptyField("Icon"));
        }
        if !self.initial_balance.is_finite() {
            return Err(Error::NonFiniteAmount("Initial balance"));
        }

        Ok(Self {
            name,
            color,
            icon,
            initial_balance: self.initial_balance,
        })
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id BLOB PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            icon TEXT NOT NULL,
            initial_balance REAL NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_account_user ON account(user_id, sort_order)",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        color: row.get(3)?,
        icon: row.get(4)?,
        initial_balance: row.get(5)?,
        sort_order: row.get(6)?,
    })
}

const SELECT_ACCOUNT: &str =
    "SELECT id, user_id, name, color, icon, initial_balance, sort_order FROM account";

/// Insert a new account for `user_id` at the end of the user's list.
///
/// The caller is expected to have validated `data` with [AccountData::validate].
pub fn create_account(
    user_id: UserID,
    data: &AccountData,
    connection: &Connection,
) -> Result<Account, Error> {
    let sort_order: i64 = connection.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM account WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;
    let id = Uuid::new_v4();

    connection.execute(
        "INSERT INTO account (id, user_id, name, color, icon, initial_balance, sort_order)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            user_id.as_i64(),
            data.name,
            data.color,
            data.icon,
            data.initial_balance,
            sort_order
        ],
    )?;

    Ok(Account {
        id,
        user_id,
        name: data.name.clone(),
        color: data.color.clone(),
        icon: data.icon.clone(),
        initial_balance: data.initial_balance,
        sort_order,
    })
}

/// Insert the "Main account" that every user starts with.
pub fn create_default_account(user_id: UserID, connection: &Connection) -> Result<Account, Error> {
    create_account(
        user_id,
        &AccountData {
            name: DEFAULT_ACCOUNT_NAME.to_owned(),
            color: DEFAULT_ACCOUNT_COLOR.to_owned(),
            icon: DEFAULT_ACCOUNT_ICON.to_owned(),
            initial_balance: 0.0,
        },
        connection,
    )
}

/// Get the account `id` if it belongs to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the account does not exist or belongs to someone else.
pub fn get_account(user_id: UserID, id: Uuid, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_row(
            &format!("{SELECT_ACCOUNT} WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id.as_i64()],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Get all of the user's accounts in display order.
pub fn get_accounts(user_id: UserID, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNT} WHERE user_id = ?1 ORDER BY sort_order ASC, rowid ASC"
        ))?
        .query_map([user_id.as_i64()], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Overwrite the editable fields of account `id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingAccount] if the user has no such account.
pub fn update_account(
    user_id: UserID,
    id: Uuid,
    data: &AccountData,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET name = ?1, color = ?2, icon = ?3, initial_balance = ?4
        WHERE id = ?5 AND user_id = ?6",
        params![
            data.name,
            data.color,
            data.icon,
            data.initial_balance,
            id,
            user_id.as_i64()
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Set the balance account `id` starts from.
///
/// # Errors
///
/// Returns [Error::NonFiniteAmount] for NaN or infinite balances and
/// [Error::UpdateMissingAccount] if the user has no such account.
pub fn set_initial_balance(
    user_id: UserID,
    id: Uuid,
    initial_balance: f64,
    connection: &Connection,
) -> Result<(), Error> {
    if !initial_balance.is_finite() {
        return Err(Error::NonFiniteAmount("Initial balance"));
    }

    let rows_affected = connection.execute(
        "UPDATE account SET initial_balance = ?1 WHERE id = ?2 AND user_id = ?3",
        params![initial_balance, id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Delete account `id` along with its transactions, budget items and goals.
///
/// # Errors
///
/// Returns:
/// - [Error::LastAccount] if this would leave the user without any account.
/// - [Error::DeleteMissingAccount] if the user has no such account.
pub fn delete_account(user_id: UserID, id: Uuid, connection: &Connection) -> Result<(), Error> {
    let account_count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM account WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    if account_count <= 1 {
        return Err(Error::LastAccount);
    }

    let rows_affected = connection.execute(
        "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
        params![id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    Ok(())
}

#[cfg(test)]
mod account_tests {
    use rusqlite::Connection;
    use uuid::Uuid;

    use crate::{
        Error,
        account::{
            AccountData, create_account, create_default_account, delete_account, get_account,
            get_accounts, set_initial_balance, update_account,
        },
        auth::UserID,
        test_utils::{create_test_user, get_test_connection},
    };

    fn data(name: &str) -> AccountData {
        AccountData {
            name: name.to_owned(),
            color: "#10b981".to_owned(),
            icon: "wallet".to_owned(),
            initial_balance: 100.0,
        }
    }

    #[test]
    fn validate_trims_and_rejects_blank_fields() {
        let valid = AccountData {
            name: "  Savings ".to_owned(),
            ..data("")
        }
        .validate()
        .unwrap();
        assert_eq!(valid.name, "Savings");

        assert_eq!(data("   ").validate(), Err(Error::EmptyField("Name")));
        assert_eq!(
            AccountData {
                icon: String::new(),
                ..data("Savings")
            }
            .validate(),
            Err(Error::EmptyField("Icon"))
        );
        assert_eq!(
            AccountData {
                initial_balance: f64::NAN,
                ..data("Savings")
            }
            .validate(),
            Err(Error::NonFiniteAmount("Initial balance"))
        );
    }

    #[test]
    fn sort_order_starts_at_zero_and_increments() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);

        let first = create_account(user_id, &data("First"), &connection).unwrap();
        let second = create_account(user_id, &data("Second"), &connection).unwrap();

        assert_eq!(first.sort_order, 0);
        assert_eq!(second.sort_order, 1);
        assert_eq!(
            get_accounts(user_id, &connection).unwrap(),
            vec![first, second]
        );
    }

    #[test]
    fn accounts_are_scoped_to_user() {
        let connection = get_test_connection();
        let alice = create_test_user(&connection);
        connection
            .execute(
                "INSERT INTO user (email, password) VALUES ('bob@example.com', 'hash')",
                (),
            )
            .unwrap();
        let bob = UserID::new(connection.last_insert_rowid());
        let account = create_default_account(alice, &connection).unwrap();

        assert_eq!(
            get_account(bob, account.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(get_accounts(bob, &connection).unwrap(), vec![]);
        assert_eq!(
            update_account(bob, account.id, &data("Mine now"), &connection),
            Err(Error::UpdateMissingAccount)
        );
    }

    #[test]
    fn update_account_changes_fields() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let account = create_default_account(user_id, &connection).unwrap();

        update_account(user_id, account.id, &data("Renamed"), &connection).unwrap();

        let got = get_account(user_id, account.id, &connection).unwrap();
        assert_eq!(got.name, "Renamed");
        assert_eq!(got.color, "#10b981");
        assert_eq!(got.initial_balance, 100.0);
    }

    #[test]
    fn set_initial_balance_rejects_non_finite_value() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let account = create_default_account(user_id, &connection).unwrap();

        assert_eq!(
            set_initial_balance(user_id, account.id, f64::INFINITY, &connection),
            Err(Error::NonFiniteAmount("Initial balance"))
        );
        set_initial_balance(user_id, account.id, -25.5, &connection).unwrap();
        assert_eq!(
            get_account(user_id, account.id, &connection)
                .unwrap()
                .initial_balance,
            -25.5
        );
    }

    #[test]
    fn cannot_delete_last_account() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let account = create_default_account(user_id, &connection).unwrap();

        assert_eq!(
            delete_account(user_id, account.id, &connection),
            Err(Error::LastAccount)
        );
        assert!(get_account(user_id, account.id, &connection).is_ok());
    }

    #[test]
    fn delete_account_cascades() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let keep = create_default_account(user_id, &connection).unwrap();
        let remove = create_account(user_id, &data("Old"), &connection).unwrap();
        connection
            .execute(
                "INSERT INTO goal (id, user_id, account_id, name, target_amount, current_amount, period, sort_order)
                VALUES (?1, ?2, ?3, 'Holiday', 1000, 0, 'one_off', 0)",
                (Uuid::new_v4(), user_id.as_i64(), remove.id),
            )
            .unwrap();

        delete_account(user_id, remove.id, &connection).unwrap();

        assert_eq!(get_accounts(user_id, &connection).unwrap(), vec![keep]);
        let goal_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM goal", [], |row| row.get(0))
            .unwrap();
        assert_eq!(goal_count, 0);
    }

    #[test]
    fn delete_missing_account_fails() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        create_default_account(user_id, &connection).unwrap();
        create_default_account(user_id, &connection).unwrap();

        assert_eq!(
            delete_account(user_id, Uuid::new_v4(), &connection),
            Err(Error::DeleteMissingAccount)
        );
    }
}
