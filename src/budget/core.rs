//! The budget item table and the queries on it.

use rusqlite::{
    Connection, Row, ToSql, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    Error,
    auth::UserID,
    category::ensure_category_exists,
    goal::{GoalData, create_goal, ensure_goal_in_account},
};

/// How often a budget item is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 2] = [Frequency::Monthly, Frequency::Yearly];

    /// The value stored in the database and sent by forms.
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }

    /// The short suffix shown after an amount, e.g. "€20.00 / month".
    pub fn per(self) -> &'static str {
        match self {
            Frequency::Monthly => "/ month",
            Frequency::Yearly => "/ year",
        }
    }

    /// `amount` spread over one month.
    pub fn monthly_amount(self, amount: f64) -> f64 {
        match self {
            Frequency::Monthly => amount,
            Frequency::Yearly => amount / 12.0,
        }
    }

    /// `amount` summed over one year.
    pub fn annual_amount(self, amount: f64) -> f64 {
        match self {
            Frequency::Monthly => amount * 12.0,
            Frequency::Yearly => amount,
        }
    }

    fn from_db_str(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == value)
    }
}

impl ToSql for Frequency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Frequency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|text| Self::from_db_str(text).ok_or(FromSqlError::InvalidType))
    }
}

/// A recurring expense the user plans for, e.g. rent or a yearly insurance premium.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetItem {
    pub id: Uuid,
    pub user_id: UserID,
    pub account_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub frequency: Frequency,
    pub category_id: Option<Uuid>,
    /// The goal this item saves towards.
    pub goal_id: Option<Uuid>,
    /// Inactive items are listed but left out of the budget totals.
    pub active: bool,
    pub sort_order: i64,
}

/// The user editable fields of a budget item.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetItemData {
    pub name: String,
    pub amount: f64,
    pub frequency: Frequency,
    pub category_id: Option<Uuid>,
    pub goal_id: Option<Uuid>,
}

impl BudgetItemData {
    /// Trim the name and check that the item can be stored.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyField] for a blank name and
    /// [Error::NonPositiveAmount] for an amount of zero or less.
    pub fn validate(self) -> Result<Self, Error> {
        let name = self.name.trim().to_owned();

        if name.is_empty() {
            return Err(Error::EmptyField("Name"));
        }
        if !self.amount.is_finite() {
            return Err(Error::NonFiniteAmount("Amount"));
        }
        if self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount("Amount"));
        }

        Ok(Self { name, ..self })
    }
}

pub fn create_budget_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget_item (
            id BLOB PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            account_id BLOB NOT NULL REFERENCES account(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            frequency TEXT NOT NULL CHECK (frequency IN ('monthly', 'yearly')),
            category_id BLOB REFERENCES category(id) ON DELETE SET NULL,
            goal_id BLOB REFERENCES goal(id) ON DELETE SET NULL,
            active INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_budget_item_account
        ON budget_item(account_id, sort_order)",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<BudgetItem, rusqlite::Error> {
    Ok(BudgetItem {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        account_id: row.get(2)?,
        name: row.get(3)?,
        amount: row.get(4)?,
        frequency: row.get(5)?,
        category_id: row.get(6)?,
        goal_id: row.get(7)?,
        active: row.get(8)?,
        sort_order: row.get(9)?,
    })
}

const SELECT_BUDGET_ITEM: &str = "SELECT id, user_id, account_id, name, amount, frequency, \
    category_id, goal_id, active, sort_order FROM budget_item";

fn ensure_links_valid(
    user_id: UserID,
    account_id: Uuid,
    data: &BudgetItemData,
    connection: &Connection,
) -> Result<(), Error> {
    if let Some(category_id) = data.category_id {
        ensure_category_exists(category_id, connection)?;
    }
    if let Some(goal_id) = data.goal_id {
        ensure_goal_in_account(user_id, account_id, goal_id, connection)?;
    }

    Ok(())
}

/// Insert a new active budget item at the end of the account's list.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] or [Error::InvalidGoal] if `data` links
/// to a category that does not exist or a goal outside `account_id`.
pub fn create_budget_item(
    user_id: UserID,
    account_id: Uuid,
    data: &BudgetItemData,
    connection: &Connection,
) -> Result<BudgetItem, Error> {
    ensure_links_valid(user_id, account_id, data, connection)?;

    let sort_order: i64 = connection.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM budget_item WHERE account_id = ?1",
        [account_id],
        |row| row.get(0),
    )?;
    let id = Uuid::new_v4();

    connection.execute(
        "INSERT INTO budget_item (id, user_id, account_id, name, amount, frequency, \
            category_id, goal_id, active, sort_order)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9)",
        params![
            id,
            user_id.as_i64(),
            account_id,
            data.name,
            data.amount,
            data.frequency,
            data.category_id,
            data.goal_id,
            sort_order
        ],
    )?;

    Ok(BudgetItem {
        id,
        user_id,
        account_id,
        name: data.name.clone(),
        amount: data.amount,
        frequency: data.frequency,
        category_id: data.category_id,
        goal_id: data.goal_id,
        active: true,
        sort_order,
    })
}

/// Create `goal` in `account_id` and a budget item that saves towards it.
///
/// Both rows are written in one SQL transaction, so a failure leaves neither.
/// Any goal already set in `data` is replaced by the new one.
pub fn create_budget_item_with_goal(
    user_id: UserID,
    account_id: Uuid,
    data: &BudgetItemData,
    goal: &GoalData,
    connection: &Connection,
) -> Result<BudgetItem, Error> {
    let transaction = connection.unchecked_transaction()?;

    let goal = create_goal(user_id, account_id, goal, &transaction)?;
    let data = BudgetItemData {
        goal_id: Some(goal.id),
        ..data.clone()
    };
    let budget_item = create_budget_item(user_id, account_id, &data, &transaction)?;

    transaction.commit()?;

    Ok(budget_item)
}

/// Get budget item `id` if it belongs to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such item.
pub fn get_budget_item(
    user_id: UserID,
    id: Uuid,
    connection: &Connection,
) -> Result<BudgetItem, Error> {
    connection
        .query_row(
            &format!("{SELECT_BUDGET_ITEM} WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id.as_i64()],
            map_row,
        )
        .map_err(Error::from)
}

/// Get the budget items of `account_id` in display order.
pub fn get_budget_items(
    user_id: UserID,
    account_id: Uuid,
    connection: &Connection,
) -> Result<Vec<BudgetItem>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BUDGET_ITEM} WHERE user_id = ?1 AND account_id = ?2 \
            ORDER BY sort_order ASC, rowid ASC"
        ))?
        .query_map(params![user_id.as_i64(), account_id], map_row)?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Check that budget item `id` exists in `account_id`.
///
/// # Errors
///
/// Returns [Error::InvalidBudgetItem] if the item does not exist, belongs
/// to another user or is in another account.
pub fn ensure_budget_item_in_account(
    user_id: UserID,
    account_id: Uuid,
    id: Uuid,
    connection: &Connection,
) -> Result<(), Error> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM budget_item WHERE id = ?1 AND user_id = ?2 AND account_id = ?3
        )",
        params![id, user_id.as_i64(), account_id],
        |row| row.get(0),
    )?;

    if exists {
        Ok(())
    } else {
        Err(Error::InvalidBudgetItem)
    }
}

/// Overwrite the editable fields of budget item `id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingBudgetItem] if the user has no such item, and
/// [Error::InvalidCategory] or [Error::InvalidGoal] for invalid links.
pub fn update_budget_item(
    user_id: UserID,
    id: Uuid,
    data: &BudgetItemData,
    connection: &Connection,
) -> Result<(), Error> {
    let budget_item = match get_budget_item(user_id, id, connection) {
        Ok(budget_item) => budget_item,
        Err(Error::NotFound) => return Err(Error::UpdateMissingBudgetItem),
        Err(error) => return Err(error),
    };
    ensure_links_valid(user_id, budget_item.account_id, data, connection)?;

    connection.execute(
        "UPDATE budget_item SET name = ?1, amount = ?2, frequency = ?3, category_id = ?4, \
            goal_id = ?5
        WHERE id = ?6 AND user_id = ?7",
        params![
            data.name,
            data.amount,
            data.frequency,
            data.category_id,
            data.goal_id,
            id,
            user_id.as_i64()
        ],
    )?;

    Ok(())
}

/// Flip budget item `id` between active and inactive.
///
/// Returns whether the item is now active.
///
/// # Errors
///
/// Returns [Error::UpdateMissingBudgetItem] if the user has no such item.
pub fn toggle_budget_item(user_id: UserID, id: Uuid, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "UPDATE budget_item SET active = NOT active
            WHERE id = ?1 AND user_id = ?2
            RETURNING active",
            params![id, user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingBudgetItem,
            error => error.into(),
        })
}

/// Delete budget item `id`. Transactions that were assigned to it are kept.
///
/// # Errors
///
/// Returns [Error::DeleteMissingBudgetItem] if the user has no such item.
pub fn delete_budget_item(user_id: UserID, id: Uuid, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget_item WHERE id = ?1 AND user_id = ?2",
        params![id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudgetItem);
    }

    Ok(())
}

#[cfg(test)]
mod budget_item_tests {
    use uuid::Uuid;

    use crate::{
        Error,
        account::{AccountData, create_account},
        budget::Frequency,
        category::get_categories,
        goal::{GoalData, GoalPeriod, create_goal, get_goals},
        test_utils::get_test_db_with_account,
    };

    use super::{
        BudgetItemData, create_budget_item, create_budget_item_with_goal, delete_budget_item,
        ensure_budget_item_in_account, get_budget_item, get_budget_items, toggle_budget_item,
        update_budget_item,
    };

    fn rent() -> BudgetItemData {
        BudgetItemData {
            name: "Rent".to_owned(),
            amount: 900.0,
            frequency: Frequency::Monthly,
            category_id: None,
            goal_id: None,
        }
    }

    fn holiday_goal() -> GoalData {
        GoalData {
            name: "Holiday".to_owned(),
            target_amount: 1200.0,
            current_amount: 0.0,
            period: GoalPeriod::OneOff,
            deadline: None,
        }
    }

    #[test]
    fn validate_rejects_blank_name_and_non_positive_amount() {
        let blank = BudgetItemData {
            name: "  ".to_owned(),
            ..rent()
        };
        assert_eq!(blank.validate(), Err(Error::EmptyField("Name")));

        for amount in [0.0, -10.0] {
            let data = BudgetItemData { amount, ..rent() };
            assert_eq!(data.validate(), Err(Error::NonPositiveAmount("Amount")));
        }

        let data = BudgetItemData {
            amount: f64::NAN,
            ..rent()
        };
        assert_eq!(data.validate(), Err(Error::NonFiniteAmount("Amount")));
    }

    #[test]
    fn frequency_converts_amounts() {
        assert_eq!(Frequency::Monthly.monthly_amount(100.0), 100.0);
        assert_eq!(Frequency::Yearly.monthly_amount(120.0), 10.0);
        assert_eq!(Frequency::Monthly.annual_amount(100.0), 1200.0);
        assert_eq!(Frequency::Yearly.annual_amount(120.0), 120.0);
    }

    #[test]
    fn database_rejects_non_positive_amount() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();
        let data = BudgetItemData {
            amount: 0.0,
            ..rent()
        };

        let result = create_budget_item(user_id, account.id, &data, &connection);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn items_are_appended_in_order() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();

        let first = create_budget_item(user_id, account.id, &rent(), &connection).unwrap();
        let second = create_budget_item(
            user_id,
            account.id,
            &BudgetItemData {
                name: "Insurance".to_owned(),
                amount: 480.0,
                frequency: Frequency::Yearly,
                ..rent()
            },
            &connection,
        )
        .unwrap();

        let got = get_budget_items(user_id, account.id, &connection).unwrap();
        assert_eq!(got, vec![first, second]);
        assert_eq!(got[1].sort_order, 1);
        assert!(got[1].active);
    }

    #[test]
    fn create_rejects_goal_from_another_account() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();
        let other_account = create_account(
            user_id,
            &AccountData {
                name: "Savings".to_owned(),
                color: "#10b981".to_owned(),
                icon: "piggy-bank".to_owned(),
                initial_balance: 0.0,
            },
            &connection,
        )
        .unwrap();
        let goal = create_goal(user_id, other_account.id, &holiday_goal(), &connection).unwrap();

        let result = create_budget_item(
            user_id,
            account.id,
            &BudgetItemData {
                goal_id: Some(goal.id),
                ..rent()
            },
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidGoal));
    }

    #[test]
    fn create_rejects_unknown_category() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();

        let result = create_budget_item(
            user_id,
            account.id,
            &BudgetItemData {
                category_id: Some(Uuid::new_v4()),
                ..rent()
            },
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidCategory));
    }

    #[test]
    fn create_with_goal_links_new_goal() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();

        let item = create_budget_item_with_goal(
            user_id,
            account.id,
            &rent(),
            &holiday_goal(),
            &connection,
        )
        .unwrap();

        let goals = get_goals(user_id, account.id, &connection).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].name, "Holiday");
        assert_eq!(item.goal_id, Some(goals[0].id));
    }

    #[test]
    fn failed_create_with_goal_leaves_no_goal() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();
        let data = BudgetItemData {
            category_id: Some(Uuid::new_v4()),
            ..rent()
        };

        let result =
            create_budget_item_with_goal(user_id, account.id, &data, &holiday_goal(), &connection);

        assert_eq!(result, Err(Error::InvalidCategory));
        assert!(get_goals(user_id, account.id, &connection).unwrap().is_empty());
    }

    #[test]
    fn update_overwrites_fields() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();
        let item = create_budget_item(user_id, account.id, &rent(), &connection).unwrap();
        let category = get_categories(&connection).unwrap().remove(1);
        let data = BudgetItemData {
            name: "Mortgage".to_owned(),
            amount: 1100.0,
            frequency: Frequency::Monthly,
            category_id: Some(category.id),
            goal_id: None,
        };

        update_budget_item(user_id, item.id, &data, &connection).unwrap();

        let got = get_budget_item(user_id, item.id, &connection).unwrap();
        assert_eq!(got.name, "Mortgage");
        assert_eq!(got.amount, 1100.0);
        assert_eq!(got.category_id, Some(category.id));
    }

    #[test]
    fn update_missing_item_fails() {
        let (db_connection, user_id, _) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();

        let result = update_budget_item(user_id, Uuid::new_v4(), &rent(), &connection);

        assert_eq!(result, Err(Error::UpdateMissingBudgetItem));
    }

    #[test]
    fn toggle_flips_active_flag() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();
        let item = create_budget_item(user_id, account.id, &rent(), &connection).unwrap();

        assert_eq!(toggle_budget_item(user_id, item.id, &connection), Ok(false));
        assert!(!get_budget_item(user_id, item.id, &connection).unwrap().active);
        assert_eq!(toggle_budget_item(user_id, item.id, &connection), Ok(true));
        assert_eq!(
            toggle_budget_item(user_id, Uuid::new_v4(), &connection),
            Err(Error::UpdateMissingBudgetItem)
        );
    }

    #[test]
    fn ensure_in_account_checks_account() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();
        let item = create_budget_item(user_id, account.id, &rent(), &connection).unwrap();

        assert_eq!(
            ensure_budget_item_in_account(user_id, account.id, item.id, &connection),
            Ok(())
        );
        assert_eq!(
            ensure_budget_item_in_account(user_id, Uuid::new_v4(), item.id, &connection),
            Err(Error::InvalidBudgetItem)
        );
    }

    #[test]
    fn delete_removes_item() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let connection = db_connection.lock().unwrap();
        let item = create_budget_item(user_id, account.id, &rent(), &connection).unwrap();

        delete_budget_item(user_id, item.id, &connection).unwrap();

        assert_eq!(
            get_budget_item(user_id, item.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            delete_budget_item(user_id, item.id, &connection),
            Err(Error::DeleteMissingBudgetItem)
        );
    }
}
