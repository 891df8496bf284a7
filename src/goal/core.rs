//! The goal table and the queries on it.

use rusqlite::{
    Connection, Row, ToSql, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::{Error, auth::UserID};

/// How often a goal is meant to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPeriod {
    Monthly,
    Yearly,
    #[default]
    OneOff,
}

impl GoalPeriod {
    pub const ALL: [GoalPeriod; 3] = [GoalPeriod::Monthly, GoalPeriod::Yearly, GoalPeriod::OneOff];

    /// The value stored in the database and sent by forms.
    pub fn as_str(self) -> &'static str {
        match self {
            GoalPeriod::Monthly => "monthly",
            GoalPeriod::Yearly => "yearly",
            GoalPeriod::OneOff => "one_off",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalPeriod::Monthly => "Monthly",
            GoalPeriod::Yearly => "Yearly",
            GoalPeriod::OneOff => "One-off",
        }
    }

    fn from_db_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|period| period.as_str() == value)
    }
}

impl ToSql for GoalPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for GoalPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|text| Self::from_db_str(text).ok_or(FromSqlError::InvalidType))
    }
}

/// An amount of money the user is saving towards.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: UserID,
    pub account_id: Uuid,
    pub name: String,
    pub target_amount: f64,
    /// How much has been saved so far. Never negative.
    pub current_amount: f64,
    pub period: GoalPeriod,
    pub deadline: Option<Date>,
    pub sort_order: i64,
}

/// The user editable fields of a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalData {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub period: GoalPeriod,
    pub deadline: Option<Date>,
}

impl GoalData {
    /// Trim the name and check that the goal can be stored.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyField] for a blank name,
    /// [Error::NonPositiveAmount] for a target of zero or less and
    /// [Error::NegativeAmount] for a negative current amount.
    pub fn validate(self) -> Result<Self, Error> {
        let name = self.name.trim().to_owned();

        if name.is_empty() {
            return Err(Error::EmptyField("Name"));
        }
        if !self.target_amount.is_finite() {
            return Err(Error::NonFiniteAmount("Target amount"));
        }
        if self.target_amount <= 0.0 {
            return Err(Error::NonPositiveAmount("Target amount"));
        }
        if !self.current_amount.is_finite() {
            return Err(Error::NonFiniteAmount("Current amount"));
        }
        if self.current_amount < 0.0 {
            return Err(Error::NegativeAmount("Current amount"));
        }

        Ok(Self { name, ..self })
    }
}

pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
            id BLOB PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            account_id BLOB NOT NULL REFERENCES account(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            target_amount REAL NOT NULL CHECK (target_amount > 0),
            current_amount REAL NOT NULL DEFAULT 0 CHECK (current_amount >= 0),
            period TEXT NOT NULL CHECK (period IN ('monthly', 'yearly', 'one_off')),
            deadline TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_goal_account ON goal(account_id, sort_order)",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        account_id: row.get(2)?,
        name: row.get(3)?,
        target_amount: row.get(4)?,
        current_amount: row.get(5)?,
        period: row.get(6)?,
        deadline: row.get(7)?,
        sort_order: row.get(8)?,
    })
}

const SELECT_GOAL: &str = "SELECT id, user_id, account_id, name, target_amount, current_amount, \
    period, deadline, sort_order FROM goal";

/// Insert a new goal at the end of the account's list.
///
/// The caller is expected to have validated `data` with [GoalData::validate]
/// and checked that the user owns `account_id`.
pub fn create_goal(
    user_id: UserID,
    account_id: Uuid,
    data: &GoalData,
    connection: &Connection,
) -> Result<Goal, Error> {
    let sort_order: i64 = connection.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM goal WHERE account_id = ?1",
        [account_id],
        |row| row.get(0),
    )?;
    let id = Uuid::new_v4();

    connection.execute(
        "INSERT INTO goal (id, user_id, account_id, name, target_amount, current_amount, \
            period, deadline, sort_order)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            user_id.as_i64(),
            account_id,
            data.name,
            data.target_amount,
            data.current_amount,
            data.period,
            data.deadline,
            sort_order
        ],
    )?;

    Ok(Goal {
        id,
        user_id,
        account_id,
        name: data.name.clone(),
        target_amount: data.target_amount,
        current_amount: data.current_amount,
        period: data.period,
        deadline: data.deadline,
        sort_order,
    })
}

/// Get goal `id` if it belongs to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such goal.
pub fn get_goal(user_id: UserID, id: Uuid, connection: &Connection) -> Result<Goal, Error> {
    connection
        .query_row(
            &format!("{SELECT_GOAL} WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id.as_i64()],
            map_row,
        )
        .map_err(Error::from)
}

/// Get the goals of `account_id` in display order.
pub fn get_goals(
    user_id: UserID,
    account_id: Uuid,
    connection: &Connection,
) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_GOAL} WHERE user_id = ?1 AND account_id = ?2 \
            ORDER BY sort_order ASC, rowid ASC"
        ))?
        .query_map(params![user_id.as_i64(), account_id], map_row)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}

/// Check that goal `id` exists in `account_id`.
///
/// # Errors
///
/// Returns [Error::InvalidGoal] if the goal does not exist, belongs to
/// another user or is in another account.
pub fn ensure_goal_in_account(
    user_id: UserID,
    account_id: Uuid,
    id: Uuid,
    connection: &Connection,
) -> Result<(), Error> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM goal WHERE id = ?1 AND user_id = ?2 AND account_id = ?3)",
        params![id, user_id.as_i64(), account_id],
        |row| row.get(0),
    )?;

    if exists {
        Ok(())
    } else {
        Err(Error::InvalidGoal)
    }
}

/// Overwrite the editable fields of goal `id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingGoal] if the user has no such goal.
pub fn update_goal(
    user_id: UserID,
    id: Uuid,
    data: &GoalData,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET name = ?1, target_amount = ?2, current_amount = ?3, period = ?4, \
            deadline = ?5
        WHERE id = ?6 AND user_id = ?7",
        params![
            data.name,
            data.target_amount,
            data.current_amount,
            data.period,
            data.deadline,
            id,
            user_id.as_i64()
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Set how much has been saved towards goal `id`.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] if `current_amount` is negative or not a
/// number, and [Error::UpdateMissingGoal] if the user has no such goal.
pub fn update_goal_progress(
    user_id: UserID,
    id: Uuid,
    current_amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    if !current_amount.is_finite() || current_amount < 0.0 {
        return Err(Error::InvalidAmount);
    }

    let rows_affected = connection.execute(
        "UPDATE goal SET current_amount = ?1 WHERE id = ?2 AND user_id = ?3",
        params![current_amount, id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Add `delta` to the current amount of goal `id`, stopping at zero.
///
/// Returns the new current amount.
pub fn adjust_goal_amount(
    user_id: UserID,
    id: Uuid,
    delta: f64,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .query_row(
            "UPDATE goal SET current_amount = MAX(0, current_amount + ?1)
            WHERE id = ?2 AND user_id = ?3
            RETURNING current_amount",
            params![delta, id, user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::InvalidGoal,
            error => error.into(),
        })
}

/// Delete goal `id`. Budget items linked to it are unlinked.
///
/// # Errors
///
/// Returns [Error::DeleteMissingGoal] if the user has no such goal.
pub fn delete_goal(user_id: UserID, id: Uuid, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM goal WHERE id = ?1 AND user_id = ?2",
        params![id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

#[cfg(test)]
mod goal_tests {
    use time::macros::date;
    use uuid::Uuid;

    use crate::{
        Error,
        account::{create_default_account, delete_account, create_account, AccountData},
        test_utils::{create_test_user, create_test_user_with_email, get_test_connection},
    };

    use super::{
        GoalData, GoalPeriod, adjust_goal_amount, create_goal, delete_goal,
        ensure_goal_in_account, get_goal, get_goals, update_goal, update_goal_progress,
    };

    fn data(name: &str) -> GoalData {
        GoalData {
            name: name.to_owned(),
            target_amount: 1000.0,
            current_amount: 100.0,
            period: GoalPeriod::OneOff,
            deadline: Some(date!(2026 - 12 - 31)),
        }
    }

    #[test]
    fn validate_rejects_bad_amounts() {
        assert_eq!(data("  ").validate(), Err(Error::EmptyField("Name")));
        assert_eq!(
            GoalData {
                target_amount: 0.0,
                ..data("Holiday")
            }
            .validate(),
            Err(Error::NonPositiveAmount("Target amount"))
        );
        assert_eq!(
            GoalData {
                current_amount: -1.0,
                ..data("Holiday")
            }
            .validate(),
            Err(Error::NegativeAmount("Current amount"))
        );
        assert_eq!(data(" Holiday ").validate().unwrap().name, "Holiday");
    }

    #[test]
    fn create_and_get_goal() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let account = create_default_account(user_id, &connection).unwrap();

        let first = create_goal(user_id, account.id, &data("Holiday"), &connection).unwrap();
        let second = create_goal(user_id, account.id, &data("Car"), &connection).unwrap();

        assert_eq!(get_goal(user_id, first.id, &connection), Ok(first.clone()));
        assert_eq!(second.sort_order, 1);
        assert_eq!(
            get_goals(user_id, account.id, &connection).unwrap(),
            vec![first, second]
        );
    }

    #[test]
    fn goals_are_scoped_to_user() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let other_user = create_test_user_with_email("other@example.com", &connection);
        let account = create_default_account(user_id, &connection).unwrap();
        let goal = create_goal(user_id, account.id, &data("Holiday"), &connection).unwrap();

        assert_eq!(get_goal(other_user, goal.id, &connection), Err(Error::NotFound));
        assert_eq!(
            update_goal(other_user, goal.id, &data("Mine"), &connection),
            Err(Error::UpdateMissingGoal)
        );
        assert_eq!(
            delete_goal(other_user, goal.id, &connection),
            Err(Error::DeleteMissingGoal)
        );
    }

    #[test]
    fn ensure_goal_in_account_checks_account() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let account = create_default_account(user_id, &connection).unwrap();
        let other_account = create_default_account(user_id, &connection).unwrap();
        let goal = create_goal(user_id, account.id, &data("Holiday"), &connection).unwrap();

        assert_eq!(
            ensure_goal_in_account(user_id, account.id, goal.id, &connection),
            Ok(())
        );
        assert_eq!(
            ensure_goal_in_account(user_id, other_account.id, goal.id, &connection),
            Err(Error::InvalidGoal)
        );
    }

    #[test]
    fn update_goal_progress_rejects_negative_amount() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let account = create_default_account(user_id, &connection).unwrap();
        let goal = create_goal(user_id, account.id, &data("Holiday"), &connection).unwrap();

        assert_eq!(
            update_goal_progress(user_id, goal.id, -5.0, &connection),
            Err(Error::InvalidAmount)
        );
        assert_eq!(
            update_goal_progress(user_id, goal.id, f64::NAN, &connection),
            Err(Error::InvalidAmount)
        );
        assert_eq!(
            update_goal_progress(user_id, Uuid::new_v4(), 5.0, &connection),
            Err(Error::UpdateMissingGoal)
        );

        update_goal_progress(user_id, goal.id, 250.0, &connection).unwrap();
        assert_eq!(
            get_goal(user_id, goal.id, &connection).unwrap().current_amount,
            250.0
        );
    }

    #[test]
    fn adjust_goal_amount_clamps_at_zero() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let account = create_default_account(user_id, &connection).unwrap();
        let goal = create_goal(user_id, account.id, &data("Holiday"), &connection).unwrap();

        assert_eq!(adjust_goal_amount(user_id, goal.id, 50.0, &connection), Ok(150.0));
        assert_eq!(adjust_goal_amount(user_id, goal.id, -500.0, &connection), Ok(0.0));
        assert_eq!(
            adjust_goal_amount(user_id, Uuid::new_v4(), 1.0, &connection),
            Err(Error::InvalidGoal)
        );
    }

    #[test]
    fn deleting_account_deletes_its_goals() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let account = create_default_account(user_id, &connection).unwrap();
        create_account(
            user_id,
            &AccountData {
                name: "Other".to_owned(),
                color: "#000000".to_owned(),
                icon: "wallet".to_owned(),
                initial_balance: 0.0,
            },
            &connection,
        )
        .unwrap();
        let goal = create_goal(user_id, account.id, &data("Holiday"), &connection).unwrap();

        delete_account(user_id, account.id, &connection).unwrap();

        assert_eq!(get_goal(user_id, goal.id, &connection), Err(Error::NotFound));
    }
}
