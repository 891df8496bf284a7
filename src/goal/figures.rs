//! Progress figures shown for each goal.

use std::collections::HashMap;

use rusqlite::{Connection, params};
use time::Date;
use uuid::Uuid;

use crate::{Error, auth::UserID, budget::Frequency, goal::Goal};

/// How far along a goal is.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    /// Capped at 100.
    pub percentage: f64,
    pub reached: bool,
    /// The amount still to save. Never negative.
    pub remaining: f64,
    /// Days until the deadline, negative once it has passed.
    pub days_left: Option<i64>,
}

pub fn goal_progress(goal: &Goal, today: Date) -> GoalProgress {
    let percentage = if goal.target_amount > 0.0 {
        (goal.current_amount / goal.target_amount * 100.0).min(100.0)
    } else {
        0.0
    };

    GoalProgress {
        percentage,
        reached: goal.current_amount >= goal.target_amount,
        remaining: (goal.target_amount - goal.current_amount).max(0.0),
        days_left: goal
            .deadline
            .map(|deadline| (deadline - today).whole_days()),
    }
}

/// A budget item that saves towards a goal, and how much of it has been spent.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLineProgress {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub frequency: Frequency,
    /// The sum of the transactions recorded against this line.
    pub consumed: f64,
    /// `amount - consumed`, never negative.
    pub remaining: f64,
}

/// Get the budget lines linked to each goal in `account_id`, keyed by goal ID.
pub fn get_linked_budget_lines(
    user_id: UserID,
    account_id: Uuid,
    connection: &Connection,
) -> Result<HashMap<Uuid, Vec<BudgetLineProgress>>, Error> {
    let mut statement = connection.prepare(
        "SELECT budget_item.goal_id, budget_item.id, budget_item.name, budget_item.amount,
            budget_item.frequency, COALESCE(SUM(\"transaction\".amount), 0)
        FROM budget_item
        LEFT JOIN \"transaction\" ON \"transaction\".budget_item_id = budget_item.id
        WHERE budget_item.user_id = ?1
            AND budget_item.account_id = ?2
            AND budget_item.goal_id IS NOT NULL
        GROUP BY budget_item.id
        ORDER BY budget_item.sort_order ASC, budget_item.rowid ASC",
    )?;

    let rows = statement.query_map(params![user_id.as_i64(), account_id], |row| {
        let amount: f64 = row.get(3)?;
        let consumed: f64 = row.get(5)?;

        Ok((
            row.get::<_, Uuid>(0)?,
            BudgetLineProgress {
                id: row.get(1)?,
                name: row.get(2)?,
                amount,
                frequency: row.get(4)?,
                consumed,
                remaining: (amount - consumed).max(0.0),
            },
        ))
    })?;

    let mut lines_by_goal: HashMap<Uuid, Vec<BudgetLineProgress>> = HashMap::new();
    for row in rows {
        let (goal_id, line) = row?;
        lines_by_goal.entry(goal_id).or_default().push(line);
    }

    Ok(lines_by_goal)
}

#[cfg(test)]
mod goal_progress_tests {
    use time::macros::date;
    use uuid::Uuid;

    use crate::{
        auth::UserID,
        goal::{Goal, GoalPeriod},
    };

    use super::goal_progress;

    fn goal(current_amount: f64, target_amount: f64) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id: UserID::new(1),
            account_id: Uuid::new_v4(),
            name: "Holiday".to_owned(),
            target_amount,
            current_amount,
            period: GoalPeriod::OneOff,
            deadline: Some(date!(2025 - 03 - 01)),
            sort_order: 0,
        }
    }

    #[test]
    fn partial_progress() {
        let progress = goal_progress(&goal(250.0, 1000.0), date!(2025 - 02 - 20));

        assert_eq!(progress.percentage, 25.0);
        assert!(!progress.reached);
        assert_eq!(progress.remaining, 750.0);
        assert_eq!(progress.days_left, Some(9));
    }

    #[test]
    fn percentage_is_capped_when_goal_is_exceeded() {
        let progress = goal_progress(&goal(1500.0, 1000.0), date!(2025 - 03 - 05));

        assert_eq!(progress.percentage, 100.0);
        assert!(progress.reached);
        assert_eq!(progress.remaining, 0.0);
        assert_eq!(progress.days_left, Some(-4));
    }

    #[test]
    fn no_deadline_means_no_days_left() {
        let mut goal = goal(0.0, 10.0);
        goal.deadline = None;

        assert_eq!(goal_progress(&goal, date!(2025 - 01 - 01)).days_left, None);
    }
}
