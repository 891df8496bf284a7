//! Sample data for trying the app out by hand.

use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error,
    account::{AccountData, create_account},
    auth::{PasswordHash, UserID, create_user},
    budget::{BudgetItemData, Frequency, create_budget_item},
    category::get_categories,
    goal::{GoalData, GoalPeriod, create_goal},
    transaction::{TransactionData, TransactionKind, TransactionLinks, create_transaction},
};

/// How many months of transactions the demo account gets.
const DEMO_MONTH_COUNT: i64 = 14;

/// Create a user with two accounts, a budget, savings goals and a little over a
/// year of transactions.
///
/// # Errors
/// Returns an error if the user already exists or a query fails.
pub fn populate_demo_data(
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<UserID, Error> {
    let user = create_user(email, password_hash, connection)?;
    let categories = get_categories(connection)?;
    let category = |name: &str| {
        categories
            .iter()
            .find(|category| category.name == name)
            .map(|category| category.id)
    };

    let current = create_account(
        user.id,
        &AccountData {
            name: "Current account".to_owned(),
            color: "#3b82f6".to_owned(),
            icon: "landmark".to_owned(),
            initial_balance: 1250.0,
        },
        connection,
    )?;
    let savings = create_account(
        user.id,
        &AccountData {
            name: "Savings".to_owned(),
            color: "#eab308".to_owned(),
            icon: "piggy-bank".to_owned(),
            initial_balance: 4000.0,
        },
        connection,
    )?;

    let holiday = create_goal(
        user.id,
        current.id,
        &GoalData {
            name: "Summer holiday".to_owned(),
            target_amount: 1800.0,
            current_amount: 350.0,
            period: GoalPeriod::OneOff,
            deadline: Some(today() + Duration::days(180)),
        },
        connection,
    )?;
    create_goal(
        user.id,
        savings.id,
        &GoalData {
            name: "Emergency fund".to_owned(),
            target_amount: 10000.0,
            current_amount: 4000.0,
            period: GoalPeriod::Yearly,
            deadline: None,
        },
        connection,
    )?;

    let budget_lines = [
        ("Salary", 2850.0, Frequency::Monthly, "Salary", None),
        ("Rent", 1100.0, Frequency::Monthly, "Housing", None),
        ("Groceries", 400.0, Frequency::Monthly, "Groceries", None),
        ("Streaming", 15.99, Frequency::Monthly, "Subscriptions", None),
        ("Car insurance", 620.0, Frequency::Yearly, "Transport", None),
        ("Holiday fund", 150.0, Frequency::Monthly, "Savings", Some(holiday.id)),
    ];
    for (name, amount, frequency, category_name, goal_id) in budget_lines {
        create_budget_item(
            user.id,
            current.id,
            &BudgetItemData {
                name: name.to_owned(),
                amount,
                frequency,
                category_id: category(category_name),
                goal_id,
            },
            connection,
        )?;
    }

    let first_month = months_ago(today(), DEMO_MONTH_COUNT - 1);
    for month in 0..DEMO_MONTH_COUNT {
        let start = months_ago(first_month, -month);
        let variation = (month % 4) as f64 * 12.35;
        let entries = [
            (2850.0, TransactionKind::Income, 0, "Salary", "Monthly salary"),
            (1100.0, TransactionKind::Expense, 1, "Housing", "Rent"),
            (92.4 + variation, TransactionKind::Expense, 4, "Groceries", "Weekly shop"),
            (87.15 - variation / 2.0, TransactionKind::Expense, 11, "Groceries", "Weekly shop"),
            (34.5 + variation, TransactionKind::Expense, 13, "Eating out", "Dinner"),
            (15.99, TransactionKind::Expense, 14, "Subscriptions", "Streaming"),
            (48.2, TransactionKind::Expense, 17, "Transport", "Fuel"),
            (60.0 + variation * 2.0, TransactionKind::Expense, 21, "Shopping", "Clothes"),
        ];

        for (amount, kind, day_offset, category_name, description) in entries {
            let date = start + Duration::days(day_offset);
            if date > today() {
                continue;
            }

            create_transaction(
                user.id,
                current.id,
                &TransactionData {
                    amount,
                    kind,
                    date,
                    category_id: category(category_name),
                    description: Some(description.to_owned()),
                },
                &TransactionLinks::default(),
                connection,
            )?;
        }

        let transfer_date = start + Duration::days(2);
        if transfer_date <= today() {
            create_transaction(
                user.id,
                savings.id,
                &TransactionData {
                    amount: 250.0,
                    kind: TransactionKind::Income,
                    date: transfer_date,
                    category_id: category("Savings"),
                    description: Some("Monthly transfer".to_owned()),
                },
                &TransactionLinks::default(),
                connection,
            )?;
        }
    }

    Ok(user.id)
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// The first day of the month `count` months before `date`'s month.
/// A negative `count` moves forwards.
fn months_ago(date: Date, count: i64) -> Date {
    let month_index = date.year() as i64 * 12 + date.month() as i64 - 1 - count;
    let year = month_index.div_euclid(12) as i32;
    let month = (month_index.rem_euclid(12) + 1) as u8;

    // The month is always in 1..=12 and the first is always a valid day.
    Date::from_calendar_date(year, month.try_into().unwrap_or(time::Month::January), 1)
        .unwrap_or(date)
}
