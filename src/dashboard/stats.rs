//! The figures shown on the dashboard.

use time::Date;

use crate::{
    summary::{first_of_month, monthly_figures},
    transaction::{TransactionRow, transaction_totals},
};

/// How many transactions the dashboard lists.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// This month's activity and the balance of the account.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardStats {
    pub month_income: f64,
    pub month_expenses: f64,
    pub month_savings: f64,
    pub initial_balance: f64,
    /// The initial balance plus all income minus all expenses.
    pub total_balance: f64,
}

/// The money flow of one month with transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancePoint {
    pub label: String,
    /// Income minus expenses for that month alone.
    pub balance: f64,
    pub expenses: f64,
}

/// The rows dated in the same calendar month as `today`.
pub fn current_month_rows(rows: &[TransactionRow], today: Date) -> Vec<&TransactionRow> {
    let month = first_of_month(today);

    rows.iter()
        .filter(|row| first_of_month(row.transaction.date) == month)
        .collect()
}

pub fn dashboard_stats(rows: &[TransactionRow], initial_balance: f64, today: Date) -> DashboardStats {
    let month = transaction_totals(
        current_month_rows(rows, today)
            .into_iter()
            .map(|row| &row.transaction),
    );
    let all_time = transaction_totals(rows.iter().map(|row| &row.transaction));

    DashboardStats {
        month_income: month.income,
        month_expenses: month.expenses,
        month_savings: month.net,
        initial_balance,
        total_balance: initial_balance + all_time.net,
    }
}

/// The net flow and expenses of each month with transactions, oldest first.
pub fn balance_history(rows: &[TransactionRow]) -> Vec<BalancePoint> {
    monthly_figures(rows.iter().map(|row| &row.transaction))
        .into_iter()
        .map(|month| BalancePoint {
            label: month.label,
            balance: month.savings,
            expenses: month.expenses,
        })
        .collect()
}
