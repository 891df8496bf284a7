//! Monthly and per-category sums over an account's transactions.

use std::collections::BTreeMap;

use time::{Date, Month};

use crate::{
    category::{UNCATEGORIZED_COLOR, UNCATEGORIZED_NAME},
    transaction::{Transaction, TransactionKind, TransactionRow, transaction_totals},
};

/// How many months of history the summary shows.
pub const SUMMARY_MONTH_COUNT: usize = 12;

/// Income and expenses for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthFigures {
    /// The first day of the month.
    pub month: Date,
    /// e.g. "Jan 25"
    pub label: String,
    pub income: f64,
    pub expenses: f64,
    /// `income - expenses`
    pub savings: f64,
}

/// The expenses of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryExpense {
    pub name: String,
    pub color: String,
    pub total: f64,
    /// Share of all expenses, from 0 to 100.
    pub percentage: f64,
}

/// Totals over every transaction of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryTotals {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    /// `savings / income` as a percentage, zero without income.
    pub savings_rate: f64,
}

pub fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// A short month label with a two digit year, e.g. "Jan 25".
pub fn month_label(date: Date) -> String {
    format!(
        "{} {:02}",
        month_abbreviation(date.month()),
        date.year().rem_euclid(100)
    )
}

/// Sum `transactions` per calendar month, oldest month first.
///
/// Only months with at least one transaction are included.
pub fn monthly_figures<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<MonthFigures> {
    let mut months: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let (income, expenses) = months.entry(first_of_month(transaction.date)).or_default();
        match transaction.kind {
            TransactionKind::Income => *income += transaction.amount,
            TransactionKind::Expense => *expenses += transaction.amount,
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expenses))| MonthFigures {
            month,
            label: month_label(month),
            income,
            expenses,
            savings: income - expenses,
        })
        .collect()
}

/// Keep the last `count` months of `figures`.
pub fn latest_months(mut figures: Vec<MonthFigures>, count: usize) -> Vec<MonthFigures> {
    figures.split_off(figures.len().saturating_sub(count))
}

/// Sum the expenses in `rows` per category, largest first.
///
/// Uncategorized expenses are grouped under "Other".
pub fn expenses_by_category<'a>(
    rows: impl IntoIterator<Item = &'a TransactionRow>,
) -> Vec<CategoryExpense> {
    let mut categories: Vec<CategoryExpense> = Vec::new();
    let mut total_expenses = 0.0;

    for row in rows {
        if row.transaction.kind != TransactionKind::Expense {
            continue;
        }

        let name = row.category_name.as_deref().unwrap_or(UNCATEGORIZED_NAME);
        let amount = row.transaction.amount;
        total_expenses += amount;

        match categories.iter_mut().find(|category| category.name == name) {
            Some(category) => category.total += amount,
            None => categories.push(CategoryExpense {
                name: name.to_owned(),
                color: row
                    .category_color
                    .clone()
                    .unwrap_or_else(|| UNCATEGORIZED_COLOR.to_owned()),
                total: amount,
                percentage: 0.0,
            }),
        }
    }

    for category in &mut categories {
        category.percentage = if total_expenses > 0.0 {
            category.total / total_expenses * 100.0
        } else {
            0.0
        };
    }
    categories.sort_by(|a, b| b.total.total_cmp(&a.total));

    categories
}

pub fn summary_totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> SummaryTotals {
    let totals = transaction_totals(transactions);
    let savings_rate = if totals.income > 0.0 {
        totals.net / totals.income * 100.0
    } else {
        0.0
    };

    SummaryTotals {
        income: totals.income,
        expenses: totals.expenses,
        savings: totals.net,
        savings_rate,
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};
    use uuid::Uuid;

    use crate::{
        auth::UserID,
        transaction::{Transaction, TransactionKind, TransactionRow},
    };

    use super::{
        SummaryTotals, expenses_by_category, latest_months, month_label, monthly_figures,
        summary_totals,
    };

    fn row(amount: f64, kind: TransactionKind, date: Date, category: Option<&str>) -> TransactionRow {
        TransactionRow {
            transaction: Transaction {
                id: Uuid::new_v4(),
                user_id: UserID::new(1),
                account_id: Uuid::nil(),
                amount,
                kind,
                date,
                category_id: None,
                description: None,
                budget_item_id: None,
            },
            category_name: category.map(str::to_owned),
            category_color: category.map(|_| "#22c55e".to_owned()),
            category_icon: None,
        }
    }

    #[test]
    fn labels_use_short_month_and_two_digit_year() {
        assert_eq!(month_label(date!(2025 - 01 - 01)), "Jan 25");
        assert_eq!(month_label(date!(2009 - 12 - 01)), "Dec 09");
    }

    #[test]
    fn buckets_by_calendar_month() {
        let rows = [
            row(100.0, TransactionKind::Income, date!(2025 - 01 - 31), None),
            row(30.0, TransactionKind::Expense, date!(2025 - 01 - 01), None),
            row(20.0, TransactionKind::Expense, date!(2025 - 02 - 01), None),
        ];

        let months = monthly_figures(rows.iter().map(|row| &row.transaction));

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label, "Jan 25");
        assert_eq!(months[0].income, 100.0);
        assert_eq!(months[0].expenses, 30.0);
        assert_eq!(months[0].savings, 70.0);
        assert_eq!(months[1].label, "Feb 25");
        assert_eq!(months[1].savings, -20.0);
    }

    #[test]
    fn keeps_only_latest_months() {
        let rows: Vec<_> = (1u8..=14)
            .map(|month| {
                let year = if month > 12 { 2025 } else { 2024 };
                let month = (month - 1) % 12 + 1;
                let date = Date::from_calendar_date(year, month.try_into().unwrap(), 15).unwrap();
                row(10.0, TransactionKind::Expense, date, None)
            })
            .collect();

        let months = latest_months(monthly_figures(rows.iter().map(|row| &row.transaction)), 12);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].label, "Mar 24");
        assert_eq!(months[11].label, "Feb 25");
    }

    #[test]
    fn category_expenses_group_other_and_sort_descending() {
        let rows = [
            row(10.0, TransactionKind::Expense, date!(2025 - 01 - 02), None),
            row(60.0, TransactionKind::Expense, date!(2025 - 01 - 03), Some("Food")),
            row(30.0, TransactionKind::Expense, date!(2025 - 01 - 04), None),
            row(500.0, TransactionKind::Income, date!(2025 - 01 - 05), Some("Salary")),
        ];

        let categories = expenses_by_category(&rows);

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Food");
        assert_eq!(categories[0].percentage, 60.0);
        assert_eq!(categories[1].name, "Other");
        assert_eq!(categories[1].color, "#94a3b8");
        assert_eq!(categories[1].total, 40.0);
        assert_eq!(categories[1].percentage, 40.0);
    }

    #[test]
    fn savings_rate_is_zero_without_income() {
        let rows = [row(25.0, TransactionKind::Expense, date!(2025 - 01 - 02), None)];

        let totals = summary_totals(rows.iter().map(|row| &row.transaction));

        assert_eq!(
            totals,
            SummaryTotals {
                income: 0.0,
                expenses: 25.0,
                savings: -25.0,
                savings_rate: 0.0,
            }
        );
    }

    #[test]
    fn savings_rate_is_share_of_income() {
        let rows = [
            row(2000.0, TransactionKind::Income, date!(2025 - 01 - 01), None),
            row(1500.0, TransactionKind::Expense, date!(2025 - 01 - 02), None),
        ];

        let totals = summary_totals(rows.iter().map(|row| &row.transaction));

        assert_eq!(totals.savings, 500.0);
        assert_eq!(totals.savings_rate, 25.0);
    }
}
