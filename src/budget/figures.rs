//! Totals shown at the top of the budget page.

use std::collections::HashSet;

use crate::budget::{BudgetItem, Frequency};

/// The budget totals for a list of items. Only active items count towards
/// the amounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetFigures {
    /// What the active items cost per month, with yearly items spread over twelve months.
    pub monthly_budget: f64,
    /// What the active items cost per year.
    pub annual_budget: f64,
    /// The sum of the active monthly items.
    pub monthly_items_total: f64,
    /// The sum of the active yearly items.
    pub yearly_items_total: f64,
    pub active_count: usize,
    /// The number of distinct goals that items save towards.
    pub linked_goal_count: usize,
}

pub fn budget_figures(items: &[BudgetItem]) -> BudgetFigures {
    let mut figures = BudgetFigures::default();

    for item in items.iter().filter(|item| item.active) {
        figures.active_count += 1;
        figures.monthly_budget += item.frequency.monthly_amount(item.amount);
        figures.annual_budget += item.frequency.annual_amount(item.amount);

        match item.frequency {
            Frequency::Monthly => figures.monthly_items_total += item.amount,
            Frequency::Yearly => figures.yearly_items_total += item.amount,
        }
    }

    figures.linked_goal_count = items
        .iter()
        .filter_map(|item| item.goal_id)
        .collect::<HashSet<_>>()
        .len();

    figures
}
