use serde::Serialize;

use crate::{
    analytics::{expenses_in, round2, total_by_category},
    budget::Budget,
    category::Category,
    month::YearMonth,
    transaction::Transaction,
};

/// Budgeted against actual spending for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparisonRow {
    /// The budgeted category.
    pub category: Category,
    /// The category's hex color.
    pub color: &'static str,
    /// The budgeted amount.
    pub budget: f64,
    /// The amount spent in the month, rounded to cents.
    pub actual: f64,
    /// `budget - actual`, negative when over budget.
    pub remaining: f64,
    /// `actual` as a percentage of `budget`, zero for a zero budget.
    pub percentage: f64,
}

/// The comparison rows for a month, biggest spending first, with totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    /// One row per budget.
    pub rows: Vec<BudgetComparisonRow>,
    /// The sum of the budgeted amounts.
    pub total_budget: f64,
    /// The sum of the actual amounts.
    pub total_actual: f64,
    /// `total_budget - total_actual`.
    pub total_remaining: f64,
}

/// Compare each of `budgets` with the expenses in `month`.
///
/// `budgets` should all be for `month`.
pub fn compare_budgets(
    transactions: &[Transaction],
    budgets: &[Budget],
    month: YearMonth,
) -> BudgetComparison {
    let spending = total_by_category(expenses_in(month, transactions));

    let mut rows: Vec<BudgetComparisonRow> = budgets
        .iter()
        .map(|budget| {
            let actual = spending
                .iter()
                .find(|total| total.category == budget.category)
                .map(|total| round2(total.amount))
                .unwrap_or(0.0);

            BudgetComparisonRow {
                category: budget.category,
                color: budget.category.color(),
                budget: budget.amount,
                actual,
                remaining: budget.amount - actual,
                percentage: percentage_of(actual, budget.amount),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.actual.total_cmp(&a.actual));

    let total_budget: f64 = rows.iter().map(|row| row.budget).sum();
    let total_actual: f64 = rows.iter().map(|row| row.actual).sum();

    BudgetComparison {
        rows,
        total_budget,
        total_actual,
        total_remaining: total_budget - total_actual,
    }
}

fn percentage_of(actual: f64, budget: f64) -> f64 {
    if budget == 0.0 {
        0.0
    } else {
        round2(actual / budget * 100.0)
    }
}
