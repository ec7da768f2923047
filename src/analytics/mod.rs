//! Derived views over the stored transactions and budgets.
//!
//! Everything in this module is computed on demand from the full transaction
//! and budget lists and never persisted. The functions are pure, they never
//! fail and empty input yields zero sums and empty groupings.

mod budget_comparison;
mod distribution;
mod endpoint;
mod insights;
mod monthly;
mod summary;

use serde::Serialize;

use crate::{
    budget::Budget,
    category::Category,
    month::YearMonth,
    transaction::{Transaction, TransactionType},
};

pub use budget_comparison::{BudgetComparison, compare_budgets};
pub use distribution::{CategoryDistribution, category_distribution};
pub use endpoint::get_analytics_endpoint;
pub(crate) use endpoint::load_derived_views;
pub use insights::{Insight, Insights, Warning, generate_insights};
pub use monthly::{MonthlySeries, monthly_series};
pub use summary::{Summary, summarize};

/// Every derived view for one target month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedViews {
    /// The month the budget comparison and insights are for.
    pub month: YearMonth,
    /// Totals over all transactions.
    pub summary: Summary,
    /// Expense totals per month of `current_year`.
    pub monthly: MonthlySeries,
    /// Expense totals per category over all transactions.
    pub distribution: CategoryDistribution,
    /// Budgeted against actual spending for `month`.
    pub budget_comparison: BudgetComparison,
    /// Warnings, insights and recommendations for `month`.
    pub insights: Insights,
    /// Whether any budget exists for `month`.
    pub has_budgets: bool,
}

impl DerivedViews {
    /// Compute all derived views.
    ///
    /// `transactions` should be ordered newest first, the summary takes its
    /// recent transactions from the front of the list. Budgets for months other
    /// than `month` are ignored.
    pub fn compute(
        transactions: &[Transaction],
        budgets: &[Budget],
        month: YearMonth,
        current_year: i32,
    ) -> Self {
        let month_budgets: Vec<Budget> = budgets
            .iter()
            .filter(|budget| budget.month == month)
            .cloned()
            .collect();

        Self {
            month,
            summary: summarize(transactions),
            monthly: monthly_series(transactions, current_year),
            distribution: category_distribution(transactions),
            budget_comparison: compare_budgets(transactions, &month_budgets, month),
            insights: generate_insights(transactions, &month_budgets, month),
            has_budgets: !month_budgets.is_empty(),
        }
    }
}

/// Round to two decimal places, with halves rounded away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The sum and number of transactions per category, in the order each
/// category is first seen.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CategoryTotal {
    category: Category,
    amount: f64,
    count: usize,
}

fn total_by_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        match totals
            .iter_mut()
            .find(|total| total.category == transaction.category)
        {
            Some(total) => {
                total.amount += transaction.amount;
                total.count += 1;
            }
            None => totals.push(CategoryTotal {
                category: transaction.category,
                amount: transaction.amount,
                count: 1,
            }),
        }
    }

    totals
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Expense)
}

fn expenses_in(month: YearMonth, transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    expenses(transactions).filter(move |transaction| month.contains(transaction.date))
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use time::{Date, OffsetDateTime};

    use crate::{
        budget::Budget,
        category::Category,
        month::YearMonth,
        transaction::{Transaction, TransactionType},
    };

    pub fn transaction(
        kind: TransactionType,
        amount: f64,
        date: Date,
        category: Category,
    ) -> Transaction {
        Transaction {
            id: 0,
            amount,
            description: "test".to_owned(),
            date,
            kind,
            category,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    pub fn expense(amount: f64, date: Date, category: Category) -> Transaction {
        transaction(TransactionType::Expense, amount, date, category)
    }

    pub fn income(amount: f64, date: Date) -> Transaction {
        transaction(TransactionType::Income, amount, date, Category::Salary)
    }

    pub fn budget(category: Category, amount: f64, month: YearMonth) -> Budget {
        Budget {
            id: 0,
            category,
            amount,
            month,
            year: month.year(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}
