use serde::Serialize;

use crate::transaction::{Transaction, TransactionType};

/// How many transactions the summary lists as recent.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// Income and expense totals over a list of transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// The number of transactions summarised.
    pub transaction_count: usize,
    /// The first few transactions in the order they were given.
    pub recent: Vec<Transaction>,
}

/// Summarise `transactions`.
///
/// The transactions are not sorted, so pass them newest first to get the
/// latest transactions in [Summary::recent].
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let (total_income, total_expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.kind {
                    TransactionType::Income => (income + transaction.amount, expenses),
                    TransactionType::Expense => (income, expenses + transaction.amount),
                }
            });

    Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        transaction_count: transactions.len(),
        recent: transactions
            .iter()
            .take(RECENT_TRANSACTION_COUNT)
            .cloned()
            .collect(),
    }
}
