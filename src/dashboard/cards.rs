//! Summary cards and the recent transactions list.

use maud::{Markup, html};

use crate::{
    analytics::Summary,
    html::{CARD_STYLE, CARD_TITLE_STYLE, format_currency},
    transaction::{Transaction, TransactionType},
};

/// Renders one card each for income, expenses, balance and the number of
/// transactions.
pub(super) fn summary_cards_view(summary: &Summary) -> Markup {
    let balance_style = if summary.balance < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html! {
        section
            id="summary"
            class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 mb-4"
        {
            (summary_card("total-income", "Total Income", &format_currency(summary.total_income),
                "text-green-600 dark:text-green-400"))
            (summary_card("total-expenses", "Total Expenses", &format_currency(summary.total_expenses),
                "text-red-600 dark:text-red-400"))
            (summary_card("balance", "Balance", &format_currency(summary.balance), balance_style))
            (summary_card("transaction-count", "Transactions", &summary.transaction_count.to_string(),
                "text-gray-900 dark:text-white"))
        }
    }
}

fn summary_card(id: &str, title: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p class={ "text-2xl font-bold " (value_style) } { (value) }
        }
    }
}

/// Renders the most recent transactions, or a prompt to add some.
pub(super) fn recent_transactions_view(transactions: &[Transaction]) -> Markup {
    html! {
        section id="recent-transactions" class={ "w-full mb-4 " (CARD_STYLE) }
        {
            h3 class=(CARD_TITLE_STYLE) { "Recent Transactions" }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "No transactions yet. Add one through the transactions API to get started."
                }
            } @else {
                ul class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for transaction in transactions {
                        (recent_transaction_item(transaction))
                    }
                }
            }
        }
    }
}

fn recent_transaction_item(transaction: &Transaction) -> Markup {
    let (amount, amount_style) = match transaction.kind {
        TransactionType::Income => (
            format!("+{}", format_currency(transaction.amount)),
            "text-green-600 dark:text-green-400",
        ),
        TransactionType::Expense => (
            format!("-{}", format_currency(transaction.amount)),
            "text-red-600 dark:text-red-400",
        ),
    };

    html! {
        li class="flex justify-between items-center py-2"
        {
            div class="flex items-center gap-2"
            {
                span
                    class="inline-block w-3 h-3 rounded-full"
                    style={ "background-color: " (transaction.category.color()) }
                {}

                div
                {
                    p class="font-medium" { (transaction.description) }
                    p class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (transaction.category) " · " (transaction.date)
                    }
                }
            }

            span class={ "font-semibold " (amount_style) } { (amount) }
        }
    }
}
