use serde::Serialize;

use crate::{
    analytics::{expenses, round2, total_by_category},
    category::Category,
    transaction::Transaction,
};

/// One slice of the spending pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// The category spent on.
    pub category: Category,
    /// The category's hex color.
    pub color: &'static str,
    /// The sum of expenses in the category, rounded to cents.
    pub amount: f64,
}

/// Expense totals per category, largest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    /// One entry per category with at least one expense.
    pub entries: Vec<CategoryShare>,
    /// The sum of the rounded entry amounts.
    pub total: f64,
}

/// Group every expense in `transactions` by category.
///
/// Categories with equal totals keep the order they were first seen in.
pub fn category_distribution(transactions: &[Transaction]) -> CategoryDistribution {
    let mut entries: Vec<CategoryShare> = total_by_category(expenses(transactions))
        .into_iter()
        .map(|total| CategoryShare {
            category: total.category,
            color: total.category.color(),
            amount: round2(total.amount),
        })
        .collect();
    entries.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let total = entries.iter().map(|entry| entry.amount).sum();

    CategoryDistribution { entries, total }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        analytics::{
            summarize,
            test_fixtures::{expense, income},
        },
        category::Category,
    };

    use super::category_distribution;

    #[test]
    fn groups_expenses_largest_first() {
        let transactions = [
            expense(12.0, date!(2024 - 01 - 01), Category::Transportation),
            expense(40.0, date!(2024 - 01 - 02), Category::FoodAndDining),
            expense(25.5, date!(2024 - 02 - 03), Category::FoodAndDining),
            expense(70.0, date!(2023 - 06 - 04), Category::Housing),
            income(900.0, date!(2024 - 01 - 05)),
        ];

        let distribution = category_distribution(&transactions);

        let entries: Vec<_> = distribution
            .entries
            .iter()
            .map(|entry| (entry.category, entry.amount))
            .collect();
        assert_eq!(
            entries,
            [
                (Category::Housing, 70.0),
                (Category::FoodAndDining, 65.5),
                (Category::Transportation, 12.0),
            ]
        );
        assert_eq!(distribution.total, 147.5);
    }

    #[test]
    fn entries_carry_registry_color() {
        let transactions = [expense(1.0, date!(2024 - 01 - 01), Category::Travel)];

        let distribution = category_distribution(&transactions);

        assert_eq!(distribution.entries[0].color, Category::Travel.color());
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let transactions = [
            expense(10.0, date!(2024 - 01 - 01), Category::Shopping),
            expense(10.0, date!(2024 - 01 - 02), Category::Education),
        ];

        let distribution = category_distribution(&transactions);

        assert_eq!(distribution.entries[0].category, Category::Shopping);
        assert_eq!(distribution.entries[1].category, Category::Education);
    }

    #[test]
    fn total_matches_expense_total() {
        let transactions = [
            expense(10.333, date!(2024 - 01 - 01), Category::Shopping),
            expense(20.667, date!(2024 - 01 - 02), Category::Education),
            expense(0.004, date!(2024 - 01 - 03), Category::Other),
        ];

        let distribution = category_distribution(&transactions);
        let summary = summarize(&transactions);

        assert!((distribution.total - summary.total_expenses).abs() <= 0.01);
    }
}
