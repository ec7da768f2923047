//! Rule based feedback on a month of spending.
//!
//! Each budget for the month is checked against fixed thresholds on how much
//! of it has been spent:
//! - more than 100%: an `over-budget` warning
//! - more than 80%: a `near-budget` warning
//! - less than 50% with some spending: an `under-budget` insight
//!
//! The month as a whole also produces a `frequent-category` insight, a
//! `high-average` recommendation when the average expense is over $100 and a
//! `monthly-change` insight when spending moved more than 20% from the
//! previous month.

use serde::Serialize;

use crate::{
    analytics::{expenses_in, total_by_category},
    budget::Budget,
    category::Category,
    month::YearMonth,
    transaction::Transaction,
};

const OVER_BUDGET_PERCENTAGE: f64 = 100.0;
const NEAR_BUDGET_PERCENTAGE: f64 = 80.0;
const UNDER_BUDGET_PERCENTAGE: f64 = 50.0;
const HIGH_AVERAGE_AMOUNT: f64 = 100.0;
const SIGNIFICANT_CHANGE_PERCENTAGE: f64 = 20.0;
const NOTABLE_CHANGE_PERCENTAGE: f64 = 5.0;

/// A budget that has been, or is about to be, exceeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Warning {
    /// More than the whole budget has been spent.
    OverBudget {
        /// The budgeted category.
        category: Category,
        /// A description for the user.
        message: String,
        /// How much has been spent past the budget.
        amount: f64,
    },
    /// More than 80% of the budget has been spent.
    NearBudget {
        /// The budgeted category.
        category: Category,
        /// A description for the user.
        message: String,
        /// How much of the budget is left.
        amount: f64,
    },
}

impl Warning {
    /// The description for the user.
    pub fn message(&self) -> &str {
        match self {
            Warning::OverBudget { message, .. } | Warning::NearBudget { message, .. } => message,
        }
    }
}

/// An observation about the month's spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Insight {
    /// Less than half of a budget has been spent.
    UnderBudget {
        /// The budgeted category.
        category: Category,
        /// A description for the user.
        message: String,
        /// How much of the budget is left.
        amount: f64,
    },
    /// The category with the most expenses in the month.
    FrequentCategory {
        /// The most frequent category.
        category: Category,
        /// A description for the user.
        message: String,
        /// The number of expenses in the category.
        count: usize,
    },
    /// Spending changed a lot from the previous month.
    MonthlyChange {
        /// A description for the user.
        message: String,
        /// This month's total minus last month's.
        change: f64,
    },
}

impl Insight {
    /// The description for the user.
    pub fn message(&self) -> &str {
        match self {
            Insight::UnderBudget { message, .. }
            | Insight::FrequentCategory { message, .. }
            | Insight::MonthlyChange { message, .. } => message,
        }
    }
}

/// A suggestion for changing spending habits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Recommendation {
    /// The average expense is large.
    HighAverage {
        /// A description for the user.
        message: String,
        /// The average expense amount in the month.
        average: f64,
    },
}

impl Recommendation {
    /// The description for the user.
    pub fn message(&self) -> &str {
        match self {
            Recommendation::HighAverage { message, .. } => message,
        }
    }
}

/// Total expenses for a month compared with the month before.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthComparison {
    /// The sum of expenses in the target month.
    pub current_total: f64,
    /// The sum of expenses in the previous month.
    pub previous_total: f64,
    /// `current_total - previous_total`.
    pub change: f64,
    /// `change` as a percentage of `previous_total`, zero if nothing was
    /// spent in the previous month.
    pub change_percentage: f64,
}

impl MonthComparison {
    fn new(current_total: f64, previous_total: f64) -> Self {
        let change = current_total - previous_total;
        let change_percentage = if previous_total > 0.0 {
            change / previous_total * 100.0
        } else {
            0.0
        };

        Self {
            current_total,
            previous_total,
            change,
            change_percentage,
        }
    }

    /// Whether the change is large enough to produce a `monthly-change` insight.
    pub fn is_significant(&self) -> bool {
        self.change_percentage.abs() > SIGNIFICANT_CHANGE_PERCENTAGE
    }

    /// Whether the change is large enough to be pointed out on the dashboard.
    pub fn is_notable(&self) -> bool {
        self.change_percentage.abs() > NOTABLE_CHANGE_PERCENTAGE
    }

    /// "increased" or "decreased".
    pub fn direction(&self) -> &'static str {
        if self.change > 0.0 {
            "increased"
        } else {
            "decreased"
        }
    }
}

/// Everything [generate_insights] found for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// Budgets that are exceeded or close to it, in budget order.
    pub warnings: Vec<Warning>,
    /// Observations, budget based ones first.
    pub insights: Vec<Insight>,
    /// Suggestions.
    pub recommendations: Vec<Recommendation>,
    /// The month's expenses against the previous month's.
    pub comparison: MonthComparison,
}

impl Insights {
    /// Whether there are no warnings, insights or recommendations.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.insights.is_empty() && self.recommendations.is_empty()
    }
}

/// Check the expenses in `month` against `budgets`.
///
/// `budgets` should all be for `month` and are checked in the order given.
pub fn generate_insights(
    transactions: &[Transaction],
    budgets: &[Budget],
    month: YearMonth,
) -> Insights {
    let spending = total_by_category(expenses_in(month, transactions));
    let mut warnings = Vec::new();
    let mut insights = Vec::new();
    let mut recommendations = Vec::new();

    for budget in budgets {
        let actual = spending
            .iter()
            .find(|total| total.category == budget.category)
            .map(|total| total.amount)
            .unwrap_or(0.0);
        let percentage = if budget.amount > 0.0 {
            actual / budget.amount * 100.0
        } else {
            0.0
        };
        let remaining = budget.amount - actual;
        let category = budget.category;

        if percentage > OVER_BUDGET_PERCENTAGE {
            warnings.push(Warning::OverBudget {
                category,
                message: format!(
                    "You've exceeded your {category} budget by {}%",
                    (percentage - 100.0).round() as i64
                ),
                amount: remaining.abs(),
            });
        } else if percentage > NEAR_BUDGET_PERCENTAGE {
            warnings.push(Warning::NearBudget {
                category,
                message: format!(
                    "You're close to your {category} budget limit ({}%)",
                    percentage.round() as i64
                ),
                amount: remaining,
            });
        } else if percentage < UNDER_BUDGET_PERCENTAGE && actual > 0.0 {
            insights.push(Insight::UnderBudget {
                category,
                message: format!("Great job staying under budget for {category}!"),
                amount: remaining,
            });
        }
    }

    let current_total: f64 = spending.iter().map(|total| total.amount).sum();
    let expense_count: usize = spending.iter().map(|total| total.count).sum();
    let average = if expense_count == 0 {
        0.0
    } else {
        current_total / expense_count as f64
    };

    if average > HIGH_AVERAGE_AMOUNT {
        recommendations.push(Recommendation::HighAverage {
            message: format!(
                "Your average transaction is ${average:.2}. Consider smaller, more frequent purchases."
            ),
            average,
        });
    }

    // Stable sort so ties go to the category seen first.
    let mut by_count = spending.clone();
    by_count.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(most_frequent) = by_count.first() {
        insights.push(Insight::FrequentCategory {
            category: most_frequent.category,
            message: format!(
                "{} is your most frequent spending category ({} transactions)",
                most_frequent.category, most_frequent.count
            ),
            count: most_frequent.count,
        });
    }

    let previous_total: f64 = expenses_in(month.previous(), transactions)
        .map(|transaction| transaction.amount)
        .sum();
    let comparison = MonthComparison::new(current_total, previous_total);

    if comparison.is_significant() {
        insights.push(Insight::MonthlyChange {
            message: format!(
                "Your spending {} by {:.1}% compared to last month",
                comparison.direction(),
                comparison.change_percentage.abs()
            ),
            change: comparison.change,
        });
    }

    Insights {
        warnings,
        insights,
        recommendations,
        comparison,
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{
        analytics::test_fixtures::{budget, expense, income},
        category::Category,
        month::YearMonth,
    };

    use super::{Insight, MonthComparison, Recommendation, Warning, generate_insights};

    const JANUARY: YearMonth = YearMonth::new(2024, Month::January);

    #[test]
    fn spending_under_half_the_budget_is_praised() {
        let budgets = [budget(Category::FoodAndDining, 200.0, JANUARY)];
        let transactions = [
            expense(50.0, date!(2024 - 01 - 05), Category::FoodAndDining),
            expense(30.0, date!(2024 - 01 - 10), Category::FoodAndDining),
        ];

        let result = generate_insights(&transactions, &budgets, JANUARY);

        assert!(result.warnings.is_empty());
        assert_eq!(
            result.insights[0],
            Insight::UnderBudget {
                category: Category::FoodAndDining,
                message: "Great job staying under budget for Food & Dining!".to_owned(),
                amount: 120.0,
            }
        );
    }

    #[test]
    fn spending_over_the_budget_is_a_warning() {
        let budgets = [budget(Category::FoodAndDining, 200.0, JANUARY)];
        let transactions = [expense(250.0, date!(2024 - 01 - 05), Category::FoodAndDining)];

        let result = generate_insights(&transactions, &budgets, JANUARY);

        assert_eq!(
            result.warnings,
            [Warning::OverBudget {
                category: Category::FoodAndDining,
                message: "You've exceeded your Food & Dining budget by 25%".to_owned(),
                amount: 50.0,
            }]
        );
    }

    #[test]
    fn spending_most_of_the_budget_is_a_warning() {
        let budgets = [budget(Category::Utilities, 100.0, JANUARY)];
        let transactions = [expense(85.0, date!(2024 - 01 - 05), Category::Utilities)];

        let result = generate_insights(&transactions, &budgets, JANUARY);

        assert_eq!(
            result.warnings,
            [Warning::NearBudget {
                category: Category::Utilities,
                message: "You're close to your Utilities budget limit (85%)".to_owned(),
                amount: 15.0,
            }]
        );
    }

    #[test]
    fn spending_exactly_the_budget_is_near_not_over() {
        let budgets = [budget(Category::Utilities, 100.0, JANUARY)];
        let transactions = [expense(100.0, date!(2024 - 01 - 05), Category::Utilities)];

        let result = generate_insights(&transactions, &budgets, JANUARY);

        assert!(matches!(result.warnings[..], [Warning::NearBudget { .. }]));
    }

    #[test]
    fn spending_exactly_eighty_percent_is_not_near() {
        let budgets = [budget(Category::Utilities, 100.0, JANUARY)];
        let transactions = [expense(80.0, date!(2024 - 01 - 05), Category::Utilities)];

        let result = generate_insights(&transactions, &budgets, JANUARY);

        assert!(result.warnings.is_empty(), "got {:?}", result.warnings);
    }

    #[test]
    fn spending_exactly_half_is_not_praised() {
        let budgets = [budget(Category::Utilities, 100.0, JANUARY)];
        let transactions = [expense(50.0, date!(2024 - 01 - 05), Category::Utilities)];

        let result = generate_insights(&transactions, &budgets, JANUARY);

        assert!(result.warnings.is_empty());
        assert!(
            !result
                .insights
                .iter()
                .any(|insight| matches!(insight, Insight::UnderBudget { .. })),
            "got {:?}",
            result.insights
        );
    }

    #[test]
    fn untouched_budget_produces_nothing() {
        let budgets = [budget(Category::Education, 100.0, JANUARY)];

        let result = generate_insights(&[], &budgets, JANUARY);

        assert!(result.is_empty());
        assert_eq!(result.comparison.change_percentage, 0.0);
    }

    #[test]
    fn warnings_follow_budget_order() {
        let budgets = [
            budget(Category::Travel, 100.0, JANUARY),
            budget(Category::Shopping, 100.0, JANUARY),
        ];
        let transactions = [
            expense(90.0, date!(2024 - 01 - 02), Category::Travel),
            expense(150.0, date!(2024 - 01 - 03), Category::Shopping),
        ];

        let result = generate_insights(&transactions, &budgets, JANUARY);

        let categories: Vec<_> = result
            .warnings
            .iter()
            .map(|warning| match warning {
                Warning::OverBudget { category, .. } | Warning::NearBudget { category, .. } => {
                    *category
                }
            })
            .collect();
        assert_eq!(categories, [Category::Travel, Category::Shopping]);
    }

    #[test]
    fn high_average_expense_is_recommendation() {
        let transactions = [
            expense(150.0, date!(2024 - 01 - 02), Category::Housing),
            expense(100.5, date!(2024 - 01 - 03), Category::Housing),
            income(5000.0, date!(2024 - 01 - 01)),
        ];

        let result = generate_insights(&transactions, &[], JANUARY);

        assert_eq!(
            result.recommendations,
            [Recommendation::HighAverage {
                message: "Your average transaction is $125.25. Consider smaller, more frequent purchases."
                    .to_owned(),
                average: 125.25,
            }]
        );
    }

    #[test]
    fn average_of_exactly_one_hundred_is_not_high() {
        let transactions = [expense(100.0, date!(2024 - 01 - 02), Category::Housing)];

        let result = generate_insights(&transactions, &[], JANUARY);

        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn most_frequent_category_ties_go_to_first_seen() {
        let transactions = [
            expense(5.0, date!(2024 - 01 - 02), Category::Transportation),
            expense(5.0, date!(2024 - 01 - 03), Category::FoodAndDining),
            expense(5.0, date!(2024 - 01 - 04), Category::FoodAndDining),
            expense(5.0, date!(2024 - 01 - 05), Category::Transportation),
            expense(5.0, date!(2024 - 02 - 05), Category::FoodAndDining),
        ];

        let result = generate_insights(&transactions, &[], JANUARY);

        assert_eq!(
            result.insights,
            [Insight::FrequentCategory {
                category: Category::Transportation,
                message: "Transportation is your most frequent spending category (2 transactions)"
                    .to_owned(),
                count: 2,
            }]
        );
    }

    #[test]
    fn large_increase_from_last_month_is_insight() {
        let transactions = [
            expense(60.0, date!(2023 - 12 - 10), Category::Other),
            expense(90.0, date!(2024 - 01 - 10), Category::Other),
        ];

        let result = generate_insights(&transactions, &[], JANUARY);

        assert_eq!(result.comparison.previous_total, 60.0);
        assert_eq!(result.comparison.change, 30.0);
        assert_eq!(
            result.insights.last(),
            Some(&Insight::MonthlyChange {
                message: "Your spending increased by 50.0% compared to last month".to_owned(),
                change: 30.0,
            })
        );
    }

    #[test]
    fn large_decrease_from_last_month_is_insight() {
        let transactions = [
            expense(80.0, date!(2023 - 12 - 10), Category::Other),
            expense(20.0, date!(2024 - 01 - 10), Category::Other),
        ];

        let result = generate_insights(&transactions, &[], JANUARY);

        assert_eq!(
            result.insights.last().map(Insight::message),
            Some("Your spending decreased by 75.0% compared to last month")
        );
    }

    #[test]
    fn change_thresholds_are_independent() {
        let small = MonthComparison::new(103.0, 100.0);
        let notable = MonthComparison::new(110.0, 100.0);
        let significant = MonthComparison::new(130.0, 100.0);

        assert!(!small.is_notable() && !small.is_significant());
        assert!(notable.is_notable() && !notable.is_significant());
        assert!(significant.is_notable() && significant.is_significant());
    }

    #[test]
    fn no_spending_last_month_is_no_change() {
        let comparison = MonthComparison::new(500.0, 0.0);

        assert_eq!(comparison.change, 500.0);
        assert_eq!(comparison.change_percentage, 0.0);
        assert!(!comparison.is_notable());
    }
}
