//! The spending insights panel and the budget totals below the budget chart.

use maud::{Markup, html};

use crate::{
    analytics::{BudgetComparison, Insight, Insights, Warning},
    html::{CARD_STYLE, CARD_TITLE_STYLE, format_currency},
    month::YearMonth,
};

pub(super) fn budget_totals_view(comparison: &BudgetComparison) -> Markup {
    let remaining_style = if comparison.total_remaining < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html! {
        dl id="budget-totals" class="w-full grid grid-cols-3 gap-4 mb-4 text-center"
        {
            div
            {
                dt class="text-sm text-gray-600 dark:text-gray-400" { "Total Budget" }
                dd class="text-lg font-semibold" { (format_currency(comparison.total_budget)) }
            }
            div
            {
                dt class="text-sm text-gray-600 dark:text-gray-400" { "Total Spent" }
                dd class="text-lg font-semibold" { (format_currency(comparison.total_actual)) }
            }
            div
            {
                dt class="text-sm text-gray-600 dark:text-gray-400" { "Remaining" }
                dd class={ "text-lg font-semibold " (remaining_style) }
                {
                    (format_currency(comparison.total_remaining))
                }
            }
        }
    }
}

/// Renders the warnings, insights and recommendations for `month`.
///
/// Months without budgets get a prompt to set some up instead.
pub(super) fn insights_view(insights: &Insights, month: YearMonth, has_budgets: bool) -> Markup {
    html! {
        section id="insights" class={ "w-full mb-4 " (CARD_STYLE) }
        {
            h3 class=(CARD_TITLE_STYLE) { "Spending Insights" }

            @if !has_budgets {
                div class="text-center py-8 text-gray-500 dark:text-gray-400"
                {
                    p { "Set up budgets to get personalized insights" }
                    p class="text-sm"
                    {
                        "We'll analyze your spending patterns and provide recommendations"
                    }
                }
            } @else {
                p class="text-sm text-gray-500 dark:text-gray-400 mb-4"
                {
                    "Analysis for " (month) " · Total spent: "
                    (format_currency(insights.comparison.current_total))
                }

                @if !insights.warnings.is_empty() {
                    (warnings_view(&insights.warnings))
                }

                @if !insights.insights.is_empty() {
                    (observations_view(&insights.insights))
                }

                @if !insights.recommendations.is_empty() {
                    div id="recommendations" class="mb-4"
                    {
                        h4 class="font-semibold text-green-600 mb-2" { "Recommendations" }
                        @for recommendation in &insights.recommendations {
                            div class="p-3 mb-2 bg-green-50 border border-green-200 rounded-lg"
                            {
                                p class="text-sm text-green-800" { (recommendation.message()) }
                            }
                        }
                    }
                }

                @if insights.comparison.is_notable() {
                    div id="monthly-change" class="p-3 mb-4 bg-gray-50 border border-gray-200 rounded-lg dark:bg-gray-700"
                    {
                        p class="text-sm font-medium"
                        {
                            "Spending " (insights.comparison.direction()) " by "
                            (format!("{:.1}", insights.comparison.change_percentage.abs()))
                            "% from last month"
                        }
                        p class="text-xs text-gray-600 dark:text-gray-400"
                        {
                            @if insights.comparison.change > 0.0 { "+" }
                            (format_currency(insights.comparison.change)) " difference"
                        }
                    }
                }

                @if insights.is_empty() {
                    div id="all-clear" class="text-center py-4 text-gray-500 dark:text-gray-400"
                    {
                        p { "Great job managing your budget this month!" }
                        p class="text-sm" { "Keep up the good work with your spending habits." }
                    }
                }
            }
        }
    }
}

fn warnings_view(warnings: &[Warning]) -> Markup {
    html! {
        div id="warnings" class="mb-4"
        {
            h4 class="font-semibold text-red-600 mb-2" { "Budget Warnings" }
            @for warning in warnings {
                @let (label, amount) = match warning {
                    Warning::OverBudget { amount, .. } => ("Over budget by", amount),
                    Warning::NearBudget { amount, .. } => ("Remaining", amount),
                };
                div class="p-3 mb-2 bg-red-50 border border-red-200 rounded-lg"
                {
                    p class="text-sm text-red-800" { (warning.message()) }
                    p class="text-xs text-red-600" { (label) " " (format_currency(amount.abs())) }
                }
            }
        }
    }
}

fn observations_view(insights: &[Insight]) -> Markup {
    html! {
        div id="observations" class="mb-4"
        {
            h4 class="font-semibold text-blue-600 mb-2" { "Insights" }
            @for insight in insights {
                div class="p-3 mb-2 bg-blue-50 border border-blue-200 rounded-lg"
                {
                    p class="text-sm text-blue-800" { (insight.message()) }
                    @match insight {
                        Insight::UnderBudget { amount, .. } => {
                            p class="text-xs text-blue-600"
                            {
                                "Under budget by " (format_currency(amount.abs()))
                            }
                        }
                        Insight::MonthlyChange { change, .. } => {
                            p class="text-xs text-blue-600"
                            {
                                "Change " (format_currency(change.abs()))
                            }
                        }
                        Insight::FrequentCategory { .. } => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{Month, macros::date};

    use crate::{
        analytics::{
            compare_budgets, generate_insights,
            test_fixtures::{budget, expense},
        },
        category::Category,
        month::YearMonth,
    };

    use super::{budget_totals_view, insights_view};

    const JANUARY: YearMonth = YearMonth::new(2024, Month::January);

    #[track_caller]
    fn text_of(html: &Html, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector).next().map(|element| element.text().collect())
    }

    #[test]
    fn no_budgets_prompts_to_set_them_up() {
        let insights = generate_insights(&[], &[], JANUARY);

        let html = Html::parse_fragment(&insights_view(&insights, JANUARY, false).into_string());

        let text = text_of(&html, "#insights").unwrap();
        assert!(text.contains("Set up budgets to get personalized insights"));
        assert_eq!(text_of(&html, "#all-clear"), None);
    }

    #[test]
    fn nothing_to_report_is_all_clear() {
        let budgets = [budget(Category::Education, 100.0, JANUARY)];
        let insights = generate_insights(&[], &budgets, JANUARY);

        let html = Html::parse_fragment(&insights_view(&insights, JANUARY, true).into_string());

        assert!(
            text_of(&html, "#all-clear")
                .unwrap()
                .contains("Great job managing your budget this month!")
        );
    }

    #[test]
    fn over_budget_warning_shows_amount() {
        let budgets = [budget(Category::FoodAndDining, 200.0, JANUARY)];
        let transactions = [expense(250.0, date!(2024 - 01 - 05), Category::FoodAndDining)];
        let insights = generate_insights(&transactions, &budgets, JANUARY);

        let html = Html::parse_fragment(&insights_view(&insights, JANUARY, true).into_string());

        let warnings = text_of(&html, "#warnings").unwrap();
        assert!(warnings.contains("You've exceeded your Food & Dining budget by 25%"));
        assert!(warnings.contains("Over budget by $50.00"));
    }

    #[test]
    fn notable_change_is_shown_without_insight() {
        let budgets = [budget(Category::Other, 1000.0, JANUARY)];
        let transactions = [
            expense(100.0, date!(2023 - 12 - 10), Category::Other),
            expense(110.0, date!(2024 - 01 - 10), Category::Other),
        ];
        let insights = generate_insights(&transactions, &budgets, JANUARY);

        let html = Html::parse_fragment(&insights_view(&insights, JANUARY, true).into_string());

        let change = text_of(&html, "#monthly-change").unwrap();
        assert!(change.contains("Spending increased by 10.0% from last month"));
        assert!(change.contains("+$10.00 difference"));
        assert!(!text_of(&html, "#observations").unwrap().contains("compared to last month"));
    }

    #[test]
    fn budget_totals_show_remaining() {
        let budgets = [budget(Category::Travel, 100.0, JANUARY)];
        let transactions = [expense(130.0, date!(2024 - 01 - 05), Category::Travel)];
        let comparison = compare_budgets(&transactions, &budgets, JANUARY);

        let html = Html::parse_fragment(&budget_totals_view(&comparison).into_string());

        let totals = text_of(&html, "#budget-totals").unwrap();
        assert!(totals.contains("$100.00"));
        assert!(totals.contains("$130.00"));
        assert!(totals.contains("-$30.00"));
    }
}
