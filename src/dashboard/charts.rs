//! Chart generation for the dashboard.
//!
//! This module creates ECharts visualizations from the derived views:
//! - **Monthly Expenses**: expense totals for each month of the current year
//! - **Spending by Category**: a pie of expenses per category
//! - **Budget vs Actual**: budgeted and actual spending per category for the
//!   selected month
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis, EmphasisFocus,
        JsFunction, Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    analytics::{BudgetComparison, CategoryDistribution, MonthlySeries},
    html::HeadElement,
    month::YearMonth,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn monthly_expenses_chart(series: &MonthlySeries) -> Chart {
    let labels: Vec<&str> = series.months.iter().map(|bucket| bucket.month).collect();
    let values: Vec<f64> = series.months.iter().map(|bucket| bucket.amount).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Expenses")
                .subtext(format!("{}", series.year)),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Expenses").data(values))
}

pub(super) fn category_chart(distribution: &CategoryDistribution) -> Chart {
    let colors: Vec<Color> = distribution
        .entries
        .iter()
        .map(|entry| Color::from(entry.color))
        .collect();
    let data: Vec<(f64, &str)> = distribution
        .entries
        .iter()
        .map(|entry| (entry.amount, entry.category.name()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by Category").subtext("All time"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center").bottom("1%"))
        .color(colors)
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "65%"])
                .data(data),
        )
}

pub(super) fn budget_chart(comparison: &BudgetComparison, month: YearMonth) -> Chart {
    let labels: Vec<&str> = comparison
        .rows
        .iter()
        .map(|row| row.category.name())
        .collect();
    let budgets: Vec<f64> = comparison.rows.iter().map(|row| row.budget).collect();
    let actuals: Vec<f64> = comparison.rows.iter().map(|row| row.actual).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Budget vs Actual")
                .subtext(month.to_string()),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%").top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(70)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Budget")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(budgets),
        )
        .series(
            bar::Bar::new()
                .name("Actual")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(actuals),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
