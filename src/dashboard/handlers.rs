//! Dashboard HTTP handlers and view rendering.

use axum::{
    extract::{FromRef, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error,
    analytics::{DerivedViews, load_derived_views},
    dashboard::{
        cards::{recent_transactions_view, summary_cards_view},
        charts::{
            DashboardChart, budget_chart, category_chart, charts_script, charts_view,
            monthly_expenses_chart,
        },
        insights::{budget_totals_view, insights_view},
    },
    endpoints,
    html::{BUTTON_SECONDARY_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, link},
    month::YearMonth,
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The month shown on the dashboard, defaults to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// A month in YYYY-MM format.
    pub month: Option<String>,
}

/// Display a page with an overview of the user's finances for a month.
///
/// An invalid month redirects to the current month. If the database cannot
/// be reached the page is still rendered, with a banner in place of the data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query.inspect_err(|rejection| {
        tracing::warn!("invalid dashboard query: {}", rejection.body_text())
    }) else {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    };

    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_html_response(),
    };

    let month = match query.month.as_deref().map(str::parse::<YearMonth>) {
        None => YearMonth::from_date(today),
        Some(Ok(month)) => month,
        Some(Err(error)) => {
            tracing::warn!("invalid dashboard month {:?}: {error}", query.month);
            return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
        }
    };

    match load_dashboard_views(&state.db_connection, month, today.year()) {
        Ok(views) => dashboard_view(&views).into_response(),
        Err(error) if error.is_store_unavailable() => (
            StatusCode::INTERNAL_SERVER_ERROR,
            store_unavailable_view(month),
        )
            .into_response(),
        Err(error) => error.into_html_response(),
    }
}

fn load_dashboard_views(
    db_connection: &Mutex<Connection>,
    month: YearMonth,
    current_year: i32,
) -> Result<DerivedViews, Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    load_derived_views(&connection, month, current_year)
}

fn dashboard_url(month: YearMonth) -> String {
    format!("{}?month={month}", endpoints::DASHBOARD_VIEW)
}

fn month_navigation(month: YearMonth) -> Markup {
    html! {
        nav id="month-navigation" class="w-full flex justify-between items-center mb-4"
        {
            a id="previous-month" href=(dashboard_url(month.previous())) class=(BUTTON_SECONDARY_STYLE)
            {
                "← " (month.previous())
            }

            span class="text-lg font-semibold" { (month) }

            a id="next-month" href=(dashboard_url(month.next())) class=(BUTTON_SECONDARY_STYLE)
            {
                (month.next()) " →"
            }
        }
    }
}

fn build_dashboard_charts(views: &DerivedViews) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "monthly-expenses-chart",
            options: monthly_expenses_chart(&views.monthly).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(&views.distribution).to_string(),
        },
        DashboardChart {
            id: "budget-chart",
            options: budget_chart(&views.budget_comparison, views.month).to_string(),
        },
    ]
}

fn dashboard_view(views: &DerivedViews) -> Markup {
    let charts = build_dashboard_charts(views);

    let content = html!(
        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h1 class="text-2xl font-bold mb-4 self-start" { "Dashboard" }

            (month_navigation(views.month))
            (summary_cards_view(&views.summary))
            (charts_view(&charts))

            @if views.has_budgets {
                (budget_totals_view(&views.budget_comparison))
            }

            (insights_view(&views.insights, views.month, views.has_budgets))
            (recent_transactions_view(&views.summary.recent))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

fn store_unavailable_view(month: YearMonth) -> Markup {
    let retry_link = link(&dashboard_url(month), "Retry");

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4 self-start" { "Dashboard" }

            div
                id="store-unavailable"
                role="alert"
                class="w-full p-4 mb-4 text-red-800 border border-red-300 rounded-lg
                    bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                p class="font-semibold" { "Could not reach the database" }
                p class="text-sm"
                {
                    "Your transactions and budgets could not be loaded. "
                    (retry_link)
                }
            }

            (month_navigation(month))
        }
    );

    base("Dashboard", &[], &content)
}
