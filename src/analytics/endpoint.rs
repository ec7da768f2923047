//! Serves the derived views as JSON.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    analytics::DerivedViews,
    budget::{BudgetFilter, get_budgets},
    month::YearMonth,
    timezone::local_today,
    transaction::get_transactions,
};

/// The state needed to compute the derived views.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The month to analyse, defaults to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// A month in YYYY-MM format.
    pub month: Option<String>,
}

/// A route handler that responds with every derived view for a month.
pub async fn get_analytics_endpoint(
    State(state): State<AnalyticsState>,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> Result<Json<DerivedViews>, Error> {
    let Query(query) = query?;
    let today = local_today(&state.local_timezone)?;
    let month = match query.month {
        Some(month) => month.parse()?,
        None => YearMonth::from_date(today),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    load_derived_views(&connection, month, today.year()).map(Json)
}

/// Read all transactions and the budgets for `month` and compute the derived
/// views over them.
///
/// Both lists are read under the same lock so the views are consistent.
///
/// # Errors
/// Returns an error if the transactions or budgets cannot be read.
pub(crate) fn load_derived_views(
    connection: &Connection,
    month: YearMonth,
    current_year: i32,
) -> Result<DerivedViews, Error> {
    let transactions = get_transactions(None, connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let budgets = get_budgets(BudgetFilter::Month(month), connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;

    Ok(DerivedViews::compute(
        &transactions,
        &budgets,
        month,
        current_year,
    ))
}
