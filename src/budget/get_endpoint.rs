//! Defines the endpoints for listing budgets and fetching a single budget.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{
        Budget,
        core::{get_budget, get_budgets},
        form::BudgetsQuery,
    },
    database_id::BudgetId,
};

/// The state needed to read budgets.
#[derive(Debug, Clone)]
pub struct GetBudgetsState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists budgets ordered by category, filtered by the
/// `month` and `year` query parameters.
pub async fn get_budgets_endpoint(
    State(state): State<GetBudgetsState>,
    query: Result<Query<BudgetsQuery>, QueryRejection>,
) -> Result<Json<Vec<Budget>>, Error> {
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_budgets(filter, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))
        .map(Json)
}

/// A route handler that responds with a single budget.
pub async fn get_budget_endpoint(
    State(state): State<GetBudgetsState>,
    budget_id: Result<Path<BudgetId>, PathRejection>,
) -> Result<Json<Budget>, Error> {
    let Path(budget_id) = budget_id?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_budget(budget_id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;
    use time::Month;

    use crate::{
        budget::{Budget, create_budget},
        category::Category,
        endpoints::{self, format_endpoint},
        initialize_db,
        month::YearMonth,
    };

    use super::{GetBudgetsState, get_budget_endpoint, get_budgets_endpoint};

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("could not create in-memory SQLite database");
        initialize_db(&connection).expect("could not initialize test DB");
        for (category, month) in [
            (Category::Utilities, YearMonth::new(2024, Month::January)),
            (Category::FoodAndDining, YearMonth::new(2024, Month::January)),
            (Category::Travel, YearMonth::new(2024, Month::February)),
            (Category::Housing, YearMonth::new(2023, Month::December)),
        ] {
            create_budget(Budget::build(category, 100.0, month), &connection)
                .expect("could not create test budget");
        }

        let app = Router::new()
            .route(endpoints::BUDGETS_API, get(get_budgets_endpoint))
            .route(endpoints::BUDGET, get(get_budget_endpoint))
            .with_state(GetBudgetsState {
                db_connection: Arc::new(Mutex::new(connection)),
            });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn categories(body: &Value) -> Vec<&str> {
        body.as_array()
            .expect("want a JSON array")
            .iter()
            .filter_map(|budget| budget["category"].as_str())
            .collect()
    }

    #[tokio::test]
    async fn lists_budgets_for_month_sorted_by_category() {
        let server = get_test_server();

        let response = server
            .get(endpoints::BUDGETS_API)
            .add_query_param("month", "1")
            .add_query_param("year", "2024")
            .await;

        response.assert_status_ok();
        assert_eq!(
            categories(&response.json()),
            ["Food & Dining", "Utilities"]
        );
    }

    #[tokio::test]
    async fn lists_budgets_for_year() {
        let server = get_test_server();

        let response = server
            .get(endpoints::BUDGETS_API)
            .add_query_param("year", "2024")
            .await;

        response.assert_status_ok();
        assert_eq!(
            categories(&response.json()),
            ["Food & Dining", "Travel", "Utilities"]
        );
    }

    #[tokio::test]
    async fn rejects_malformed_month() {
        let server = get_test_server();

        let response = server
            .get(endpoints::BUDGETS_API)
            .add_query_param("month", "2024-13")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_missing_budget_is_not_found() {
        let server = get_test_server();

        let response = server.get(&format_endpoint(endpoints::BUDGET, 99)).await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
