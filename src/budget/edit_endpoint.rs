//! Defines the endpoint for updating a budget.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{
        Budget,
        core::{get_budget, update_budget},
        form::BudgetPayload,
    },
    database_id::BudgetId,
};

/// The state needed to edit a budget.
#[derive(Debug, Clone)]
pub struct EditBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a budget.
///
/// Fields missing from the payload keep their stored values. The year is
/// re-derived from the month.
pub async fn edit_budget_endpoint(
    State(state): State<EditBudgetState>,
    budget_id: Result<Path<BudgetId>, PathRejection>,
    payload: Result<Json<BudgetPayload>, JsonRejection>,
) -> Result<Json<Budget>, Error> {
    let Path(budget_id) = budget_id?;
    let Json(payload) = payload?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let existing = get_budget(budget_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingBudget,
        error => error,
    })?;

    let builder = payload.merge_into(&existing)?;

    update_budget(budget_id, builder, &connection)
        .inspect_err(|error| tracing::error!("Could not update budget {budget_id}: {error}"))
        .map(Json)
}
