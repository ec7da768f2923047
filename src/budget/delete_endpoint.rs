use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, budget::core::delete_budget, database_id::BudgetId,
    transaction::DeletedMessage,
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a budget, responds with a confirmation message.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    budget_id: Result<Path<BudgetId>, PathRejection>,
) -> Result<Json<DeletedMessage>, Error> {
    let Path(budget_id) = budget_id?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_budget(budget_id, &connection)
        .inspect_err(|error| tracing::error!("Could not delete budget {budget_id}: {error}"))?;

    Ok(Json(DeletedMessage::new("Budget deleted successfully")))
}
