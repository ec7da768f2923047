//! Defines the endpoint for creating a new budget.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{Budget, core::create_budget, form::BudgetPayload},
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new budget, responds with the stored budget
/// and 201 Created on success or 409 Conflict if the category already has a
/// budget for the month.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    payload: Result<Json<BudgetPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let Json(payload) = payload?;
    let builder = payload.into_builder()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = create_budget(builder, &connection)
        .inspect_err(|error| tracing::error!("could not create budget: {error}"))?;

    Ok((StatusCode::CREATED, Json(budget)))
}
