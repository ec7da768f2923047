//! Defines the endpoints for listing transactions and fetching a single transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{
        Transaction,
        core::{get_transaction, get_transactions},
    },
};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct GetTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The optional `year` filter of the transaction listing.
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    year: Option<String>,
}

/// A route handler that lists transactions newest first, optionally only
/// those in the `year` query parameter.
pub async fn get_transactions_endpoint(
    State(state): State<GetTransactionsState>,
    query: Result<Query<TransactionsQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let Query(query) = query?;
    let year = query
        .year
        .map(|raw_year| {
            raw_year
                .parse::<i32>()
                .map_err(|_| Error::invalid_field("year", "Year must be a number"))
        })
        .transpose()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(year, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))
        .map(Json)
}

/// A route handler that responds with a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionsState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Json<Transaction>, Error> {
    let Path(transaction_id) = transaction_id?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction(transaction_id, &connection).map(Json)
}
