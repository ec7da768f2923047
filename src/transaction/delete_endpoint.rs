use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error, database_id::TransactionId, transaction::core::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The confirmation sent after a record is deleted.
#[derive(Debug, Serialize, PartialEq)]
pub struct DeletedMessage {
    message: &'static str,
}

impl DeletedMessage {
    pub(crate) fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// A route handler for deleting a transaction, responds with a confirmation message.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Json<DeletedMessage>, Error> {
    let Path(transaction_id) = transaction_id?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, &connection)
        .inspect_err(|error| tracing::error!("Could not delete transaction {transaction_id}: {error}"))?;

    Ok(Json(DeletedMessage::new("Transaction deleted successfully")))
}
