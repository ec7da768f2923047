//! Defines the endpoint for updating a transaction.
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
    database_id::TransactionId,
    transaction::{
        Transaction,
        core::{get_transaction, update_transaction},
        form::TransactionPayload,
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a transaction.
///
/// Fields missing from the payload keep their stored values and the merged
/// transaction is validated as a whole, so changing only the type still
/// checks that the stored category suits the new type.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let Path(transaction_id) = transaction_id?;
    let Json(payload) = payload?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let existing = get_transaction(transaction_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingTransaction,
        error => error,
    })?;

    let builder = payload.merge_into(&existing)?;

    update_transaction(transaction_id, builder, &connection)
        .inspect_err(|error| {
            tracing::error!("Could not update transaction {transaction_id}: {error}")
        })
        .map(Json)
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::put};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        category::Category,
        endpoints::{self, format_endpoint},
        initialize_db,
        transaction::{Transaction, TransactionType, create_transaction, get_transaction},
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn must_create_test_state() -> EditTransactionState {
        let connection =
            Connection::open_in_memory().expect("could not create in-memory SQLite database");
        initialize_db(&connection).expect("could not initialize test DB");
        create_transaction(
            Transaction::build(1.23, date!(2025 - 10 - 27), "test")
                .category(Category::Entertainment),
            &connection,
        )
        .expect("could not create test transaction");

        EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_server(state: EditTransactionState) -> TestServer {
        let app = Router::new()
            .route(endpoints::TRANSACTION, put(edit_transaction_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let state = must_create_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, 1))
            .json(&json!({
                "amount": 3.21,
                "description": "foo",
                "date": "2025-10-28",
            }))
            .await;

        response.assert_status_ok();
        let got_transaction = get_transaction(
            1,
            &state.db_connection.lock().expect("could not acquire lock"),
        )
        .expect("could not get test transaction");
        assert_eq!(got_transaction.amount, 3.21);
        assert_eq!(got_transaction.description, "foo");
        assert_eq!(got_transaction.date, date!(2025 - 10 - 28));
        assert_eq!(got_transaction.category, Category::Entertainment);
    }

    #[tokio::test]
    async fn changing_type_rechecks_category() {
        let state = must_create_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, 1))
            .json(&json!({"type": "income"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["details"][0]["field"], "category");
        let stored = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored.kind, TransactionType::Expense);
    }

    #[tokio::test]
    async fn updating_missing_transaction_is_not_found() {
        let server = get_test_server(must_create_test_state());

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, 99))
            .json(&json!({"amount": 1.0}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "Transaction not found");
    }
}
