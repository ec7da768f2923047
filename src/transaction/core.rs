//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error, FieldError,
    category::Category,
    database_id::TransactionId,
};

/// The longest description allowed, counted in grapheme clusters.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was spent or earned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was spent.
    #[default]
    Expense,
    /// Money that was earned.
    Income,
}

impl TransactionType {
    /// The lowercase name used in JSON and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            _ => Err(Error::invalid_field(
                "type",
                "Type must be either expense or income",
            )),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction, never negative.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// What the money was spent on or where it came from.
    pub category: Category,
    /// When the transaction was first recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: description.to_owned(),
            kind: TransactionType::Expense,
            category: Category::Other,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The type defaults to [TransactionType::Expense] and the category to
/// [Category::Other].
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::{category::Category, transaction::{Transaction, TransactionType}};
///
/// let transaction = Transaction::build(3200.0, date!(2024 - 01 - 01), "January pay")
///     .kind(TransactionType::Income)
///     .category(Category::Salary);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount of money spent or earned, must not be negative.
    pub amount: f64,

    /// The date when the transaction occurred.
    pub date: Date,

    /// A human-readable description of the transaction, at most
    /// [MAX_DESCRIPTION_LENGTH] characters after trimming whitespace.
    pub description: String,

    /// Whether the money was spent or earned.
    pub kind: TransactionType,

    /// The category of the transaction, must be valid for `kind`.
    pub category: Category,
}

impl TransactionBuilder {
    /// Set the type of the transaction.
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = kind;
        self
    }

    /// Set the category of the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Check the builder against the rules every stored transaction follows.
    ///
    /// Returns the trimmed description on success.
    ///
    /// # Errors
    /// Returns an [Error::Validation] listing every field that breaks a rule.
    fn validate(&self) -> Result<String, Error> {
        let mut errors = Vec::new();

        if !self.amount.is_finite() || self.amount < 0.0 {
            errors.push(FieldError::new("amount", "Amount must be positive"));
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        } else if description.graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
            errors.push(FieldError::new(
                "description",
                "Description cannot exceed 100 characters",
            ));
        }

        if self.category.kind() != self.kind {
            errors.push(FieldError::new(
                "category",
                &format!(
                    "{} is not a valid {} category",
                    self.category, self.kind
                ),
            ));
        }

        if errors.is_empty() {
            Ok(description.to_owned())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, amount, description, date, type, category, created_at, updated_at";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the builder breaks a transaction rule, e.g. an
///   income category on an expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let description = builder.validate()?;
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (amount, description, date, type, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount,
                description,
                builder.date,
                builder.kind,
                builder.category,
                now,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve transactions, newest first.
///
/// If `year` is given, only transactions dated in that calendar year are
/// returned. Transactions on the same date are ordered by most recently
/// created first.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if `year` is outside the supported date range,
/// - or [Error::SqlError] there is some SQL error.
pub fn get_transactions(year: Option<i32>, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    match year {
        Some(year) => {
            let (start, end) = year_bounds(year)?;

            connection
                .prepare(&format!(
                    "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
                     WHERE date BETWEEN ?1 AND ?2
                     ORDER BY date DESC, id DESC"
                ))?
                .query_map((start, end), map_transaction_row)?
                .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
                .collect()
        }
        None => connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id DESC"
            ))?
            .query_map([], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect(),
    }
}

fn year_bounds(year: i32) -> Result<(Date, Date), Error> {
    let out_of_range = |_| Error::invalid_field("year", "Year is out of range");

    let start = Date::from_calendar_date(year, Month::January, 1).map_err(out_of_range)?;
    let end = Date::from_calendar_date(year, Month::December, 31).map_err(out_of_range)?;

    Ok((start, end))
}

/// Replace the fields of the transaction `id` with `builder` and bump its
/// `updated_at` time.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the builder breaks a transaction rule,
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let description = builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET amount = ?1, description = ?2, date = ?3, type = ?4, category = ?5, updated_at = ?6
             WHERE id = ?7
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount,
                description,
                builder.date,
                builder.kind,
                builder.category,
                OffsetDateTime::now_utc(),
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount REAL NOT NULL CHECK (amount >= 0),
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
            category TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        kind: row.get(4)?,
        category: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{Error, category::Category, db::initialize};

    use super::{
        Transaction, TransactionType, create_transaction, delete_transaction, get_transaction,
        get_transactions, update_transaction,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(amount, date!(2025 - 10 - 05), "Coffee")
                .category(Category::FoodAndDining),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.kind, TransactionType::Expense);
                assert_eq!(transaction.category, Category::FoodAndDining);
                assert_eq!(transaction.created_at, transaction.updated_at);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_trims_description() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(1.0, date!(2025 - 10 - 05), "  Bus fare \n"),
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.description, "Bus fare");
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let conn = get_test_connection();

        let result = create_transaction(Transaction::build(-1.0, date!(2025 - 10 - 05), "Refund"), &conn);

        assert!(matches!(result, Err(Error::Validation(_))), "got {result:?}");
        assert_eq!(get_transactions(None, &conn), Ok(vec![]));
    }

    #[test]
    fn create_fails_on_blank_description() {
        let conn = get_test_connection();

        let result = create_transaction(Transaction::build(1.0, date!(2025 - 10 - 05), "   "), &conn);

        assert!(matches!(result, Err(Error::Validation(_))), "got {result:?}");
    }

    #[test]
    fn create_fails_on_long_description() {
        let conn = get_test_connection();
        let description = "a".repeat(101);

        let result =
            create_transaction(Transaction::build(1.0, date!(2025 - 10 - 05), &description), &conn);

        assert!(matches!(result, Err(Error::Validation(_))), "got {result:?}");
    }

    #[test]
    fn description_length_counts_graphemes() {
        let conn = get_test_connection();
        let description = "🔥".repeat(100);

        let result =
            create_transaction(Transaction::build(1.0, date!(2025 - 10 - 05), &description), &conn);

        assert!(result.is_ok(), "got {result:?}");
    }

    #[test]
    fn create_fails_on_income_category_for_expense() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(1.0, date!(2025 - 10 - 05), "Pay").category(Category::Salary),
            &conn,
        );

        assert!(matches!(result, Err(Error::Validation(_))), "got {result:?}");
    }

    #[test]
    fn get_transactions_orders_newest_first() {
        let conn = get_test_connection();
        let older = create_transaction(Transaction::build(1.0, date!(2024 - 01 - 05), "a"), &conn)
            .unwrap();
        let newest = create_transaction(Transaction::build(2.0, date!(2024 - 03 - 01), "b"), &conn)
            .unwrap();
        let same_day_later =
            create_transaction(Transaction::build(3.0, date!(2024 - 01 - 05), "c"), &conn).unwrap();

        let got = get_transactions(None, &conn).expect("Could not get transactions");

        assert_eq!(got, vec![newest, same_day_later, older]);
    }

    #[test]
    fn get_transactions_filters_by_year() {
        let conn = get_test_connection();
        create_transaction(Transaction::build(1.0, date!(2023 - 12 - 31), "a"), &conn).unwrap();
        let want = create_transaction(Transaction::build(2.0, date!(2024 - 01 - 01), "b"), &conn)
            .unwrap();
        create_transaction(Transaction::build(3.0, date!(2025 - 01 - 01), "c"), &conn).unwrap();

        let got = get_transactions(Some(2024), &conn).expect("Could not get transactions");

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn update_replaces_fields() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(Transaction::build(1.0, date!(2024 - 01 - 05), "a"), &conn)
                .unwrap();

        let updated = update_transaction(
            transaction.id,
            Transaction::build(2500.0, date!(2024 - 01 - 31), "Pay day")
                .kind(TransactionType::Income)
                .category(Category::Salary),
            &conn,
        )
        .expect("Could not update transaction");

        assert_eq!(updated.amount, 2500.0);
        assert_eq!(updated.kind, TransactionType::Income);
        assert_eq!(updated.created_at, transaction.created_at);
        assert!(updated.updated_at >= transaction.updated_at);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(updated));
    }

    #[test]
    fn update_missing_transaction_fails() {
        let conn = get_test_connection();

        let result = update_transaction(
            42,
            Transaction::build(1.0, date!(2024 - 01 - 05), "a"),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(Transaction::build(1.0, date!(2024 - 01 - 05), "a"), &conn)
                .unwrap();

        delete_transaction(transaction.id, &conn).expect("Could not delete transaction");

        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let conn = get_test_connection();

        assert_eq!(
            delete_transaction(42, &conn),
            Err(Error::DeleteMissingTransaction)
        );
    }
}

#[cfg(test)]
mod serialization_tests {
    use time::macros::{date, datetime};

    use crate::{category::Category, transaction::{Transaction, TransactionType}};

    #[test]
    fn serializes_with_snake_case_keys() {
        let transaction = Transaction {
            id: 1,
            amount: 45.5,
            description: "Groceries".to_owned(),
            date: date!(2024 - 01 - 05),
            kind: TransactionType::Expense,
            category: Category::FoodAndDining,
            created_at: datetime!(2024-01-05 10:30:00 UTC),
            updated_at: datetime!(2024-01-05 10:30:00 UTC),
        };

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "amount": 45.5,
                "description": "Groceries",
                "date": "2024-01-05",
                "type": "expense",
                "category": "Food & Dining",
                "created_at": "2024-01-05T10:30:00Z",
                "updated_at": "2024-01-05T10:30:00Z",
            })
        );
    }
}
