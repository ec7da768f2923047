//! Defines the core data models and database queries for budgets.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, FieldError,
    category::Category,
    database_id::BudgetId,
    month::YearMonth,
    transaction::TransactionType,
};

// ============================================================================
// MODELS
// ============================================================================

/// A spending limit for one expense category in one calendar month.
///
/// To create a new `Budget`, use [Budget::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The expense category the budget limits.
    pub category: Category,
    /// The most that should be spent in the category during the month.
    pub amount: f64,
    /// The month the budget applies to.
    pub month: YearMonth,
    /// The year of `month`, kept for filtering budgets by year.
    pub year: i32,
    /// When the budget was first recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the budget was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Budget {
    /// Create a new budget.
    ///
    /// Shortcut for [BudgetBuilder] for discoverability.
    pub fn build(category: Category, amount: f64, month: YearMonth) -> BudgetBuilder {
        BudgetBuilder {
            category,
            amount,
            month,
        }
    }
}

/// A builder for creating [Budget] instances.
///
/// The year of a budget is always taken from `month`.
#[derive(Debug, PartialEq, Clone)]
pub struct BudgetBuilder {
    /// The category to limit, must be an expense category.
    pub category: Category,
    /// The spending limit, must not be negative.
    pub amount: f64,
    /// The month the budget applies to.
    pub month: YearMonth,
}

impl BudgetBuilder {
    fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if !self.amount.is_finite() || self.amount < 0.0 {
            errors.push(FieldError::new("amount", "Budget amount must be positive"));
        }

        if self.category.kind() != TransactionType::Expense {
            errors.push(FieldError::new(
                "category",
                &format!("{} is not an expense category", self.category),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }

    fn duplicate_error(&self) -> Error {
        Error::DuplicateBudget {
            category: self.category.to_string(),
            month: self.month.to_string(),
        }
    }
}

/// Which budgets to retrieve from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetFilter {
    /// Every budget.
    All,
    /// Only the budgets for one month.
    Month(YearMonth),
    /// Only the budgets for months in one year.
    Year(i32),
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const BUDGET_COLUMNS: &str = "id, category, amount, month, year, created_at, updated_at";

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        )
    )
}

/// Create a new budget in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the amount is negative or the category is not an
///   expense category,
/// - [Error::DuplicateBudget] if a budget already exists for the category and month,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(builder: BudgetBuilder, connection: &Connection) -> Result<Budget, Error> {
    builder.validate()?;

    connection
        .prepare(&format!(
            "INSERT INTO budget (category, amount, month, year, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                builder.category,
                builder.amount,
                builder.month,
                builder.month.year(),
                OffsetDateTime::now_utc(),
            ),
            map_budget_row,
        )
        .map_err(|error| {
            if is_unique_violation(&error) {
                builder.duplicate_error()
            } else {
                error.into()
            }
        })
}

/// Retrieve a budget from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(&format!("SELECT {BUDGET_COLUMNS} FROM budget WHERE id = :id"))?
        .query_one(&[(":id", &id)], map_budget_row)?;

    Ok(budget)
}

/// Retrieve the budgets matching `filter`, ordered by category name.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_budgets(filter: BudgetFilter, connection: &Connection) -> Result<Vec<Budget>, Error> {
    let select = format!("SELECT {BUDGET_COLUMNS} FROM budget");
    let order_by = "ORDER BY category ASC, id ASC";

    let budgets = match filter {
        BudgetFilter::All => connection
            .prepare(&format!("{select} {order_by}"))?
            .query_map([], map_budget_row)?
            .collect::<Result<Vec<_>, _>>()?,
        BudgetFilter::Month(month) => connection
            .prepare(&format!("{select} WHERE month = ?1 {order_by}"))?
            .query_map([month], map_budget_row)?
            .collect::<Result<Vec<_>, _>>()?,
        BudgetFilter::Year(year) => connection
            .prepare(&format!("{select} WHERE year = ?1 {order_by}"))?
            .query_map([year], map_budget_row)?
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(budgets)
}

/// Replace the fields of the budget `id` with `builder`, re-deriving its year
/// and bumping its `updated_at` time.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the builder breaks a budget rule,
/// - [Error::UpdateMissingBudget] if `id` does not refer to a budget,
/// - [Error::DuplicateBudget] if another budget exists for the category and month,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    builder: BudgetBuilder,
    connection: &Connection,
) -> Result<Budget, Error> {
    builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE budget
             SET category = ?1, amount = ?2, month = ?3, year = ?4, updated_at = ?5
             WHERE id = ?6
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                builder.category,
                builder.amount,
                builder.month,
                builder.month.year(),
                OffsetDateTime::now_utc(),
                id,
            ),
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingBudget,
            error if is_unique_violation(&error) => builder.duplicate_error(),
            error => error.into(),
        })
}

/// Delete the budget `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingBudget] if `id` does not refer to a budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            month TEXT NOT NULL,
            year INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(category, month)
        );

        CREATE INDEX IF NOT EXISTS idx_budget_year_month ON budget(year, month);",
    )?;

    Ok(())
}

/// Map a database row to a Budget.
pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        month: row.get(3)?,
        year: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
