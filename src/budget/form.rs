//! Parsing of the JSON payloads and query strings used by the budget API.

use serde::{Deserialize, Serialize};

use crate::{
    Error, FieldError,
    budget::{Budget, BudgetBuilder, BudgetFilter},
    category::Category,
    month::YearMonth,
};

/// The fields of a budget as sent by a client.
///
/// A `year` sent by the client is ignored since it is always derived from
/// `month`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPayload {
    /// An expense category name, e.g. "Food & Dining".
    pub category: Option<String>,
    /// The spending limit, must not be negative.
    pub amount: Option<f64>,
    /// The month in the format "YYYY-MM".
    pub month: Option<String>,
}

impl BudgetPayload {
    /// Convert the payload for a new budget into a builder.
    ///
    /// # Errors
    /// Returns an [Error::Validation] listing every field that is missing or
    /// cannot be parsed.
    pub fn into_builder(self) -> Result<BudgetBuilder, Error> {
        self.resolve(None)
    }

    /// Merge the payload with the `existing` budget, keeping the stored value
    /// of every field the payload omits.
    ///
    /// # Errors
    /// Returns an [Error::Validation] listing every field that cannot be parsed.
    pub fn merge_into(self, existing: &Budget) -> Result<BudgetBuilder, Error> {
        self.resolve(Some(existing))
    }

    fn resolve(self, existing: Option<&Budget>) -> Result<BudgetBuilder, Error> {
        let mut errors = Vec::new();

        let category = match (self.category, existing) {
            (Some(raw_category), _) => raw_category
                .parse::<Category>()
                .map_err(|error| errors.extend(error.into_field_errors()))
                .ok(),
            (None, Some(budget)) => Some(budget.category),
            (None, None) => {
                errors.push(FieldError::new("category", "Category is required"));
                None
            }
        };

        let amount = self.amount.or(existing.map(|budget| budget.amount));
        if amount.is_none() {
            errors.push(FieldError::new("amount", "Budget amount is required"));
        }

        let month = match (self.month, existing) {
            (Some(raw_month), _) => raw_month
                .parse::<YearMonth>()
                .map_err(|error| errors.extend(error.into_field_errors()))
                .ok(),
            (None, Some(budget)) => Some(budget.month),
            (None, None) => {
                errors.push(FieldError::new("month", "Month is required"));
                None
            }
        };

        match (category, amount, month) {
            (Some(category), Some(amount), Some(month)) if errors.is_empty() => {
                Ok(Budget::build(category, amount, month))
            }
            _ => Err(Error::Validation(errors)),
        }
    }
}

/// The query string for listing budgets.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetsQuery {
    /// Either a full month "YYYY-MM", or a month number used with `year`.
    pub month: Option<String>,
    /// A calendar year, e.g. "2024".
    pub year: Option<String>,
}

impl BudgetsQuery {
    /// Work out which budgets the query asks for.
    ///
    /// A bare month number such as "1" is zero-padded and combined with
    /// `year`, so `month=1&year=2024` selects "2024-01".
    ///
    /// # Errors
    /// Returns an [Error::Validation] if the month or year cannot be parsed,
    /// or if a bare month number is given without a year.
    pub fn into_filter(self) -> Result<BudgetFilter, Error> {
        match (self.month, self.year) {
            (Some(month), _) if month.contains('-') => month.parse().map(BudgetFilter::Month),
            (Some(month), Some(year)) => format!("{year}-{month:0>2}")
                .parse()
                .map(BudgetFilter::Month),
            (Some(_), None) => Err(Error::invalid_field(
                "year",
                "Year is required when month is a month number",
            )),
            (None, Some(year)) => year
                .parse()
                .map(BudgetFilter::Year)
                .map_err(|_| Error::invalid_field("year", "Year must be a number")),
            (None, None) => Ok(BudgetFilter::All),
        }
    }
}
