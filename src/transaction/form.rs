//! Parsing of the JSON payloads used to create and update transactions.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

use crate::{
    Error, FieldError,
    category::Category,
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// The fields of a transaction as sent by a client.
///
/// Every field is optional so that a single type serves both create requests
/// (where missing required fields are reported) and partial updates (where
/// missing fields keep their stored value).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// The amount of money, must not be negative.
    pub amount: Option<f64>,
    /// What the transaction was for.
    pub description: Option<String>,
    /// A date "YYYY-MM-DD" or an RFC 3339 date-time.
    pub date: Option<String>,
    /// Either "expense" or "income".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// A category name, e.g. "Food & Dining".
    pub category: Option<String>,
}

impl TransactionPayload {
    /// Convert the payload for a new transaction into a builder.
    ///
    /// The type defaults to expense and the category to [Category::Other]
    /// when they are omitted. An income without a category is rejected since
    /// "Other" is an expense category.
    ///
    /// # Errors
    /// Returns an [Error::Validation] listing every field that is missing or
    /// cannot be parsed.
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        self.resolve(None)
    }

    /// Merge the payload with the `existing` transaction, keeping the stored
    /// value of every field the payload omits.
    ///
    /// # Errors
    /// Returns an [Error::Validation] listing every field that cannot be parsed.
    pub fn merge_into(self, existing: &Transaction) -> Result<TransactionBuilder, Error> {
        self.resolve(Some(existing))
    }

    fn resolve(self, existing: Option<&Transaction>) -> Result<TransactionBuilder, Error> {
        let mut errors = Vec::new();

        let amount = self.amount.or(existing.map(|transaction| transaction.amount));
        if amount.is_none() {
            errors.push(FieldError::new("amount", "Amount is required"));
        }

        let description = self
            .description
            .or_else(|| existing.map(|transaction| transaction.description.clone()));
        if description.is_none() {
            errors.push(FieldError::new("description", "Description is required"));
        }

        let date = match (self.date, existing) {
            (Some(raw_date), _) => parse_date(&raw_date)
                .map_err(|error| errors.push(error))
                .ok(),
            (None, Some(transaction)) => Some(transaction.date),
            (None, None) => {
                errors.push(FieldError::new("date", "Date is required"));
                None
            }
        };

        let kind = match (self.kind, existing) {
            (Some(raw_kind), _) => raw_kind
                .parse::<TransactionType>()
                .map_err(|error| errors.extend(error.into_field_errors()))
                .ok(),
            (None, Some(transaction)) => Some(transaction.kind),
            (None, None) => Some(TransactionType::default()),
        };

        let category = match (self.category, existing) {
            (Some(raw_category), _) => raw_category
                .parse::<Category>()
                .map_err(|error| errors.extend(error.into_field_errors()))
                .ok(),
            (None, Some(transaction)) => Some(transaction.category),
            (None, None) => Some(Category::Other),
        };

        match (amount, description, date, kind, category) {
            (Some(amount), Some(description), Some(date), Some(kind), Some(category))
                if errors.is_empty() =>
            {
                Ok(Transaction::build(amount, date, &description)
                    .kind(kind)
                    .category(category))
            }
            _ => Err(Error::Validation(errors)),
        }
    }
}

/// Parse a calendar date "YYYY-MM-DD", or the date part of an RFC 3339
/// date-time such as "2024-01-05T00:00:00.000Z".
fn parse_date(raw_date: &str) -> Result<Date, FieldError> {
    let date_format = format_description!("[year]-[month]-[day]");

    Date::parse(raw_date, date_format)
        .or_else(|_| OffsetDateTime::parse(raw_date, &Rfc3339).map(OffsetDateTime::date))
        .map_err(|_| FieldError::new("date", "Date must be in YYYY-MM-DD format"))
}
