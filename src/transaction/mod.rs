//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - JSON route handlers for the transaction API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, create_transaction_table, get_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::{DeletedMessage, delete_transaction_endpoint};
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::{get_transaction_endpoint, get_transactions_endpoint};

#[cfg(test)]
pub(crate) use core::{create_transaction, get_transaction};
