//! Monthly spending limits per expense category.
//!
//! This module contains the `Budget` model, its database functions and the
//! JSON route handlers for the budget API.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;

pub use core::{Budget, BudgetBuilder, BudgetFilter, create_budget_table, get_budgets};
pub use create_endpoint::create_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;
pub use edit_endpoint::edit_budget_endpoint;
pub use get_endpoint::{get_budget_endpoint, get_budgets_endpoint};

#[cfg(test)]
pub(crate) use core::{create_budget, get_budget};
