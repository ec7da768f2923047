//! Dashboard module
//!
//! Provides an overview page with summary cards, charts, budget totals and
//! spending insights for a single month.

mod cards;
mod charts;
mod handlers;
mod insights;

pub use handlers::get_dashboard_page;
