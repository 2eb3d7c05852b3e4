//! Dashboard module
//!
//! Provides the overview page with the monthly summary cards, the cost and
//! sales charts, and the recent-transactions table.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
