//! The transaction domain model and the read-only repository over the
//! hosted transaction table.

mod models;
mod repository;

pub use models::{RawAmount, Transaction, TransactionKind, TransactionRecord};
pub use repository::{SortColumn, TransactionQuery, fetch_transactions};
