//! Read-only queries against the hosted transaction table.
//!
//! The table API speaks PostgREST-style query parameters: date bounds are
//! encoded as `gte.`/`lt.` filters and ordering as `order=<column>.desc`.
//! Errors from the remote store are not classified here; they abort the
//! fetch and are logged by the caller.

use time::Date;

use crate::{
    Error,
    auth::SessionToken,
    backend::BackendClient,
    transaction::models::{Transaction, TransactionRecord},
};

/// The transaction table exposed by the backend's table API.
const TRANSACTIONS_TABLE: &str = "transacoes";

/// The column a query is ordered by, always newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    /// Order by the transaction date.
    #[default]
    Date,
    /// Order by the row creation timestamp.
    CreatedAt,
}

impl SortColumn {
    fn order_param(self) -> &'static str {
        match self {
            SortColumn::Date => "data.desc",
            SortColumn::CreatedAt => "created_at.desc",
        }
    }
}

/// A filtered read query over the transaction table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Inclusive lower bound on the transaction date.
    pub from: Option<Date>,
    /// Exclusive upper bound on the transaction date.
    pub before: Option<Date>,
    /// The column the results are ordered by, newest first.
    pub order: SortColumn,
    /// Maximum number of rows to return.
    pub limit: Option<u32>,
}

impl TransactionQuery {
    /// All transactions dated `from` or later, newest first.
    pub fn since(from: Date) -> Self {
        Self {
            from: Some(from),
            ..Self::default()
        }
    }

    /// All transactions dated within `from..before`, newest first.
    pub fn between(from: Date, before: Date) -> Self {
        Self {
            from: Some(from),
            before: Some(before),
            ..Self::default()
        }
    }

    /// The `limit` most recently created transactions.
    pub fn most_recent(limit: u32) -> Self {
        Self {
            order: SortColumn::CreatedAt,
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", "*".to_owned())];

        if let Some(from) = self.from {
            params.push(("data", format!("gte.{from}")));
        }

        if let Some(before) = self.before {
            params.push(("data", format!("lt.{before}")));
        }

        params.push(("order", self.order.order_param().to_owned()));

        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        params
    }
}

/// Fetch the transactions matching `query`, newest first.
///
/// # Errors
///
/// Returns:
/// - [Error::Unauthenticated] if the backend no longer accepts `token`.
/// - [Error::BackendRejected] for any other non-success response.
/// - [Error::InvalidAmount], [Error::InvalidDate] or [Error::InvalidKind] if
///   a row fails strict parsing.
pub async fn fetch_transactions(
    backend: &BackendClient,
    token: &SessionToken,
    query: &TransactionQuery,
) -> Result<Vec<Transaction>, Error> {
    let url = backend.table_endpoint(TRANSACTIONS_TABLE)?;
    let response = backend
        .http()
        .get(url)
        .bearer_auth(token.as_str())
        .query(&query.to_params())
        .send()
        .await?;

    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthenticated);
    }

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable response body>".to_owned());

        return Err(Error::BackendRejected {
            status: status.as_u16(),
            message,
        });
    }

    let records: Vec<TransactionRecord> = response.json().await?;

    records.into_iter().map(Transaction::try_from).collect()
}

#[cfg(test)]
mod query_params_tests {
    use time::macros::date;

    use super::{SortColumn, TransactionQuery};

    #[test]
    fn encodes_inclusive_lower_and_exclusive_upper_bound() {
        let query = TransactionQuery::between(date!(2024 - 05 - 01), date!(2024 - 06 - 01));

        let params = query.to_params();

        assert!(params.contains(&("data", "gte.2024-05-01".to_owned())));
        assert!(params.contains(&("data", "lt.2024-06-01".to_owned())));
    }

    #[test]
    fn since_has_no_upper_bound() {
        let query = TransactionQuery::since(date!(2024 - 06 - 01));

        let params = query.to_params();

        assert!(params.contains(&("data", "gte.2024-06-01".to_owned())));
        assert!(!params.iter().any(|(_, value)| value.starts_with("lt.")));
    }

    #[test]
    fn orders_by_date_by_default() {
        let params = TransactionQuery::since(date!(2024 - 06 - 01)).to_params();

        assert!(params.contains(&("order", "data.desc".to_owned())));
    }

    #[test]
    fn most_recent_orders_by_creation_time_and_limits_rows() {
        let query = TransactionQuery::most_recent(5);

        assert_eq!(query.order, SortColumn::CreatedAt);

        let params = query.to_params();
        assert!(params.contains(&("order", "created_at.desc".to_owned())));
        assert!(params.contains(&("limit", "5".to_owned())));
    }
}
