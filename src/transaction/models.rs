//! The transaction domain model and the wire records it is parsed from.

use serde::Deserialize;
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

/// Calendar date format used by the transaction table, e.g. "2024-06-01".
const TABLE_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The direction of a transaction: money received or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Money received, recorded as "entrada".
    Inflow,
    /// Money spent, recorded as "saida".
    Outflow,
}

/// A financial transaction fetched from the hosted table.
///
/// Immutable once fetched. Every figure on the dashboard is recomputed from
/// these records on each load; nothing derived is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The row ID assigned by the backend.
    pub id: i64,
    /// The calendar day the transaction happened on.
    pub date: Date,
    /// The amount as a positive decimal value; [TransactionKind] carries the
    /// direction.
    pub amount: f64,
    /// Whether the amount came in or went out.
    pub kind: TransactionKind,
    /// Free-text category label. For sales this is the product sold.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// When the row was created.
    pub created_at: OffsetDateTime,
}

/// The amount column as it appears on the wire.
///
/// Numeric columns arrive as JSON numbers; text columns arrive as strings
/// that must parse as decimals.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// The backend serialized the column as a JSON number.
    Number(f64),
    /// The backend serialized the column as a string.
    Text(String),
}

/// A raw row of the transaction table.
///
/// Dates, kinds and text amounts are parsed strictly when converting into a
/// [Transaction]; one malformed row aborts the whole fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    /// The row ID.
    pub id: i64,
    /// The transaction date column.
    #[serde(rename = "data")]
    pub date: String,
    /// The amount column.
    #[serde(rename = "valor")]
    pub amount: RawAmount,
    /// The direction column, "entrada" or "saida".
    #[serde(rename = "tipo")]
    pub kind: String,
    /// The category column.
    #[serde(rename = "categoria")]
    pub category: String,
    /// The description column.
    #[serde(rename = "descricao")]
    pub description: String,
    /// The row creation timestamp.
    pub created_at: String,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let date = Date::parse(&record.date, TABLE_DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(record.date.clone()))?;

        let created_at = OffsetDateTime::parse(&record.created_at, &Rfc3339)
            .map_err(|_| Error::InvalidDate(record.created_at.clone()))?;

        let amount = match record.amount {
            RawAmount::Number(number) => number,
            RawAmount::Text(ref text) => text
                .trim()
                .parse()
                .map_err(|_| Error::InvalidAmount(text.clone()))?,
        };

        let kind = match record.kind.as_str() {
            "entrada" => TransactionKind::Inflow,
            "saida" => TransactionKind::Outflow,
            _ => return Err(Error::InvalidKind(record.kind.clone())),
        };

        Ok(Self {
            id: record.id,
            date,
            amount,
            kind,
            category: record.category,
            description: record.description,
            created_at,
        })
    }
}

#[cfg(test)]
mod record_parsing_tests {
    use time::macros::{date, datetime};

    use crate::Error;

    use super::{RawAmount, Transaction, TransactionKind, TransactionRecord};

    fn get_test_record() -> TransactionRecord {
        TransactionRecord {
            id: 7,
            date: "2024-06-15".to_owned(),
            amount: RawAmount::Text("120.50".to_owned()),
            kind: "entrada".to_owned(),
            category: "Coxinha".to_owned(),
            description: "Venda no balcão".to_owned(),
            created_at: "2024-06-15T13:45:00Z".to_owned(),
        }
    }

    #[test]
    fn parses_valid_record() {
        let transaction = Transaction::try_from(get_test_record()).unwrap();

        assert_eq!(transaction.id, 7);
        assert_eq!(transaction.date, date!(2024 - 06 - 15));
        assert_eq!(transaction.amount, 120.50);
        assert_eq!(transaction.kind, TransactionKind::Inflow);
        assert_eq!(transaction.category, "Coxinha");
        assert_eq!(transaction.created_at, datetime!(2024-06-15 13:45:00 UTC));
    }

    #[test]
    fn parses_numeric_amount_column() {
        let record = TransactionRecord {
            amount: RawAmount::Number(99.9),
            ..get_test_record()
        };

        let transaction = Transaction::try_from(record).unwrap();

        assert_eq!(transaction.amount, 99.9);
    }

    #[test]
    fn parses_outflow_kind() {
        let record = TransactionRecord {
            kind: "saida".to_owned(),
            ..get_test_record()
        };

        let transaction = Transaction::try_from(record).unwrap();

        assert_eq!(transaction.kind, TransactionKind::Outflow);
    }

    #[test]
    fn rejects_malformed_amount() {
        let record = TransactionRecord {
            amount: RawAmount::Text("12,50".to_owned()),
            ..get_test_record()
        };

        let error = Transaction::try_from(record).unwrap_err();

        assert_eq!(error, Error::InvalidAmount("12,50".to_owned()));
    }

    #[test]
    fn rejects_unknown_kind() {
        let record = TransactionRecord {
            kind: "transferencia".to_owned(),
            ..get_test_record()
        };

        let error = Transaction::try_from(record).unwrap_err();

        assert_eq!(error, Error::InvalidKind("transferencia".to_owned()));
    }

    #[test]
    fn rejects_malformed_date() {
        let record = TransactionRecord {
            date: "15/06/2024".to_owned(),
            ..get_test_record()
        };

        let error = Transaction::try_from(record).unwrap_err();

        assert_eq!(error, Error::InvalidDate("15/06/2024".to_owned()));
    }
}
