//! The recent-transactions table shown below the charts.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, format_date},
    transaction::{Transaction, TransactionKind},
};

/// Fixed number of rows shown in the recent-transactions table.
pub(super) const RECENT_TRANSACTIONS_LIMIT: usize = 5;

const BADGE_INFLOW_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-green-800 bg-green-100 rounded-full \
    dark:bg-green-900 dark:text-green-300";

const BADGE_OUTFLOW_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-red-800 bg-red-100 rounded-full \
    dark:bg-red-900 dark:text-red-300";

const AMOUNT_INFLOW_STYLE: &str = "text-green-600 dark:text-green-400";
const AMOUNT_OUTFLOW_STYLE: &str = "text-red-600 dark:text-red-400";

fn kind_badge(kind: TransactionKind) -> Markup {
    match kind {
        TransactionKind::Inflow => html! { span class=(BADGE_INFLOW_STYLE) { "Entrada" } },
        TransactionKind::Outflow => html! { span class=(BADGE_OUTFLOW_STYLE) { "Saída" } },
    }
}

fn amount_cell(transaction: &Transaction) -> Markup {
    let (style, sign) = match transaction.kind {
        TransactionKind::Inflow => (AMOUNT_INFLOW_STYLE, "+"),
        TransactionKind::Outflow => (AMOUNT_OUTFLOW_STYLE, "-"),
    };

    html! {
        td class={(TABLE_CELL_STYLE) " " (style)} {
            (sign) " " (format_currency(transaction.amount))
        }
    }
}

/// Renders the table with the most recent transactions, newest first.
///
/// Never shows more than [RECENT_TRANSACTIONS_LIMIT] rows, regardless of how
/// many transactions are passed in.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full mb-8" {
            h3 class="text-xl font-semibold mb-4" { "Transações recentes" }

            div class="overflow-x-auto rounded-lg shadow" {
                table
                    id="recent-transactions"
                    class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Data" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Tipo" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Descrição" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Valor" }
                        }
                    }
                    tbody {
                        @for transaction in transactions.iter().take(RECENT_TRANSACTIONS_LIMIT) {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (format_date(transaction.date)) }
                                td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }
                                td class=(TABLE_CELL_STYLE) { (transaction.description) }
                                (amount_cell(transaction))
                            }
                        }
                    }
                }
            }
        }
    }
}
