//! The summary cards at the top of the dashboard: monthly sales, costs and
//! profit with their variation against the prior month, plus the
//! best-selling product.

use maud::{Markup, html};

use crate::{dashboard::aggregation::MonthlyReport, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

const CARD_TITLE_STYLE: &str = "text-sm font-medium text-gray-600 dark:text-gray-400 mb-1";

const DELTA_UP_STYLE: &str = "text-sm font-medium text-green-600 dark:text-green-400";
const DELTA_DOWN_STYLE: &str = "text-sm font-medium text-red-600 dark:text-red-400";

/// Formats a percent delta with an explicit sign, e.g. "+25.0%".
fn format_delta(delta: f64) -> String {
    if delta >= 0.0 {
        format!("+{delta:.1}%")
    } else {
        format!("{delta:.1}%")
    }
}

fn delta_badge(delta: f64) -> Markup {
    let style = if delta >= 0.0 {
        DELTA_UP_STYLE
    } else {
        DELTA_DOWN_STYLE
    };

    html! {
        span class=(style) {
            (format_delta(delta)) " em relação ao mês anterior"
        }
    }
}

fn metric_card(id: &str, title: &str, value: f64, delta: f64) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE) {
            h4 class=(CARD_TITLE_STYLE) { (title) }

            div class="text-3xl font-bold mb-2" { (format_currency(value)) }

            (delta_badge(delta))
        }
    }
}

fn top_product_card(top_product: Option<&(String, f64)>) -> Markup {
    html! {
        div id="produto-top" class=(CARD_STYLE) {
            h4 class=(CARD_TITLE_STYLE) { "Produto mais vendido" }

            @match top_product {
                Some((category, total)) => {
                    div class="text-3xl font-bold mb-2 truncate" title=(category) { (category) }
                    span class="text-sm text-gray-600 dark:text-gray-400" {
                        (format_currency(*total)) " em vendas"
                    }
                }
                None => {
                    div class="text-3xl font-bold mb-2" { "—" }
                    span class="text-sm text-gray-600 dark:text-gray-400" { "Sem vendas no mês" }
                }
            }
        }
    }
}

/// Renders the four summary cards for the monthly report.
pub(super) fn summary_cards_view(
    report: &MonthlyReport,
    top_product: Option<&(String, f64)>,
) -> Markup {
    html! {
        section id="summary-cards" class="w-full mx-auto mb-4" {
            div class="grid grid-cols-1 sm:grid-cols-2 xl:grid-cols-4 gap-4" {
                (metric_card("vendas-mes", "Vendas do mês", report.total_inflow, report.inflow_delta))
                (metric_card("custos-mes", "Custos do mês", report.total_outflow, report.outflow_delta))
                (metric_card("lucro-mes", "Lucro do mês", report.profit, report.profit_delta))
                (top_product_card(top_product))
            }
        }
    }
}
