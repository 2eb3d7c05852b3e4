//! Chart generation and rendering for the dashboard.
//!
//! This module creates the two ECharts visualizations:
//! - **Cost distribution**: donut chart of the current month's outflows
//!   grouped by category
//! - **Daily sales**: smoothed area line chart of inflows over the trailing
//!   seven days
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization
//! code. The charts only display what they are given; all aggregation
//! happens in [super::aggregation].

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{AreaStyle, AxisLabel, AxisType, JsFunction, Tooltip, Trigger},
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};
use time::{Date, Weekday};

use crate::{
    dashboard::aggregation::{daily_inflow_series, outflow_by_category},
    html::HeadElement,
    transaction::Transaction,
};

/// Fixed palette for the cost-distribution donut.
const DONUT_PALETTE: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#8AC926", "#1982C4",
];

/// Line colour for the daily sales chart.
const SALES_LINE_COLOR: &str = "#36A2EB";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for the dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that initializes the dashboard charts.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    chart.setOption({});

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Donut chart of the current month's outflows grouped by category.
pub(super) fn outflow_donut_chart(transactions: &[Transaction]) -> Chart {
    let data: Vec<DataPointItem> = outflow_by_category(transactions)
        .into_iter()
        .map(|(category, total)| DataPointItem::new(total).name(category))
        .collect();

    Chart::new()
        .color(DONUT_PALETTE.to_vec())
        .title(
            Title::new()
                .text("Distribuição de custos")
                .subtext("Mês atual"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("Custos")
                .radius(vec!["45%", "70%"])
                .avoid_label_overlap(false)
                .data(data),
        )
}

/// Smoothed area line chart of inflows over the trailing seven days.
pub(super) fn daily_sales_chart(transactions: &[Transaction], today: Date) -> Chart {
    let series = daily_inflow_series(transactions, today);
    let labels: Vec<String> = series
        .iter()
        .map(|(day, _)| weekday_label(day.weekday()).to_owned())
        .collect();
    let values: Vec<f64> = series.iter().map(|(_, total)| *total).collect();

    Chart::new()
        .color(vec![SALES_LINE_COLOR])
        .title(Title::new().text("Vendas dos últimos 7 dias"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter()),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Vendas")
                .smooth(0.4)
                .area_style(AreaStyle::new())
                .data(values),
        )
}

/// Abbreviated pt-BR weekday labels for the daily sales chart's x-axis.
fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sunday => "dom",
        Weekday::Monday => "seg",
        Weekday::Tuesday => "ter",
        Weekday::Wednesday => "qua",
        Weekday::Thursday => "qui",
        Weekday::Friday => "sex",
        Weekday::Saturday => "sáb",
    }
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
