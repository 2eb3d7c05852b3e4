//! Dashboard HTTP handler and view assembly.
//!
//! The handler fetches the current-month, prior-month and recent
//! transactions plus the user profile, hands the transaction slices to the
//! aggregation functions, and renders the resulting plain data. Nothing
//! here computes figures and nothing in [super::aggregation] renders.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::{SessionToken, UserProfile, current_user},
    backend::BackendClient,
    dashboard::{
        aggregation::{MonthlyReport, monthly_report, report_windows, top_inflow_category},
        cards::summary_cards_view,
        charts::{
            DashboardChart, charts_script, charts_view, daily_sales_chart, outflow_donut_chart,
        },
        tables::{RECENT_TRANSACTIONS_LIMIT, recent_transactions_table},
    },
    endpoints,
    html::{HeadElement, base},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::{Transaction, TransactionQuery, fetch_transactions},
};

/// The ECharts bundle loaded on the dashboard page.
const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the hosted backend.
    pub backend: Arc<BackendClient>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the business' finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(token): Extension<SessionToken>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();
    let windows = report_windows(today);

    // The month queries, the recent list and the profile lookup have no data
    // dependency on each other, so issue them concurrently and join.
    let current_query = TransactionQuery::since(windows.current_start);
    let prior_query = TransactionQuery::between(windows.prior_start, windows.current_start);
    let recent_query = TransactionQuery::most_recent(RECENT_TRANSACTIONS_LIMIT as u32);
    let (current, prior, recent, profile) = tokio::try_join!(
        fetch_transactions(
            &state.backend,
            &token,
            &current_query,
        ),
        fetch_transactions(
            &state.backend,
            &token,
            &prior_query,
        ),
        fetch_transactions(
            &state.backend,
            &token,
            &recent_query,
        ),
        current_user(&state.backend, &token),
    )
    .inspect_err(|error| tracing::error!("could not load dashboard data: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if current.is_empty() && prior.is_empty() && recent.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, &profile).into_response());
    }

    let report = monthly_report(&current, &prior);
    let top_product = top_inflow_category(&current);
    let charts = build_dashboard_charts(&current, today);

    Ok(
        dashboard_view(nav_bar, &profile, &report, top_product.as_ref(), &charts, &recent)
            .into_response(),
    )
}

/// Creates the two dashboard charts from the current month's transactions.
fn build_dashboard_charts(current: &[Transaction], today: Date) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "custos-chart",
            options: outflow_donut_chart(current).to_string(),
        },
        DashboardChart {
            id: "vendas-chart",
            options: daily_sales_chart(current, today).to_string(),
        },
    ]
}

fn greeting_view(profile: &UserProfile) -> Markup {
    let display_name = profile.display_name.as_deref().unwrap_or("Usuário");

    html!(
        header class="w-full mb-6" {
            h2 id="user-name" class="text-2xl font-bold" { "Olá, " (display_name) }
            p id="user-email" class="text-sm text-gray-600 dark:text-gray-400" { (profile.email) }
        }
    )
}

/// Renders the dashboard page when the account has no transactions yet.
fn dashboard_no_data_view(nav_bar: NavBar, profile: &UserProfile) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            (greeting_view(profile))

            h2 class="text-xl font-bold"
            {
                "Nada por aqui ainda..."
            }

            p
            {
                "O resumo do mês aparece aqui assim que as primeiras \
                transações forem registradas no caixa."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with cards, charts and the recent table.
fn dashboard_view<'a>(
    nav_bar: NavBar<'a>,
    profile: &UserProfile,
    report: &MonthlyReport,
    top_product: Option<&(String, f64)>,
    charts: &[DashboardChart],
    recent: &[Transaction],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (greeting_view(profile))

            (summary_cards_view(report, top_product))

            (charts_view(charts))

            (recent_transactions_table(recent))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}
