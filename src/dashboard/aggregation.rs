//! Aggregation of fetched transactions into the figures shown on the
//! dashboard.
//!
//! Everything here is a pure function over already-fetched transaction
//! slices: period totals and percent deltas, the outflow breakdown used by
//! the donut chart, and the trailing seven-day sales series. Rendering
//! happens elsewhere.

use std::collections::HashMap;

use time::{Date, Duration, Month};

use crate::transaction::{Transaction, TransactionKind};

/// Number of calendar days covered by the daily sales series, including today.
pub(super) const DAILY_SERIES_DAYS: i64 = 7;

/// Inflow and outflow sums for a single reporting period.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(super) struct PeriodTotals {
    /// Sum of all inflow amounts in the period.
    pub inflow: f64,
    /// Sum of all outflow amounts in the period.
    pub outflow: f64,
}

impl PeriodTotals {
    /// The net result for the period.
    pub fn profit(&self) -> f64 {
        self.inflow - self.outflow
    }
}

/// Sums inflow and outflow amounts independently over one period.
pub(super) fn sum_period(transactions: &[Transaction]) -> PeriodTotals {
    let mut totals = PeriodTotals::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Inflow => totals.inflow += transaction.amount,
            TransactionKind::Outflow => totals.outflow += transaction.amount,
        }
    }

    totals
}

/// The monthly report: totals for the current period and percent deltas
/// against the prior period.
#[derive(Debug, PartialEq)]
pub(super) struct MonthlyReport {
    /// Sum of the current period's inflows.
    pub total_inflow: f64,
    /// Sum of the current period's outflows.
    pub total_outflow: f64,
    /// `total_inflow - total_outflow`.
    pub profit: f64,
    /// Percent change of inflow vs. the prior period.
    pub inflow_delta: f64,
    /// Percent change of outflow vs. the prior period.
    pub outflow_delta: f64,
    /// Percent change of profit vs. the prior period.
    pub profit_delta: f64,
}

/// Builds the monthly report from the current- and prior-period transactions.
pub(super) fn monthly_report(current: &[Transaction], prior: &[Transaction]) -> MonthlyReport {
    let current_totals = sum_period(current);
    let prior_totals = sum_period(prior);

    MonthlyReport {
        total_inflow: current_totals.inflow,
        total_outflow: current_totals.outflow,
        profit: current_totals.profit(),
        inflow_delta: percent_delta(current_totals.inflow, prior_totals.inflow),
        outflow_delta: percent_delta(current_totals.outflow, prior_totals.outflow),
        profit_delta: percent_delta(current_totals.profit(), prior_totals.profit()),
    }
}

/// Percent change from `previous` to `current`, rounded to one decimal place.
///
/// Defined as zero whenever `previous` is zero or negative. Months without a
/// baseline report no variation instead of an infinite one; this is a
/// policy, not a mathematically sound treatment of negative priors.
pub(super) fn percent_delta(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 {
        return 0.0;
    }

    ((current - previous) / previous * 1000.0).round() / 10.0
}

/// Sums outflow amounts per category label, sorted by label.
///
/// Inflows never contribute; the sum over all entries equals the period's
/// total outflow.
pub(super) fn outflow_by_category(transactions: &[Transaction]) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.kind == TransactionKind::Outflow {
            *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
        }
    }

    let mut breakdown: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(category, total)| (category.to_owned(), total))
        .collect();
    breakdown.sort_by(|a, b| a.0.cmp(&b.0));

    breakdown
}

/// Sums inflow amounts for each of the last [DAILY_SERIES_DAYS] calendar
/// days ending at `today`, oldest first.
///
/// Every day in the window gets an entry; days without sales stay at zero.
/// Transactions dated outside the window are ignored.
pub(super) fn daily_inflow_series(transactions: &[Transaction], today: Date) -> Vec<(Date, f64)> {
    let mut series: Vec<(Date, f64)> = (0..DAILY_SERIES_DAYS)
        .rev()
        .map(|days_ago| (today - Duration::days(days_ago), 0.0))
        .collect();

    for transaction in transactions {
        if transaction.kind != TransactionKind::Inflow {
            continue;
        }

        if let Some((_, total)) = series.iter_mut().find(|(day, _)| *day == transaction.date) {
            *total += transaction.amount;
        }
    }

    series
}

/// The inflow category with the largest total, ties broken by label.
///
/// Sales are recorded with the product as the category label, so this is
/// the best-selling product of the period. Returns `None` when the period
/// has no inflows.
pub(super) fn top_inflow_category(transactions: &[Transaction]) -> Option<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.kind == TransactionKind::Inflow {
            *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
        }
    }

    totals
        .into_iter()
        .max_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.0.cmp(a.0))
        })
        .map(|(category, total)| (category.to_owned(), total))
}

/// The first days of the two months compared by the monthly report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ReportWindows {
    /// First day of the month containing today.
    pub current_start: Date,
    /// First day of the month before it.
    pub prior_start: Date,
}

/// Computes the report windows for the month containing `today`.
///
/// The current period is everything from `current_start` onwards; the prior
/// period is the half-open range `prior_start..current_start`.
pub(super) fn report_windows(today: Date) -> ReportWindows {
    let current_start = today.replace_day(1).expect("day 1 exists in every month");

    let prior_start = if current_start.month() == Month::January {
        Date::from_calendar_date(current_start.year() - 1, Month::December, 1)
    } else {
        Date::from_calendar_date(current_start.year(), current_start.month().previous(), 1)
    }
    .expect("day 1 exists in every month");

    ReportWindows {
        current_start,
        prior_start,
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, OffsetDateTime, macros::date};

    use crate::transaction::{Transaction, TransactionKind};

    use super::{
        DAILY_SERIES_DAYS, daily_inflow_series, monthly_report, outflow_by_category,
        percent_delta, report_windows, sum_period, top_inflow_category,
    };

    fn create_test_transaction(
        amount: f64,
        kind: TransactionKind,
        date: Date,
        category: &str,
    ) -> Transaction {
        Transaction {
            id: 0,
            date,
            amount,
            kind,
            category: category.to_owned(),
            description: String::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn inflow(amount: f64, date: Date) -> Transaction {
        create_test_transaction(amount, TransactionKind::Inflow, date, "Coxinha")
    }

    fn outflow(amount: f64, date: Date) -> Transaction {
        create_test_transaction(amount, TransactionKind::Outflow, date, "Insumos")
    }

    #[test]
    fn profit_is_inflow_minus_outflow() {
        let transactions = vec![
            inflow(1000.0, date!(2024 - 06 - 05)),
            outflow(300.0, date!(2024 - 06 - 10)),
            outflow(200.0, date!(2024 - 06 - 20)),
        ];

        let totals = sum_period(&transactions);

        assert_eq!(totals.inflow, 1000.0);
        assert_eq!(totals.outflow, 500.0);
        assert_eq!(totals.profit(), 500.0);
    }

    #[test]
    fn empty_period_is_all_zero() {
        let report = monthly_report(&[], &[]);

        assert_eq!(report.total_inflow, 0.0);
        assert_eq!(report.total_outflow, 0.0);
        assert_eq!(report.profit, 0.0);
        assert_eq!(report.inflow_delta, 0.0);
        assert_eq!(report.outflow_delta, 0.0);
        assert_eq!(report.profit_delta, 0.0);
    }

    #[test]
    fn percent_delta_is_zero_for_non_positive_prior() {
        assert_eq!(percent_delta(150.0, 0.0), 0.0);
        assert_eq!(percent_delta(150.0, -10.0), 0.0);
        assert_eq!(percent_delta(0.0, 0.0), 0.0);
    }

    #[test]
    fn percent_delta_of_100_to_150_is_exactly_50() {
        assert_eq!(percent_delta(150.0, 100.0), 50.0);
    }

    #[test]
    fn percent_delta_rounds_to_one_decimal_place() {
        // (500 - 550) / 550 * 100 = -9.0909...
        assert_eq!(percent_delta(500.0, 550.0), -9.1);
    }

    #[test]
    fn report_matches_two_month_scenario() {
        let current = vec![
            inflow(1000.0, date!(2024 - 06 - 05)),
            outflow(300.0, date!(2024 - 06 - 10)),
            outflow(200.0, date!(2024 - 06 - 20)),
        ];
        let prior = vec![
            inflow(800.0, date!(2024 - 05 - 07)),
            outflow(250.0, date!(2024 - 05 - 12)),
        ];

        let report = monthly_report(&current, &prior);

        assert_eq!(report.total_inflow, 1000.0);
        assert_eq!(report.total_outflow, 500.0);
        assert_eq!(report.profit, 500.0);
        assert_eq!(report.inflow_delta, 25.0);
        assert_eq!(report.outflow_delta, 100.0);
        // Prior profit is 550, so (500 - 550) / 550 * 100 = -9.1.
        assert_eq!(report.profit_delta, -9.1);
    }

    #[test]
    fn category_breakdown_only_includes_outflows() {
        let transactions = vec![
            create_test_transaction(100.0, TransactionKind::Outflow, date!(2024 - 06 - 01), "Insumos"),
            create_test_transaction(40.0, TransactionKind::Outflow, date!(2024 - 06 - 02), "Aluguel"),
            create_test_transaction(60.0, TransactionKind::Outflow, date!(2024 - 06 - 15), "Insumos"),
            create_test_transaction(500.0, TransactionKind::Inflow, date!(2024 - 06 - 10), "Coxinha"),
        ];

        let breakdown = outflow_by_category(&transactions);

        assert_eq!(
            breakdown,
            vec![
                ("Aluguel".to_owned(), 40.0),
                ("Insumos".to_owned(), 160.0),
            ]
        );
    }

    #[test]
    fn category_breakdown_sums_to_total_outflow() {
        let transactions = vec![
            create_test_transaction(100.0, TransactionKind::Outflow, date!(2024 - 06 - 01), "Insumos"),
            create_test_transaction(40.0, TransactionKind::Outflow, date!(2024 - 06 - 02), "Aluguel"),
            create_test_transaction(25.5, TransactionKind::Outflow, date!(2024 - 06 - 03), "Energia"),
            create_test_transaction(500.0, TransactionKind::Inflow, date!(2024 - 06 - 10), "Coxinha"),
        ];

        let breakdown_total: f64 = outflow_by_category(&transactions)
            .iter()
            .map(|(_, total)| total)
            .sum();

        assert_eq!(breakdown_total, sum_period(&transactions).outflow);
    }

    #[test]
    fn daily_series_always_has_seven_days() {
        let today = date!(2024 - 06 - 15);

        let series = daily_inflow_series(&[], today);

        assert_eq!(series.len(), DAILY_SERIES_DAYS as usize);
        assert_eq!(series.first().unwrap().0, date!(2024 - 06 - 09));
        assert_eq!(series.last().unwrap().0, today);
        assert!(series.iter().all(|(_, total)| *total == 0.0));
    }

    #[test]
    fn daily_series_sums_only_matching_inflows() {
        let today = date!(2024 - 06 - 15);
        let transactions = vec![
            inflow(100.0, date!(2024 - 06 - 15)),
            inflow(50.0, date!(2024 - 06 - 15)),
            inflow(30.0, date!(2024 - 06 - 12)),
            // Outside the window.
            inflow(999.0, date!(2024 - 06 - 01)),
            // Outflows never contribute.
            outflow(75.0, date!(2024 - 06 - 15)),
        ];

        let series = daily_inflow_series(&transactions, today);

        assert_eq!(series.last(), Some(&(today, 150.0)));
        assert_eq!(series[3], (date!(2024 - 06 - 12), 30.0));
        assert_eq!(series.iter().map(|(_, total)| total).sum::<f64>(), 180.0);
    }

    #[test]
    fn daily_series_crosses_month_boundaries() {
        let series = daily_inflow_series(&[], date!(2024 - 03 - 02));

        assert_eq!(series.first().unwrap().0, date!(2024 - 02 - 25));
    }

    #[test]
    fn top_inflow_category_picks_largest_total() {
        let transactions = vec![
            create_test_transaction(100.0, TransactionKind::Inflow, date!(2024 - 06 - 01), "Coxinha"),
            create_test_transaction(80.0, TransactionKind::Inflow, date!(2024 - 06 - 02), "Pastel"),
            create_test_transaction(50.0, TransactionKind::Inflow, date!(2024 - 06 - 03), "Coxinha"),
            create_test_transaction(999.0, TransactionKind::Outflow, date!(2024 - 06 - 04), "Aluguel"),
        ];

        let top = top_inflow_category(&transactions);

        assert_eq!(top, Some(("Coxinha".to_owned(), 150.0)));
    }

    #[test]
    fn top_inflow_category_breaks_ties_by_label() {
        let transactions = vec![
            create_test_transaction(100.0, TransactionKind::Inflow, date!(2024 - 06 - 01), "Pastel"),
            create_test_transaction(100.0, TransactionKind::Inflow, date!(2024 - 06 - 02), "Coxinha"),
        ];

        let top = top_inflow_category(&transactions);

        assert_eq!(top, Some(("Coxinha".to_owned(), 100.0)));
    }

    #[test]
    fn top_inflow_category_is_none_without_sales() {
        let transactions = vec![outflow(10.0, date!(2024 - 06 - 01))];

        assert_eq!(top_inflow_category(&transactions), None);
    }

    #[test]
    fn report_windows_bound_the_current_and_prior_month() {
        let windows = report_windows(date!(2024 - 06 - 15));

        assert_eq!(windows.current_start, date!(2024 - 06 - 01));
        assert_eq!(windows.prior_start, date!(2024 - 05 - 01));
    }

    #[test]
    fn report_windows_roll_january_into_previous_year() {
        let windows = report_windows(date!(2024 - 01 - 20));

        assert_eq!(windows.current_start, date!(2024 - 01 - 01));
        assert_eq!(windows.prior_start, date!(2023 - 12 - 01));
    }
}
