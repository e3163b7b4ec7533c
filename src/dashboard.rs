// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ChartSeries, Period, Statistics, Transaction, TrendPoint, TxType};
use crate::stats::{
    DEFAULT_TOP_N, build_cumulative_time_series, compute_global_balance,
    compute_period_statistics, top_n_with_others,
};

/// Everything the dashboard screen shows for one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub period: Period,
    /// Initial balance plus the all-time net flow.
    pub global_balance: Decimal,
    /// All-time totals for the summary cards.
    pub all_time: Statistics,
    /// Totals for the selected period.
    pub stats: Statistics,
    pub trend: Vec<TrendPoint>,
    pub income_pie: ChartSeries,
    pub expense_pie: ChartSeries,
    pub investment_pie: ChartSeries,
}

impl Dashboard {
    pub fn build(
        transactions: &[Transaction],
        initial_balance: Decimal,
        period: Period,
        now: NaiveDateTime,
    ) -> Dashboard {
        let all_time = compute_period_statistics(transactions, Period::All, now);
        let stats = compute_period_statistics(transactions, period, now);
        let trend = build_cumulative_time_series(&stats.transactions);
        let income_pie = top_n_with_others(&stats.category_breakdown, TxType::Income, DEFAULT_TOP_N);
        let expense_pie =
            top_n_with_others(&stats.category_breakdown, TxType::Expense, DEFAULT_TOP_N);
        let investment_pie =
            top_n_with_others(&stats.category_breakdown, TxType::Investment, DEFAULT_TOP_N);
        Dashboard {
            period,
            global_balance: compute_global_balance(transactions, initial_balance),
            all_time,
            stats,
            trend,
            income_pie,
            expense_pie,
            investment_pie,
        }
    }
}

/// Selected period and the last computed dashboard, threaded through each
/// refresh instead of living in globals.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub period: Period,
    pub last: Option<Dashboard>,
}

impl DashboardState {
    pub fn new(period: Period) -> Self {
        DashboardState { period, last: None }
    }

    /// Changing the period invalidates the cached dashboard.
    pub fn select_period(&mut self, period: Period) {
        if self.period != period {
            self.period = period;
            self.last = None;
        }
    }

    /// Recomputes from a fresh snapshot of the ledger.
    pub fn refresh(
        &mut self,
        transactions: &[Transaction],
        initial_balance: Decimal,
        now: NaiveDateTime,
    ) -> &Dashboard {
        self.last
            .insert(Dashboard::build(transactions, initial_balance, self.period, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, ty: TxType, category: &str, amount: i64, date: &str) -> Transaction {
        Transaction {
            id,
            r#type: ty,
            category: category.into(),
            amount: Decimal::from(amount),
            date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").unwrap(),
            description: String::new(),
            created_at: String::new(),
        }
    }

    #[test]
    fn dashboard_mixes_all_time_and_period_figures() {
        let now = NaiveDateTime::parse_from_str("2024-01-15 12:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let txs = vec![
            tx(1, TxType::Income, "Salary", 1000, "2023-12-01 09:00:00"),
            tx(2, TxType::Expense, "Rent", 400, "2024-01-12 09:00:00"),
            tx(3, TxType::Investment, "Gold", 200, "2024-01-13 09:00:00"),
        ];
        let mut state = DashboardState::new(Period::Week);
        let dash = state.refresh(&txs, Decimal::from(100), now).clone();

        assert_eq!(dash.global_balance, Decimal::from(500));
        assert_eq!(dash.all_time.total_income, Decimal::from(1000));
        assert_eq!(dash.stats.total_income, Decimal::ZERO);
        assert_eq!(dash.stats.balance, Decimal::from(-600));
        assert_eq!(dash.trend.len(), 2);
        assert_eq!(dash.expense_pie.labels, vec!["Rent"]);
        assert!(dash.income_pie.labels.is_empty());
        assert_eq!(dash.investment_pie.labels, vec!["Gold"]);
        assert_eq!(dash.investment_pie.values, vec![Decimal::from(200)]);

        state.select_period(Period::All);
        assert!(state.last.is_none());
        let dash = state.refresh(&txs, Decimal::from(100), now);
        assert_eq!(dash.stats.balance, Decimal::from(400));
    }
}
