// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregation over an in-memory snapshot of the ledger.
//!
//! Everything here is a pure function of its arguments: callers pass the
//! transactions, the initial balance and "now" explicitly, nothing is read
//! from the store or the clock, and inputs are never mutated.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::models::{
    CategoryTotal, ChartSeries, Period, Statistics, Transaction, TrendPoint, TxType,
};

pub const DEFAULT_TOP_N: usize = 5;
pub const OTHERS_LABEL: &str = "Others";

impl Period {
    /// Inclusive lower bound on `Transaction::date`, or `None` for no bound.
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Period::Day => Some(now.date().and_time(NaiveTime::MIN)),
            Period::Week => Some(now - Duration::days(7)),
            Period::Month => Some(shift_months(now, -1)),
            Period::Year => Some(shift_months(now, -12)),
            Period::All => None,
        }
    }

    pub fn contains(&self, date: NaiveDateTime, now: NaiveDateTime) -> bool {
        self.cutoff(now).is_none_or(|start| date >= start)
    }
}

/// Moves by whole months keeping the day of month. A day that does not
/// exist in the target month spills over into the next one, so Mar 31
/// minus one month lands on Mar 3 (Mar 2 in leap years).
fn shift_months(dt: NaiveDateTime, months: i32) -> NaiveDateTime {
    let total = dt.year() * 12 + dt.month0() as i32 + months;
    let (year, month) = (total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(dt.day0()))))
        .map(|date| date.and_time(dt.time()))
        .unwrap_or(dt)
}

fn signed(tx: &Transaction) -> Decimal {
    match tx.r#type {
        TxType::Income => tx.amount,
        TxType::Expense | TxType::Investment => -tx.amount,
    }
}

/// Current wealth: initial balance plus every income, minus every expense
/// and investment. Always all-time.
pub fn compute_global_balance(transactions: &[Transaction], initial_balance: Decimal) -> Decimal {
    transactions
        .iter()
        .fold(initial_balance, |acc, tx| acc + signed(tx))
}

/// Totals for the transactions dated on or after the period cutoff.
///
/// `balance` is the net flow of the window and does not include the initial
/// balance.
pub fn compute_period_statistics(
    transactions: &[Transaction],
    period: Period,
    now: NaiveDateTime,
) -> Statistics {
    let filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| period.contains(tx.date, now))
        .cloned()
        .collect();

    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut investment = Decimal::ZERO;
    for tx in &filtered {
        match tx.r#type {
            TxType::Income => income += tx.amount,
            TxType::Expense => expense += tx.amount,
            TxType::Investment => investment += tx.amount,
        }
    }

    let category_breakdown = build_category_breakdown(&filtered);
    Statistics {
        total_income: income,
        total_expense: expense,
        total_investment: investment,
        balance: income - expense - investment,
        transactions: filtered,
        category_breakdown,
    }
}

/// One entry per distinct `(type, category)` pair, in order of first
/// appearance.
pub fn build_category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut index: HashMap<(TxType, &str), usize> = HashMap::new();
    let mut out: Vec<CategoryTotal> = Vec::new();
    for tx in transactions {
        let key = (tx.r#type, tx.category.as_str());
        match index.get(&key) {
            Some(&i) => out[i].total += tx.amount,
            None => {
                index.insert(key, out.len());
                out.push(CategoryTotal {
                    category: tx.category.clone(),
                    r#type: tx.r#type,
                    total: tx.amount,
                });
            }
        }
    }
    out
}

/// Largest `n` categories of one type, with the rest folded into a single
/// "Others" slice when there is a rest.
pub fn top_n_with_others(breakdown: &[CategoryTotal], tx_type: TxType, n: usize) -> ChartSeries {
    let mut items: Vec<&CategoryTotal> =
        breakdown.iter().filter(|c| c.r#type == tx_type).collect();
    items.sort_by(|a, b| b.total.cmp(&a.total));

    let split = n.min(items.len());
    let (top, rest) = items.split_at(split);
    let mut series = ChartSeries {
        labels: top.iter().map(|c| c.category.clone()).collect(),
        values: top.iter().map(|c| c.total).collect(),
    };
    if !rest.is_empty() {
        series.labels.push(OTHERS_LABEL.to_string());
        series.values.push(rest.iter().map(|c| c.total).sum());
    }
    series
}

/// Running income/expense totals per calendar day, oldest first.
///
/// Investments do not move the running balance here (unlike
/// `compute_period_statistics`); a day that only has investments still
/// gets a point carrying the previous totals.
pub fn build_cumulative_time_series(transactions: &[Transaction]) -> Vec<TrendPoint> {
    let mut days: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let day = days
            .entry(tx.date.date())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.r#type {
            TxType::Income => day.0 += tx.amount,
            TxType::Expense => day.1 += tx.amount,
            TxType::Investment => {}
        }
    }

    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    days.into_iter()
        .map(|(date, (day_income, day_expense))| {
            income += day_income;
            expense += day_expense;
            TrendPoint {
                date,
                income,
                expense,
                balance: income - expense,
            }
        })
        .collect()
}
