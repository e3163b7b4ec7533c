// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::{Dashboard, DashboardState};
use crate::models::{ChartSeries, Period, TxType};
use crate::stats::{build_cumulative_time_series, compute_period_statistics, top_n_with_others};
use crate::store;
use crate::utils::{
    fmt_money, fmt_short_date, fmt_signed_money, maybe_print_json, now, optional_arg,
    pretty_table,
};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_of(sub: &clap::ArgMatches) -> Period {
    sub.get_one::<String>("period")
        .map(|s| Period::parse(s))
        .unwrap_or_default()
}

/// Reads a fresh ledger snapshot and aggregates it for `period`.
pub fn load_dashboard(conn: &Connection, period: Period, at: NaiveDateTime) -> Result<Dashboard> {
    let transactions = store::list_transactions(conn)?;
    let initial_balance = store::get_initial_balance(conn)?;
    Ok(Dashboard::build(&transactions, initial_balance, period, at))
}

/// Refreshes `state` from a fresh ledger snapshot for its selected period.
pub fn refresh_dashboard<'a>(
    conn: &Connection,
    state: &'a mut DashboardState,
    at: NaiveDateTime,
) -> Result<&'a Dashboard> {
    let transactions = store::list_transactions(conn)?;
    let initial_balance = store::get_initial_balance(conn)?;
    Ok(state.refresh(&transactions, initial_balance, at))
}

fn pie_rows(series: &ChartSeries) -> Vec<Vec<String>> {
    series
        .labels
        .iter()
        .zip(&series.values)
        .map(|(l, v)| vec![l.clone(), fmt_money(v)])
        .collect()
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut state = DashboardState::new(period_of(sub));
    let dash = refresh_dashboard(conn, &mut state, now())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }

    let trend_word = if dash.stats.balance.is_sign_negative() && !dash.stats.balance.is_zero() {
        "down"
    } else {
        "up"
    };
    println!(
        "{}",
        pretty_table(
            &["", "Total Balance", "Income", "Expense", "Investment"],
            summary_rows(dash),
        )
    );
    println!(
        "Net cashflow ({}): {} ({})",
        dash.period,
        fmt_signed_money(&dash.stats.balance),
        trend_word
    );
    if !dash.trend.is_empty() {
        println!("{}", pretty_table(&["Day", "Income", "Expense", "Balance"], trend_rows(&dash)));
    }
    if !dash.income_pie.labels.is_empty() {
        println!("{}", pretty_table(&["Income Category", "Total"], pie_rows(&dash.income_pie)));
    }
    if !dash.expense_pie.labels.is_empty() {
        println!("{}", pretty_table(&["Expense Category", "Total"], pie_rows(&dash.expense_pie)));
    }
    if !dash.investment_pie.labels.is_empty() {
        println!(
            "{}",
            pretty_table(&["Investment Category", "Total"], pie_rows(&dash.investment_pie))
        );
    }
    Ok(())
}

/// All-time figures on the first row, the selected period on the second.
pub fn summary_rows(dash: &Dashboard) -> Vec<Vec<String>> {
    vec![
        vec![
            "All time".to_string(),
            fmt_money(&dash.global_balance),
            fmt_money(&dash.all_time.total_income),
            fmt_money(&dash.all_time.total_expense),
            fmt_money(&dash.all_time.total_investment),
        ],
        vec![
            dash.period.to_string(),
            String::new(),
            fmt_money(&dash.stats.total_income),
            fmt_money(&dash.stats.total_expense),
            fmt_money(&dash.stats.total_investment),
        ],
    ]
}

fn trend_rows(dash: &Dashboard) -> Vec<Vec<String>> {
    dash.trend
        .iter()
        .map(|p| {
            vec![
                fmt_short_date(&p.date),
                fmt_money(&p.income),
                fmt_money(&p.expense),
                fmt_money(&p.balance),
            ]
        })
        .collect()
}

#[derive(Serialize)]
struct Totals {
    period: Period,
    total_income: rust_decimal::Decimal,
    total_expense: rust_decimal::Decimal,
    total_investment: rust_decimal::Decimal,
    balance: rust_decimal::Decimal,
    transactions: usize,
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_of(sub);
    let s = compute_period_statistics(&store::list_transactions(conn)?, period, now());
    let totals = Totals {
        period,
        total_income: s.total_income,
        total_expense: s.total_expense,
        total_investment: s.total_investment,
        balance: s.balance,
        transactions: s.transactions.len(),
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        println!(
            "{}",
            pretty_table(
                &["Period", "Income", "Expense", "Investment", "Net", "Count"],
                vec![vec![
                    period.to_string(),
                    fmt_money(&totals.total_income),
                    fmt_money(&totals.total_expense),
                    fmt_money(&totals.total_investment),
                    fmt_signed_money(&totals.balance),
                    totals.transactions.to_string(),
                ]],
            )
        );
    }
    Ok(())
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = compute_period_statistics(&store::list_transactions(conn)?, period_of(sub), now());

    if let Some(ty) = optional_arg(sub, "type").map(TxType::from_str).transpose()? {
        let top = sub.get_one::<usize>("top").copied().unwrap_or(5);
        let series = top_n_with_others(&s.category_breakdown, ty, top);
        if !maybe_print_json(json_flag, jsonl_flag, &series)? {
            println!("{}", pretty_table(&["Category", "Total"], pie_rows(&series)));
        }
        return Ok(());
    }

    let mut items = s.category_breakdown;
    items.sort_by(|a, b| a.r#type.cmp(&b.r#type).then(b.total.cmp(&a.total)));
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        let data = items
            .into_iter()
            .map(|c| vec![c.r#type.to_string(), c.category, fmt_money(&c.total)])
            .collect();
        println!("{}", pretty_table(&["Type", "Category", "Total"], data));
    }
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let s = compute_period_statistics(&store::list_transactions(conn)?, period_of(sub), now());
    let points = build_cumulative_time_series(&s.transactions);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let data = points
            .iter()
            .map(|p| {
                vec![
                    p.date.to_string(),
                    fmt_money(&p.income),
                    fmt_money(&p.expense),
                    fmt_money(&p.balance),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Day", "Income", "Expense", "Balance"], data));
    }
    Ok(())
}
