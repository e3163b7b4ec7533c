// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::stats::compute_global_balance;
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_balance, pretty_table, required_arg};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => {
            let amount = parse_balance(required_arg(sub, "amount")?)?;
            store::set_initial_balance(conn, amount)?;
            println!("Initial balance set to {}", fmt_money(&amount));
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BalanceSummary {
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
}

pub fn summary(conn: &Connection) -> Result<BalanceSummary> {
    let initial_balance = store::get_initial_balance(conn)?;
    let transactions = store::list_transactions(conn)?;
    Ok(BalanceSummary {
        initial_balance,
        current_balance: compute_global_balance(&transactions, initial_balance),
    })
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let s = summary(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "{}",
            pretty_table(
                &["Initial Balance", "Current Balance"],
                vec![vec![fmt_money(&s.initial_balance), fmt_money(&s.current_balance)]],
            )
        );
    }
    Ok(())
}
