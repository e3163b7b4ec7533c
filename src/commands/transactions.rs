// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::history::{TxFilter, group_by_day};
use crate::models::{NewTransaction, Transaction, TxType};
use crate::store;
use crate::utils::{
    fmt_datetime, fmt_money, maybe_print_json, now, optional_arg, parse_date, pretty_table,
    required_arg,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn read_fields(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let tx = NewTransaction::from_input(
        required_arg(sub, "type")?,
        required_arg(sub, "amount")?,
        required_arg(sub, "category")?,
        required_arg(sub, "date")?,
        optional_arg(sub, "description"),
    )?;
    Ok(tx)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let tx = read_fields(sub)?;
    let id = store::create_transaction(conn, &tx)?;
    println!(
        "Recorded {} {} in '{}' on {} (id {})",
        tx.r#type,
        fmt_money(&tx.amount),
        tx.category,
        fmt_datetime(&tx.date),
        id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id is required")?;
    let tx = read_fields(sub)?;
    store::update_transaction(conn, id, &tx)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id is required")?;
    store::delete_transaction(conn, id)?;
    println!("Removed transaction {}", id);
    Ok(())
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TxFilter> {
    Ok(TxFilter {
        from: optional_arg(sub, "from").map(parse_date).transpose()?,
        to: optional_arg(sub, "to").map(parse_date).transpose()?,
        tx_type: optional_arg(sub, "type").map(TxType::from_str).transpose()?,
        category: optional_arg(sub, "category").map(str::to_string),
    })
}

/// History rows for `tx list`: filtered in memory, newest first, limited.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = filter_from_args(sub)?;
    let mut rows = filter.apply(&store::list_transactions(conn)?);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn row_cells(tx: &Transaction) -> Vec<String> {
    let sign = if tx.r#type == TxType::Income { "+" } else { "-" };
    vec![
        tx.id.to_string(),
        fmt_datetime(&tx.date),
        tx.r#type.to_string(),
        tx.category.clone(),
        format!("{}{}", sign, fmt_money(&tx.amount)),
        tx.description.clone(),
    ]
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rows = query_rows(conn, sub)?;
    let headers = ["ID", "Date", "Type", "Category", "Amount", "Description"];

    if sub.get_flag("group") {
        let groups = group_by_day(&rows, now());
        if !maybe_print_json(json_flag, jsonl_flag, &groups)? {
            for g in groups {
                println!("{}", g.label);
                let data = g.transactions.iter().map(row_cells).collect();
                println!("{}", pretty_table(&headers, data));
            }
        }
        return Ok(());
    }

    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        if rows.is_empty() {
            println!("No transactions found");
            return Ok(());
        }
        let data = rows.iter().map(row_cells).collect();
        println!("{}", pretty_table(&headers, data));
    }
    Ok(())
}
