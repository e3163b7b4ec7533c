// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{fmt_datetime, required_arg};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required_arg(sub, "format")?.trim().to_lowercase();
    let out = required_arg(sub, "out")?.trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let mut rows = store::list_transactions(conn)?;
    rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    if fmt == "csv" {
        let mut wtr =
            csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
        wtr.write_record([
            "id",
            "date",
            "type",
            "category",
            "amount",
            "description",
            "created_at",
        ])?;
        for tx in &rows {
            wtr.write_record([
                tx.id.to_string(),
                fmt_datetime(&tx.date),
                tx.r#type.to_string(),
                tx.category.clone(),
                tx.amount.to_string(),
                tx.description.clone(),
                tx.created_at.clone(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .iter()
            .map(|tx| {
                json!({
                    "id": tx.id,
                    "date": fmt_datetime(&tx.date),
                    "type": tx.r#type,
                    "category": tx.category,
                    "amount": tx.amount.to_string(),
                    "description": tx.description,
                    "created_at": tx.created_at,
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)
            .with_context(|| format!("Write {}", out))?;
    }
    tracing::debug!(count = rows.len(), format = %fmt, "transactions exported");
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
