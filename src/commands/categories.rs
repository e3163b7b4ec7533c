// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxType;
use crate::store;
use crate::utils::{maybe_print_json, optional_arg, pretty_table, required_arg};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required_arg(sub, "name")?;
            let ty = TxType::from_str(required_arg(sub, "type")?)?;
            let cat = store::create_category(conn, name, ty)?;
            println!("Added {} category '{}' (id {})", cat.r#type, cat.name, cat.id);
        }
        Some(("list", sub)) => {
            let ty = optional_arg(sub, "type").map(TxType::from_str).transpose()?;
            let cats = store::list_categories(conn, ty)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| vec![c.id.to_string(), c.name, c.r#type.to_string()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Type"], data));
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("id is required")?;
            store::delete_category(conn, id)?;
            println!("Removed category {}", id);
        }
        Some(("defaults", _)) => {
            let added = store::init_default_categories(conn)?;
            if added == 0 {
                println!("Categories already exist; nothing added");
            } else {
                println!("Added {} default categories", added);
            }
        }
        _ => {}
    }
    Ok(())
}
