// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxType;
use crate::store;
use crate::utils::{parse_datetime_opt, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

/// One finding per problem; a row can produce several.
pub fn findings(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();
    let known: HashSet<(TxType, String)> = store::list_categories(conn, None)?
        .into_iter()
        .map(|c| (c.r#type, c.name))
        .collect();

    for raw in store::list_raw_transactions(conn)? {
        let id = raw.id;
        let ty = TxType::from_str(&raw.r#type).ok();
        if ty.is_none() {
            rows.push(("unknown_type".into(), format!("#{} '{}'", id, raw.r#type)));
        }
        match store::parse_stored_amount(&raw.amount) {
            None => rows.push(("bad_amount".into(), format!("#{} '{}'", id, raw.amount))),
            Some(a) if a <= Decimal::ZERO => {
                rows.push(("non_positive_amount".into(), format!("#{} {}", id, a)))
            }
            Some(_) => {}
        }
        if parse_datetime_opt(&raw.date).is_none() {
            rows.push(("bad_date".into(), format!("#{} '{}'", id, raw.date)));
        }
        // Deleted categories are allowed; flag them so they can be recreated
        if let Some(t) = ty {
            if !known.contains(&(t, raw.category.clone())) {
                rows.push((
                    "missing_category".into(),
                    format!("#{} {} '{}'", id, t, raw.category),
                ));
            }
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = findings(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let data = rows.into_iter().map(|(k, d)| vec![k, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}
