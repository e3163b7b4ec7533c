// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger, category registry and settings persistence.
//!
//! Reads go through a coercion step: a stored amount that does not parse
//! becomes zero and a stored date that does not parse becomes the time of
//! the read. Rows are never rejected for those reasons, so one bad record
//! cannot blank a dashboard.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{InputError, StoreError};
use crate::models::{Category, NewTransaction, Transaction, TxType};
use crate::utils::{fmt_datetime, now, parse_datetime_opt};

const INITIAL_BALANCE_KEY: &str = "initial_balance";

pub const DEFAULT_INCOME_CATEGORIES: [&str; 5] =
    ["Salary", "Freelance", "Investments", "Business", "Gift"];

pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 9] = [
    "Groceries",
    "Rent",
    "Transport",
    "Utilities",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Food & Dining",
    "Education",
];

/// A transaction row exactly as stored.
#[derive(Debug, Clone)]
pub struct RawTransaction {
    pub id: i64,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub date: String,
    pub description: String,
    pub created_at: String,
}

impl RawTransaction {
    /// Typed view of the row. `None` only when the type is outside the
    /// closed set.
    pub fn coerce(&self, read_at: NaiveDateTime) -> Option<Transaction> {
        let r#type = match TxType::from_str(&self.r#type) {
            Ok(t) => t,
            Err(_) => {
                tracing::warn!(id = self.id, tx_type = %self.r#type, "skipping transaction with unknown type");
                return None;
            }
        };
        let amount = parse_stored_amount(&self.amount).unwrap_or_else(|| {
            tracing::warn!(id = self.id, amount = %self.amount, "unparseable amount, using 0");
            Decimal::ZERO
        });
        let date = parse_datetime_opt(&self.date).unwrap_or_else(|| {
            tracing::warn!(id = self.id, date = %self.date, "unparseable date, using read time");
            read_at
        });
        Some(Transaction {
            id: self.id,
            r#type,
            category: self.category.clone(),
            amount,
            date,
            description: self.description.clone(),
            created_at: self.created_at.clone(),
        })
    }
}

/// Plain or scientific notation (`1500`, `12.5`, `1e3`).
pub fn parse_stored_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(&s.to_ascii_lowercase()))
        .ok()
}

fn raw_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok(RawTransaction {
        id: r.get(0)?,
        r#type: r.get::<_, Option<String>>(1)?.unwrap_or_default(),
        category: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
        amount: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
        date: r.get::<_, Option<String>>(4)?.unwrap_or_default(),
        description: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
        created_at: r.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

const RAW_COLUMNS: &str = "id, type, category, CAST(amount AS TEXT), CAST(date AS TEXT), description, created_at";

pub fn list_raw_transactions(conn: &Connection) -> Result<Vec<RawTransaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions ORDER BY id",
        RAW_COLUMNS
    ))?;
    let rows = stmt.query_map([], raw_from_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

/// Full scan of the ledger, newest first.
pub fn list_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let read_at = now();
    let mut data: Vec<Transaction> = list_raw_transactions(conn)
        .context("Read transactions")?
        .iter()
        .filter_map(|raw| raw.coerce(read_at))
        .collect();
    data.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    Ok(data)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM transactions WHERE id=?1", RAW_COLUMNS),
            params![id],
            raw_from_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound {
            kind: "Transaction",
            id,
        })?;
    raw.coerce(now())
        .ok_or_else(|| StoreError::Malformed { id }.into())
}

pub fn create_transaction(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(type, category, amount, date, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            tx.r#type.as_str(),
            tx.category,
            tx.amount.to_string(),
            fmt_datetime(&tx.date),
            tx.description
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, tx_type = %tx.r#type, amount = %tx.amount, "transaction created");
    Ok(id)
}

/// Replaces every user-editable field; `created_at` is left untouched.
pub fn update_transaction(conn: &Connection, id: i64, tx: &NewTransaction) -> Result<()> {
    let changed = conn.execute(
        "UPDATE transactions SET type=?1, category=?2, amount=?3, date=?4, description=?5
         WHERE id=?6",
        params![
            tx.r#type.as_str(),
            tx.category,
            tx.amount.to_string(),
            fmt_datetime(&tx.date),
            tx.description,
            id
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Transaction",
            id,
        }
        .into());
    }
    tracing::debug!(id, "transaction updated");
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Transaction",
            id,
        }
        .into());
    }
    tracing::debug!(id, "transaction deleted");
    Ok(())
}

/// Categories sorted by name, optionally restricted to one type.
pub fn list_categories(conn: &Connection, tx_type: Option<TxType>) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, type FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, name, ty) = row?;
        let Ok(r#type) = TxType::from_str(&ty) else {
            tracing::warn!(id, tx_type = %ty, "skipping category with unknown type");
            continue;
        };
        if tx_type.is_some_and(|t| t != r#type) {
            continue;
        }
        data.push(Category { id, name, r#type });
    }
    data.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(data)
}

pub fn create_category(conn: &Connection, name: &str, tx_type: TxType) -> Result<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InputError::Missing("Category name").into());
    }
    conn.execute(
        "INSERT INTO categories(name, type) VALUES (?1, ?2)",
        params![name, tx_type.as_str()],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, name, tx_type = %tx_type, "category created");
    Ok(Category {
        id,
        name: name.to_string(),
        r#type: tx_type,
    })
}

/// Transactions that still name the category keep it as plain text.
pub fn delete_category(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Category",
            id,
        }
        .into());
    }
    tracing::debug!(id, "category deleted");
    Ok(())
}

/// Seeds the default income and expense categories when the registry is
/// empty. Returns how many were added.
pub fn init_default_categories(conn: &Connection) -> Result<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if existing > 0 {
        return Ok(0);
    }
    let mut added = 0;
    for name in DEFAULT_INCOME_CATEGORIES {
        create_category(conn, name, TxType::Income)?;
        added += 1;
    }
    for name in DEFAULT_EXPENSE_CATEGORIES {
        create_category(conn, name, TxType::Expense)?;
        added += 1;
    }
    tracing::info!(added, "default categories initialized");
    Ok(added)
}

/// Zero until set. A stored value that does not parse also reads as zero.
pub fn get_initial_balance(conn: &Connection) -> Result<Decimal> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![INITIAL_BALANCE_KEY],
            |r| r.get(0),
        )
        .optional()?;
    Ok(match v {
        Some(s) => Decimal::from_str(s.trim()).unwrap_or_else(|_| {
            tracing::warn!(value = %s, "unparseable initial balance, using 0");
            Decimal::ZERO
        }),
        None => Decimal::ZERO,
    })
}

pub fn set_initial_balance(conn: &Connection, amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(InputError::InvalidBalance(amount.to_string()).into());
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![INITIAL_BALANCE_KEY, amount.to_string()],
    )?;
    tracing::debug!(%amount, "initial balance set");
    Ok(())
}
