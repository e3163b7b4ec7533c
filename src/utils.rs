// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::InputError;

pub const CURRENCY_SYMBOL: &str = "Rp";

// 1.500.000 or 1.500.000,50
static GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{3})+(,\d+)?$").expect("static regex"));

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if GROUPED.is_match(s) {
        return Decimal::from_str(&s.replace('.', "").replace(',', ".")).ok();
    }
    Decimal::from_str(s).ok()
}

/// Transaction amount as typed by a user. Must be strictly positive.
pub fn parse_amount(s: &str) -> Result<Decimal, InputError> {
    match parse_number(s) {
        Some(d) if d > Decimal::ZERO => Ok(d),
        _ => Err(InputError::InvalidAmount(s.trim().to_string())),
    }
}

/// Initial balance as typed by a user. Zero is allowed, negatives are not.
pub fn parse_balance(s: &str) -> Result<Decimal, InputError> {
    match parse_number(s) {
        Some(d) if d >= Decimal::ZERO => Ok(d),
        _ => Err(InputError::InvalidBalance(s.trim().to_string())),
    }
}

/// Strict date input: a bare day means local midnight.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, InputError> {
    parse_datetime_opt(s).ok_or_else(|| InputError::InvalidDate(s.trim().to_string()))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(s.trim().to_string()))
}

pub fn parse_datetime_opt(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

pub fn fmt_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Axis label for chart points, e.g. "Jan 5".
pub fn fmt_short_date(d: &NaiveDate) -> String {
    d.format("%b %-d").to_string()
}

/// Whole-unit money with dot thousand separators: `Rp 1.500.000`.
pub fn fmt_money(d: &Decimal) -> String {
    let rounded = d.round_dp(0);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{} {}", sign, CURRENCY_SYMBOL, grouped)
}

/// Net-flow style money: explicit `+` for non-negative values.
pub fn fmt_signed_money(d: &Decimal) -> String {
    if d.is_sign_negative() && !d.is_zero() {
        fmt_money(d)
    } else {
        format!("+{}", fmt_money(d))
    }
}

pub fn required_arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("--{} is required", name))
}

pub fn optional_arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_plain_and_grouped_input() {
        assert_eq!(parse_amount("1500").unwrap(), Decimal::from(1500));
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::from_str("12.50").unwrap());
        assert_eq!(parse_amount("1.500.000").unwrap(), Decimal::from(1_500_000));
        assert_eq!(
            parse_amount("2.000,75").unwrap(),
            Decimal::from_str("2000.75").unwrap()
        );
    }

    #[test]
    fn amount_rejects_zero_negative_and_garbage() {
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn balance_allows_zero_only_downwards() {
        assert_eq!(parse_balance("0").unwrap(), Decimal::ZERO);
        assert!(parse_balance("-1").is_err());
    }

    #[test]
    fn datetime_accepts_bare_days_as_midnight() {
        let dt = parse_datetime("2024-01-10").unwrap();
        assert_eq!(fmt_datetime(&dt), "2024-01-10 00:00:00");
        let dt = parse_datetime("2024-01-10T08:15").unwrap();
        assert_eq!(fmt_datetime(&dt), "2024-01-10 08:15:00");
        assert!(parse_datetime("10/01/2024").is_err());
    }

    #[test]
    fn money_uses_dot_grouping() {
        assert_eq!(fmt_money(&Decimal::from(1_500_000)), "Rp 1.500.000");
        assert_eq!(fmt_money(&Decimal::from(-400)), "-Rp 400");
        assert_eq!(fmt_money(&Decimal::ZERO), "Rp 0");
        assert_eq!(fmt_signed_money(&Decimal::from(1000)), "+Rp 1.000");
        assert_eq!(fmt_signed_money(&Decimal::from(-1000)), "-Rp 1.000");
    }

    #[test]
    fn short_date_label() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(fmt_short_date(&d), "Jan 5");
    }
}
