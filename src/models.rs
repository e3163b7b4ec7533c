// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;
use crate::utils::{parse_amount, parse_datetime};

/// Direction of a money movement. The amount is always stored as a
/// magnitude; the sign is implied by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
    Investment,
}

impl TxType {
    pub const ALL: [TxType; 3] = [TxType::Income, TxType::Expense, TxType::Investment];

    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
            TxType::Investment => "investment",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            "investment" => Ok(TxType::Investment),
            other => Err(InputError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub r#type: TxType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub description: String,
    pub created_at: String,
}

/// Validated input for creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub r#type: TxType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub description: String,
}

impl NewTransaction {
    /// Validates raw form fields. Every field except the description is
    /// required.
    pub fn from_input(
        r#type: &str,
        amount: &str,
        category: &str,
        date: &str,
        description: Option<&str>,
    ) -> Result<Self, InputError> {
        if amount.trim().is_empty() {
            return Err(InputError::Missing("Amount"));
        }
        let amount = parse_amount(amount)?;
        if r#type.trim().is_empty() {
            return Err(InputError::Missing("Type"));
        }
        let r#type = TxType::from_str(r#type)?;
        let category = category.trim();
        if category.is_empty() {
            return Err(InputError::Missing("Category"));
        }
        if date.trim().is_empty() {
            return Err(InputError::Missing("Date"));
        }
        let date = parse_datetime(date)?;
        Ok(NewTransaction {
            r#type,
            category: category.to_string(),
            amount,
            date,
            description: description.map(|s| s.trim().to_string()).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub r#type: TxType,
}

/// Sum of amounts for one `(type, category)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub r#type: TxType,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_investment: Decimal,
    /// Net flow of the period: income - expense - investment.
    pub balance: Decimal,
    pub transactions: Vec<Transaction>,
    pub category_breakdown: Vec<CategoryTotal>,
}

/// Labels and values ready for a pie/donut chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

/// Running totals at the end of a day that had at least one transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Relative window used to filter transactions before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1D")]
    Day,
    #[serde(rename = "1W")]
    Week,
    #[serde(rename = "1M")]
    Month,
    #[serde(rename = "1Y")]
    Year,
    #[default]
    #[serde(rename = "ALL")]
    All,
}

impl Period {
    pub const ALL_PERIODS: [Period; 5] = [
        Period::Day,
        Period::Week,
        Period::Month,
        Period::Year,
        Period::All,
    ];

    /// Case-insensitive; anything unrecognised means no filtering.
    pub fn parse(s: &str) -> Period {
        match s.trim().to_ascii_uppercase().as_str() {
            "1D" => Period::Day,
            "1W" => Period::Week,
            "1M" => Period::Month,
            "1Y" => Period::Year,
            _ => Period::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "1D",
            Period::Week => "1W",
            Period::Month => "1M",
            Period::Year => "1Y",
            Period::All => "ALL",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Period {
    fn from(s: &str) -> Self {
        Period::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parse_is_case_insensitive_and_lenient() {
        assert_eq!(Period::parse("1d"), Period::Day);
        assert_eq!(Period::parse(" 1W "), Period::Week);
        assert_eq!(Period::parse("1m"), Period::Month);
        assert_eq!(Period::parse("1Y"), Period::Year);
        assert_eq!(Period::parse("all"), Period::All);
        assert_eq!(Period::parse(""), Period::All);
        assert_eq!(Period::parse("3M"), Period::All);
    }

    #[test]
    fn tx_type_rejects_unknown_names() {
        assert_eq!("Income".parse::<TxType>().unwrap(), TxType::Income);
        assert_eq!(" investment ".parse::<TxType>().unwrap(), TxType::Investment);
        assert!("transfer".parse::<TxType>().is_err());
    }

    #[test]
    fn new_transaction_validates_required_fields() {
        let ok = NewTransaction::from_input("expense", "1.500", " Rent ", "2024-01-10", None)
            .unwrap();
        assert_eq!(ok.category, "Rent");
        assert_eq!(ok.amount, Decimal::from(1500));
        assert_eq!(ok.description, "");

        assert_eq!(
            NewTransaction::from_input("expense", "", "Rent", "2024-01-10", None),
            Err(InputError::Missing("Amount"))
        );
        assert_eq!(
            NewTransaction::from_input("expense", "0", "Rent", "2024-01-10", None),
            Err(InputError::InvalidAmount("0".into()))
        );
        assert_eq!(
            NewTransaction::from_input("expense", "10", "  ", "2024-01-10", None),
            Err(InputError::Missing("Category"))
        );
        assert_eq!(
            NewTransaction::from_input("expense", "10", "Rent", "", None),
            Err(InputError::Missing("Date"))
        );
        assert!(matches!(
            NewTransaction::from_input("gift", "10", "Rent", "2024-01-10", None),
            Err(InputError::UnknownType(_))
        ));
    }
}
