// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{Transaction, TxType};

/// History screen filter. Date bounds are inclusive and compare whole days.
#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub tx_type: Option<TxType>,
    pub category: Option<String>,
}

impl TxFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let day = tx.date.date();
        self.from.is_none_or(|from| day >= from)
            && self.to.is_none_or(|to| day <= to)
            && self.tx_type.is_none_or(|t| tx.r#type == t)
            && self.category.as_deref().is_none_or(|c| tx.category == c)
    }

    /// Matching transactions, newest first.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub label: String,
    pub transactions: Vec<Transaction>,
}

pub fn relative_day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        day.format("%b %-d, %Y").to_string()
    }
}

/// Buckets transactions by calendar day, most recent day first. Order
/// inside a bucket follows the input.
pub fn group_by_day(transactions: &[Transaction], now: NaiveDateTime) -> Vec<DayGroup> {
    let today = now.date();
    let mut groups: Vec<DayGroup> = Vec::new();
    for tx in transactions {
        let day = tx.date.date();
        match groups.iter_mut().find(|g| g.date == day) {
            Some(group) => group.transactions.push(tx.clone()),
            None => groups.push(DayGroup {
                date: day,
                label: relative_day_label(day, today),
                transactions: vec![tx.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| b.date.cmp(&a.date));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn tx(id: i64, ty: TxType, category: &str, date: &str) -> Transaction {
        Transaction {
            id,
            r#type: ty,
            category: category.into(),
            amount: Decimal::from(10),
            date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").unwrap(),
            description: String::new(),
            created_at: String::new(),
        }
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            tx(1, TxType::Expense, "Rent", "2024-01-01 10:00:00"),
            tx(2, TxType::Income, "Salary", "2024-01-14 09:00:00"),
            tx(3, TxType::Expense, "Food", "2024-01-15 12:00:00"),
            tx(4, TxType::Expense, "Food", "2024-01-15 19:00:00"),
        ]
    }

    #[test]
    fn filter_by_inclusive_day_range_and_fields() {
        let f = TxFilter {
            from: NaiveDate::from_ymd_opt(2024, 1, 14),
            to: NaiveDate::from_ymd_opt(2024, 1, 15),
            ..Default::default()
        };
        let ids: Vec<i64> = f.apply(&ledger()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);

        let f = TxFilter {
            tx_type: Some(TxType::Expense),
            category: Some("Food".into()),
            ..Default::default()
        };
        assert_eq!(f.apply(&ledger()).len(), 2);
        assert_eq!(TxFilter::default().apply(&ledger()).len(), 4);
    }

    #[test]
    fn groups_carry_relative_labels() {
        let now = NaiveDateTime::parse_from_str("2024-01-15 20:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let sorted = TxFilter::default().apply(&ledger());
        let groups = group_by_day(&sorted, now);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday", "Jan 1, 2024"]);
        assert_eq!(groups[0].transactions.len(), 2);
        assert_eq!(groups[0].transactions[0].id, 4);
    }
}
