// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dompet::commands::doctor;
use dompet::error::StoreError;
use dompet::models::{NewTransaction, TxType};
use dompet::{db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn insert_raw(conn: &Connection, ty: &str, category: &str, amount: &str, date: &str) {
    conn.execute(
        "INSERT INTO transactions(type, category, amount, date) VALUES (?1, ?2, ?3, ?4)",
        (ty, category, amount, date),
    )
    .unwrap();
}

#[test]
fn read_boundary_coerces_bad_amounts_and_dates() {
    let conn = db::open_in_memory().unwrap();
    insert_raw(&conn, "income", "Salary", "1000", "2024-01-10");
    insert_raw(&conn, "expense", "Food", "abc", "2024-01-11 08:00:00");
    insert_raw(&conn, "expense", "Food", "25", "not a date");

    let before = dompet::utils::now();
    let rows = store::list_transactions(&conn).unwrap();
    assert_eq!(rows.len(), 3);

    let bad_amount = rows.iter().find(|t| t.id == 2).unwrap();
    assert_eq!(bad_amount.amount, Decimal::ZERO);

    let bad_date = rows.iter().find(|t| t.id == 3).unwrap();
    assert!(bad_date.date >= before);
    // read time is the newest date, so it sorts first
    assert_eq!(rows[0].id, 3);
}

#[test]
fn scientific_notation_amounts_are_read_not_zeroed() {
    let conn = db::open_in_memory().unwrap();
    insert_raw(&conn, "income", "Salary", "1e3", "2024-01-10");
    insert_raw(&conn, "expense", "Food", " 2.5E2 ", "2024-01-11");
    let rows = store::list_transactions(&conn).unwrap();
    assert_eq!(rows[0].amount, Decimal::from(250));
    assert_eq!(rows[1].amount, Decimal::from(1000));
    assert!(doctor::findings(&conn).unwrap().iter().all(|(k, _)| k != "bad_amount"));
}

#[test]
fn get_of_unknown_type_row_is_a_malformed_record() {
    let conn = db::open_in_memory().unwrap();
    insert_raw(&conn, "transfer", "Bank", "10", "2024-01-10");
    let err = store::get_transaction(&conn, 1).unwrap_err();
    assert_eq!(
        err.downcast_ref::<StoreError>(),
        Some(&StoreError::Malformed { id: 1 })
    );
    assert!(err.downcast_ref::<dompet::error::InputError>().is_none());
}

#[test]
fn unknown_types_are_skipped_not_fatal() {
    let conn = db::open_in_memory().unwrap();
    insert_raw(&conn, "transfer", "Bank", "10", "2024-01-10");
    insert_raw(&conn, "Income", "Salary", "10", "2024-01-10");
    let rows = store::list_transactions(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].r#type, TxType::Income);
}

#[test]
fn update_and_delete_missing_ids_report_not_found() {
    let conn = db::open_in_memory().unwrap();
    let tx = NewTransaction::from_input("income", "10", "Gift", "2024-01-01", None).unwrap();
    let err = store::update_transaction(&conn, 42, &tx).unwrap_err();
    assert_eq!(
        err.downcast_ref::<StoreError>(),
        Some(&StoreError::NotFound {
            kind: "Transaction",
            id: 42
        })
    );
    assert!(store::delete_transaction(&conn, 42).is_err());
    assert!(store::delete_category(&conn, 42).is_err());
    assert!(store::get_transaction(&conn, 42).is_err());
}

#[test]
fn categories_filter_by_type_and_sort_by_name() {
    let conn = db::open_in_memory().unwrap();
    store::create_category(&conn, "Salary", TxType::Income).unwrap();
    store::create_category(&conn, "rent", TxType::Expense).unwrap();
    store::create_category(&conn, "Bills", TxType::Expense).unwrap();
    store::create_category(&conn, "Bills", TxType::Expense).unwrap();
    store::create_category(&conn, "Gold", TxType::Investment).unwrap();
    assert!(store::create_category(&conn, "   ", TxType::Expense).is_err());

    let expense: Vec<String> = store::list_categories(&conn, Some(TxType::Expense))
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(expense, vec!["Bills", "Bills", "rent"]);
    assert_eq!(store::list_categories(&conn, None).unwrap().len(), 5);

    let gold = store::list_categories(&conn, Some(TxType::Investment)).unwrap();
    store::delete_category(&conn, gold[0].id).unwrap();
    assert!(
        store::list_categories(&conn, Some(TxType::Investment))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn default_categories_seed_only_an_empty_registry() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(store::init_default_categories(&conn).unwrap(), 14);
    assert_eq!(store::init_default_categories(&conn).unwrap(), 0);
    assert_eq!(
        store::list_categories(&conn, Some(TxType::Income))
            .unwrap()
            .len(),
        5
    );
}

#[test]
fn initial_balance_defaults_to_zero_and_rejects_negatives() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(store::get_initial_balance(&conn).unwrap(), Decimal::ZERO);
    store::set_initial_balance(&conn, Decimal::from_str("2500000.50").unwrap()).unwrap();
    assert_eq!(
        store::get_initial_balance(&conn).unwrap(),
        Decimal::from_str("2500000.50").unwrap()
    );
    assert!(store::set_initial_balance(&conn, Decimal::from(-1)).is_err());

    conn.execute(
        "UPDATE settings SET value='garbage' WHERE key='initial_balance'",
        [],
    )
    .unwrap();
    assert_eq!(store::get_initial_balance(&conn).unwrap(), Decimal::ZERO);
}

#[test]
fn doctor_lists_malformed_rows_and_orphaned_categories() {
    let conn = db::open_in_memory().unwrap();
    store::create_category(&conn, "Salary", TxType::Income).unwrap();
    insert_raw(&conn, "income", "Salary", "100", "2024-01-10");
    insert_raw(&conn, "expense", "Food", "abc", "someday");
    insert_raw(&conn, "transfer", "Salary", "5", "2024-01-10");

    let kinds: Vec<String> = doctor::findings(&conn)
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        kinds,
        vec!["bad_amount", "bad_date", "missing_category", "unknown_type"]
    );
}
