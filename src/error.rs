// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Rejected user input. Raised before anything reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Invalid amount '{0}', expected a positive number")]
    InvalidAmount(String),
    #[error("Invalid initial balance '{0}', expected a non-negative number")]
    InvalidBalance(String),
    #[error("Unknown type '{0}' (use income|expense|investment)")]
    UnknownType(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]")]
    InvalidDate(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("Transaction {id} has an unknown type")]
    Malformed { id: i64 },
}
