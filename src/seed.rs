// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sample data a fresh domain starts with instead of an empty ledger.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Category, Domain, Snapshot, Transaction};

// (amount, description, category index, date, recurring)
type SeedRow = (i64, &'static str, usize, &'static str, bool);

const EXPENSE_CATEGORIES: &[&str] = &["Food", "Transport"];
const EXPENSE_ROWS: &[SeedRow] = &[
    (150, "Groceries", 0, "2024-11-01", false),
    (50, "Gas", 1, "2024-11-02", true),
    (200, "Gas", 1, "2024-12-02", true),
];

const INCOME_CATEGORIES: &[&str] = &["Salary", "Side Hustle"];
const INCOME_ROWS: &[SeedRow] = &[
    (2500, "Salary", 0, "2024-11-01", true),
    (300, "Freelance", 1, "2024-11-10", false),
    (150, "Dividends", 1, "2024-12-02", false),
];

pub fn snapshot(domain: Domain, owner: Uuid) -> Snapshot {
    let (cats, rows) = match domain {
        Domain::Expense => (EXPENSE_CATEGORIES, EXPENSE_ROWS),
        Domain::Income => (INCOME_CATEGORIES, INCOME_ROWS),
    };

    let now = Utc::now();
    let categories: Vec<Category> = cats
        .iter()
        .map(|name| Category {
            id: Uuid::new_v4(),
            owner_id: owner,
            name: (*name).to_string(),
            created_at: now,
            updated_at: None,
        })
        .collect();
    let transactions = rows
        .iter()
        .map(|&(amount, description, cat, date, recurring)| Transaction {
            id: Uuid::new_v4(),
            owner_id: owner,
            amount: Decimal::from(amount),
            description: Some(description.to_string()),
            category_id: Some(categories[cat].id),
            date: date.to_string(),
            is_recurring: recurring,
            created_at: now,
            updated_at: None,
        })
        .collect();

    Snapshot {
        version: Snapshot::VERSION,
        transactions,
        categories,
    }
}
