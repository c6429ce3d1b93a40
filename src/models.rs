// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The two ledgers the tracker keeps. They never share records or categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Expense,
    Income,
}

impl Domain {
    pub const ALL: [Domain; 2] = [Domain::Expense, Domain::Income];

    /// Key of the persisted blob holding this domain's snapshot.
    pub fn store_key(self) -> &'static str {
        match self {
            Domain::Expense => "expense-store",
            Domain::Income => "income-store",
        }
    }

    pub fn export_filename(self) -> &'static str {
        match self {
            Domain::Expense => "expenses.csv",
            Domain::Income => "income.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Domain::Expense => "expense",
            Domain::Income => "income",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub date: String, // ISO-8601, date or full timestamp
    #[serde(default)]
    pub is_recurring: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Calendar date the record is attributed to, or `None` when `date` is malformed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        crate::utils::parse_record_date(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A transaction before the store has assigned its id and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub owner_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub date: String,
    pub is_recurring: bool,
}

/// Partial update. `None` leaves a field untouched; `category_id: Some(None)`
/// clears the category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<Uuid>>,
    pub date: Option<String>,
    pub is_recurring: Option<bool>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub owner_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

/// Whole-domain state as written to the blob store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "Snapshot::current_version")]
    pub version: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Snapshot {
    pub const VERSION: u32 = 1;

    fn current_version() -> u32 {
        Self::VERSION
    }
}
