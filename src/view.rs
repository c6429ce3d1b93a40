// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! List views: category resolution, filtering and ordering of transactions.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{Category, Transaction};

pub const UNCATEGORIZED: &str = "Uncategorized";

pub fn resolve_category(id: Option<Uuid>, categories: &[Category]) -> Option<&Category> {
    let id = id?;
    categories.iter().find(|c| c.id == id)
}

/// Display name for a category reference; missing or dangling ids fall back
/// to [`UNCATEGORIZED`].
pub fn category_label(id: Option<Uuid>, categories: &[Category]) -> &str {
    resolve_category(id, categories)
        .map(|c| c.name.as_str())
        .unwrap_or(UNCATEGORIZED)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(Uuid),
}

impl FromStr for CategoryFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Ok(CategoryFilter::Category(crate::utils::parse_uuid(s)?))
    }
}

/// Stable filter; `All` hands back the full sequence unchanged.
pub fn filter(records: &[Transaction], selector: &CategoryFilter) -> Vec<Transaction> {
    match selector {
        CategoryFilter::All => records.to_vec(),
        CategoryFilter::Category(id) => records
            .iter()
            .filter(|r| r.category_id == Some(*id))
            .cloned()
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortMode {
    pub const NAMES: [&'static str; 4] = ["date-desc", "date-asc", "amount-desc", "amount-asc"];

    /// Unrecognized values fall back to `DateDesc`.
    pub fn parse_lenient(s: &str) -> SortMode {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "date-asc" => SortMode::DateAsc,
            "amount-desc" => SortMode::AmountDesc,
            "amount-asc" => SortMode::AmountAsc,
            _ => SortMode::DateDesc,
        }
    }
}

impl From<&str> for SortMode {
    fn from(s: &str) -> Self {
        SortMode::parse_lenient(s)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::DateDesc => "date-desc",
            SortMode::DateAsc => "date-asc",
            SortMode::AmountDesc => "amount-desc",
            SortMode::AmountAsc => "amount-asc",
        };
        f.write_str(name)
    }
}

/// Returns a sorted copy. Records with an unparseable date go last in
/// either date direction; ties keep their relative order.
pub fn sort(records: &[Transaction], mode: SortMode) -> Vec<Transaction> {
    let mut out = records.to_vec();
    match mode {
        SortMode::DateDesc => out.sort_by(|a, b| by_date(a, b, true)),
        SortMode::DateAsc => out.sort_by(|a, b| by_date(a, b, false)),
        SortMode::AmountDesc => out.sort_by(|a, b| b.amount.cmp(&a.amount)),
        SortMode::AmountAsc => out.sort_by(|a, b| a.amount.cmp(&b.amount)),
    }
    out
}

fn by_date(a: &Transaction, b: &Transaction, descending: bool) -> Ordering {
    match (a.parsed_date(), b.parsed_date()) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
