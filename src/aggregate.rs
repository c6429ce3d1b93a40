// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chart-ready reductions over a transaction sequence.

use anyhow::anyhow;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{Category, Transaction};
use crate::view::category_label;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const UNCATEGORIZED_KEY: &str = "uncategorized";

pub fn total(records: &[Transaction]) -> Decimal {
    records.iter().map(|r| r.amount).sum()
}

/// Share of `total` in percent; zero when `total` is zero.
pub fn percentage(amount: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    amount / total * Decimal::ONE_HUNDRED
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub key: String,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub total: Decimal,
}

/// Per-category sums in order of first occurrence. Records without a
/// category share the `uncategorized` bucket.
pub fn by_category(records: &[Transaction], categories: &[Category]) -> Vec<CategoryTotal> {
    let mut index: HashMap<Option<Uuid>, usize> = HashMap::new();
    let mut buckets: Vec<(Option<Uuid>, Decimal)> = Vec::new();
    for r in records {
        let slot = *index.entry(r.category_id).or_insert_with(|| {
            buckets.push((r.category_id, Decimal::ZERO));
            buckets.len() - 1
        });
        buckets[slot].1 += r.amount;
    }
    buckets
        .into_iter()
        .map(|(id, total)| CategoryTotal {
            key: id.map_or_else(|| UNCATEGORIZED_KEY.to_string(), |id| id.to_string()),
            category_id: id,
            name: category_label(id, categories).to_string(),
            total,
        })
        .collect()
}

/// Whether month buckets mix records from different years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendScope {
    #[default]
    AllYears,
    Year(i32),
}

impl fmt::Display for TrendScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendScope::AllYears => f.write_str("all-years"),
            TrendScope::Year(y) => write!(f, "{}", y),
        }
    }
}

impl FromStr for TrendScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all-years") || s.eq_ignore_ascii_case("all") {
            return Ok(TrendScope::AllYears);
        }
        s.parse::<i32>()
            .map(TrendScope::Year)
            .map_err(|_| anyhow!("Invalid trend scope '{}' (use all-years or a year)", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPoint {
    pub month: &'static str,
    pub index: u32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub scope: String,
    pub points: Vec<MonthPoint>,
    /// Sum of records whose date could not be parsed; not part of any month.
    pub unparsed: Decimal,
}

pub fn by_month(records: &[Transaction], scope: TrendScope) -> MonthlyTrend {
    let mut sums = [Decimal::ZERO; 12];
    let mut unparsed = Decimal::ZERO;
    for r in records {
        let Some(date) = r.parsed_date() else {
            unparsed += r.amount;
            continue;
        };
        if let TrendScope::Year(y) = scope {
            if date.year() != y {
                continue;
            }
        }
        sums[date.month0() as usize] += r.amount;
    }
    MonthlyTrend {
        scope: scope.to_string(),
        points: sums
            .iter()
            .zip(MONTH_LABELS)
            .enumerate()
            .map(|(i, (amount, month))| MonthPoint {
                month,
                index: i as u32,
                amount: *amount,
            })
            .collect(),
        unparsed,
    }
}

pub const OTHER_SOURCE: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTotal {
    pub source: String,
    pub total: Decimal,
}

/// Per-description sums in order of first occurrence; records with a blank
/// or missing description are pooled under [`OTHER_SOURCE`].
pub fn by_source(records: &[Transaction]) -> Vec<SourceTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<SourceTotal> = Vec::new();
    for r in records {
        let source = r
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(OTHER_SOURCE);
        let slot = *index.entry(source).or_insert_with(|| {
            buckets.push(SourceTotal {
                source: source.to_string(),
                total: Decimal::ZERO,
            });
            buckets.len() - 1
        });
        buckets[slot].total += r.amount;
    }
    buckets
}
