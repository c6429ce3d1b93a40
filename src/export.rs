// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use crate::models::{Category, Transaction};
use crate::view::resolve_category;

pub const CSV_HEADER: [&str; 5] = ["id", "amount", "description", "category", "date"];

/// Flat projection of a transaction written to export files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub id: String,
    pub amount: String,
    pub description: String,
    pub category: String,
    pub date: String,
}

pub fn project(records: &[Transaction], categories: &[Category]) -> Vec<ExportRow> {
    records
        .iter()
        .map(|t| ExportRow {
            id: t.id.to_string(),
            amount: t.amount.normalize().to_string(),
            description: t.description.clone().unwrap_or_default(),
            category: resolve_category(t.category_id, categories)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            date: t.date.clone(),
        })
        .collect()
}

/// Header plus one `\n`-terminated line per row; no rows means empty text.
pub fn to_csv(rows: &[ExportRow]) -> Result<String> {
    if rows.is_empty() {
        return Ok(String::new());
    }
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for r in rows {
        wtr.write_record([&r.id, &r.amount, &r.description, &r.category, &r.date])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV buffer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}
