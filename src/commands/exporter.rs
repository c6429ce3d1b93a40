// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::category_filter_for;
use crate::export::{ExportRow, project, to_csv};
use crate::store::{BlobStore, RecordStore};
use crate::utils::require;
use crate::view::{SortMode, filter, sort};
use anyhow::{Context, Result, bail};
use uuid::Uuid;

pub fn handle<B: BlobStore + ?Sized>(
    store: &RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let fmt = require(sub, "format")?.to_lowercase();
    let out = require(sub, "out")?;

    let categories = store.categories_for(owner);
    let mut records = store.transactions_for(owner);
    if let Some(raw) = sub.get_one::<String>("category") {
        records = filter(&records, &category_filter_for(&categories, raw)?);
    }
    if let Some(mode) = sub.get_one::<String>("sort") {
        records = sort(&records, SortMode::parse_lenient(mode));
    }
    let rows = project(&records, &categories);

    let body = render(&rows, &fmt)?;
    std::fs::write(out, body).with_context(|| format!("Failed to write {}", out))?;
    tracing::info!("exported {} {} rows to {}", rows.len(), store.domain(), out);
    println!("Exported {} {} records to {}", rows.len(), store.domain(), out);
    Ok(())
}

pub fn render(rows: &[ExportRow], fmt: &str) -> Result<String> {
    match fmt {
        "csv" => to_csv(rows),
        "json" => Ok(serde_json::to_string_pretty(rows)?),
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
}
