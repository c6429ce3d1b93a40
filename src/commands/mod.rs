// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod categories;
pub mod reports;
pub mod exporter;
pub mod doctor;
pub mod settings;

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::{Category, Domain};
use crate::store::RecordStore;
use crate::utils::{get_owner_id, get_trend_scope};
use crate::view::CategoryFilter;

/// Entry point for `expense ...` and `income ...`.
pub fn handle_domain(conn: &Connection, domain: Domain, m: &clap::ArgMatches) -> Result<()> {
    let owner = get_owner_id(conn)?;
    let mut store = RecordStore::load(conn, domain, owner)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            transactions::add(&mut store, owner, sub)?;
        }
        Some(("list", sub)) => transactions::list(&store, owner, sub)?,
        Some(("update", sub)) => transactions::update(&mut store, owner, sub)?,
        Some(("rm", sub)) => transactions::remove(&mut store, owner, sub)?,
        Some(("category", sub)) => categories::handle(&mut store, owner, sub)?,
        Some(("report", sub)) => {
            reports::handle(&store, owner, get_trend_scope(conn)?, sub)?
        }
        Some(("export", sub)) => exporter::handle(&store, owner, sub)?,
        _ => {}
    }
    Ok(())
}

/// Resolves a user-supplied category reference: an id first, then an exact
/// (case-insensitive) name.
pub fn category_id_for(categories: &[Category], raw: &str) -> Result<Uuid> {
    let raw = raw.trim();
    if let Ok(id) = Uuid::parse_str(raw) {
        if categories.iter().any(|c| c.id == id) {
            return Ok(id);
        }
    }
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(raw))
        .map(|c| c.id)
        .ok_or_else(|| anyhow!("Category '{}' not found", raw))
}

/// Like [`category_id_for`], but `all` selects everything and a well-formed
/// id is accepted even if no category carries it (dangling references).
pub fn category_filter_for(categories: &[Category], raw: &str) -> Result<CategoryFilter> {
    if let Ok(f) = raw.parse::<CategoryFilter>() {
        return Ok(f);
    }
    Ok(CategoryFilter::Category(category_id_for(categories, raw)?))
}
