// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{percentage, total};
use crate::commands::{category_filter_for, category_id_for};
use crate::error::ValidationError;
use crate::models::{NewCategory, NewTransaction, TransactionPatch};
use crate::store::{BlobStore, RecordStore};
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_uuid, pretty_table, require,
};
use crate::view::{SortMode, category_label, filter, sort};
use anyhow::{Result, bail};
use serde::Serialize;
use uuid::Uuid;

fn trimmed(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// A category option that was passed must name something.
fn category_name(
    sub: &clap::ArgMatches,
    name: &str,
) -> Result<Option<String>, ValidationError> {
    match sub.get_one::<String>(name).map(|s| s.trim()) {
        Some("") => Err(ValidationError::EmptyCategoryName),
        other => Ok(other.map(str::to_string)),
    }
}

pub fn add<B: BlobStore + ?Sized>(
    store: &mut RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<Uuid> {
    let new_category = category_name(sub, "new_category")?;
    let existing_category = category_name(sub, "category")?;
    let amount = parse_decimal(require(sub, "amount")?)?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => chrono::Local::now().date_naive(),
    };
    let mut new = NewTransaction {
        owner_id: owner,
        amount,
        description: trimmed(sub, "description"),
        category_id: None,
        date: date.to_string(),
        is_recurring: sub.get_flag("recurring"),
    };
    // Reject bad input before a new category gets created.
    store.validate(&new)?;

    new.category_id = if let Some(name) = new_category {
        Some(store.add_category(NewCategory {
            owner_id: owner,
            name,
        })?)
    } else if let Some(cat) = existing_category {
        Some(category_id_for(&store.categories_for(owner), &cat)?)
    } else {
        None
    };

    let category = category_label(new.category_id, store.categories()).to_string();
    let id = store.add(new)?;
    println!(
        "Recorded {} {} on {} [{}] ({})",
        store.domain(),
        fmt_money(&amount),
        date,
        category,
        id
    );
    Ok(id)
}

pub fn list<B: BlobStore + ?Sized>(
    store: &RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, owner, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.share.clone(),
                    if r.recurring { "yes".into() } else { String::new() },
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Category", "Amount", "Share", "Recurring", "ID"],
                rows,
            )
        );
        let all = store.transactions_for(owner);
        println!("Total {}: {}", store.domain(), fmt_money(&total(&all)));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub share: String,
    pub recurring: bool,
}

/// Filtered + sorted view of the owner's records. Shares are taken against
/// the unfiltered domain total.
pub fn query_rows<B: BlobStore + ?Sized>(
    store: &RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let categories = store.categories_for(owner);
    let all = store.transactions_for(owner);
    let grand_total = total(&all);

    let selector = match sub.get_one::<String>("category") {
        Some(raw) => category_filter_for(&categories, raw)?,
        None => Default::default(),
    };
    let mode = sub
        .get_one::<String>("sort")
        .map(|s| SortMode::parse_lenient(s))
        .unwrap_or_default();

    let mut view = sort(&filter(&all, &selector), mode);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        view.truncate(*limit);
    }

    Ok(view
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            date: t.date.clone(),
            description: t.description.clone().unwrap_or_default(),
            category: category_label(t.category_id, &categories).to_string(),
            amount: fmt_money(&t.amount),
            share: format!("{:.1}%", percentage(t.amount, grand_total)),
            recurring: t.is_recurring,
        })
        .collect())
}

pub fn update<B: BlobStore + ?Sized>(
    store: &mut RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = parse_uuid(require(sub, "id")?)?;
    let category_id = if sub.get_flag("uncategorized") {
        Some(None)
    } else if let Some(cat) = category_name(sub, "category")? {
        Some(Some(category_id_for(&store.categories_for(owner), &cat)?))
    } else {
        None
    };
    let patch = TransactionPatch {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        description: sub
            .get_one::<String>("description")
            .map(|s| Some(s.trim().to_string()).filter(|s| !s.is_empty())),
        category_id,
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s.trim()).map(|d| d.to_string()))
            .transpose()?,
        is_recurring: sub.get_one::<bool>("recurring").copied(),
    };
    if patch.is_empty() {
        bail!("Nothing to update; pass at least one field");
    }
    if store.update(owner, id, patch)? {
        println!("Updated {} {}", store.domain(), id);
    } else {
        println!("No {} with id {}", store.domain(), id);
    }
    Ok(())
}

pub fn remove<B: BlobStore + ?Sized>(
    store: &mut RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = parse_uuid(require(sub, "id")?)?;
    if store.delete(owner, id)? {
        println!("Removed {} {}", store.domain(), id);
    } else {
        println!("No {} with id {}", store.domain(), id);
    }
    Ok(())
}
