// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Domain;
use crate::store::{BlobStore, RecordStore};
use crate::utils::{get_owner_id, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub domain: Domain,
    pub kind: &'static str,
    pub detail: String,
}

pub fn diagnose<B: BlobStore + ?Sized>(store: &RecordStore<'_, B>, owner: Uuid) -> Vec<Issue> {
    let domain = store.domain();
    let mut issues = Vec::new();
    let mut push = |kind: &'static str, detail: String| {
        issues.push(Issue {
            domain,
            kind,
            detail,
        })
    };

    let known: HashSet<Uuid> = store.categories().iter().map(|c| c.id).collect();
    for t in store.transactions() {
        if t.owner_id != owner {
            push("foreign_owner", format!("{} belongs to {}", t.id, t.owner_id));
        }
        if let Some(cid) = t.category_id {
            if !known.contains(&cid) {
                push("dangling_category", format!("{} -> {}", t.id, cid));
            }
        }
        if t.parsed_date().is_none() {
            push("bad_date", format!("{} '{}'", t.id, t.date));
        }
        if t.amount <= Decimal::ZERO {
            push("non_positive_amount", format!("{} {}", t.id, t.amount));
        }
    }

    // Names are not required to be unique, but duplicates make name lookups ambiguous.
    let mut seen = HashSet::new();
    for c in store.categories() {
        if !seen.insert(c.name.to_lowercase()) {
            push("duplicate_category_name", format!("'{}' ({})", c.name, c.id));
        }
    }
    issues
}

pub fn handle(conn: &Connection) -> Result<()> {
    let owner = get_owner_id(conn)?;
    let mut rows = Vec::new();
    for domain in Domain::ALL {
        let store = RecordStore::load(conn, domain, owner)?;
        for issue in diagnose(&store, owner) {
            rows.push(vec![issue.domain.to_string(), issue.kind.into(), issue.detail]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Ledger", "Issue", "Detail"], rows));
    }
    Ok(())
}
