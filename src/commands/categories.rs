// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::category_id_for;
use crate::models::{CategoryPatch, NewCategory};
use crate::store::{BlobStore, RecordStore};
use crate::utils::{maybe_print_json, parse_uuid, pretty_table, require};
use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
struct CategoryRow {
    id: String,
    name: String,
    records: usize,
}

pub fn handle<B: BlobStore + ?Sized>(
    store: &mut RecordStore<'_, B>,
    owner: Uuid,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = require(sub, "name")?;
            let id = store.add_category(NewCategory {
                owner_id: owner,
                name: name.clone(),
            })?;
            println!("Added category '{}' ({})", name.trim(), id);
        }
        Some(("list", sub)) => {
            let txs = store.transactions_for(owner);
            let data: Vec<CategoryRow> = store
                .categories_for(owner)
                .into_iter()
                .map(|c| CategoryRow {
                    records: txs.iter().filter(|t| t.category_id == Some(c.id)).count(),
                    id: c.id.to_string(),
                    name: c.name,
                })
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|r| vec![r.name, r.records.to_string(), r.id])
                    .collect();
                println!("{}", pretty_table(&["Category", "Records", "ID"], rows));
            }
        }
        Some(("rename", sub)) => {
            let id = category_id_for(&store.categories_for(owner), require(sub, "id")?)?;
            let name = require(sub, "name")?;
            let patch = CategoryPatch {
                name: Some(name.clone()),
            };
            if store.update_category(owner, id, patch)? {
                println!("Renamed category {} to '{}'", id, name.trim());
            }
        }
        Some(("rm", sub)) => {
            let id = parse_uuid(require(sub, "id")?)?;
            if store.delete_category(owner, id)? {
                println!("Removed category {}", id);
            } else {
                println!("No category with id {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}
