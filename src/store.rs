// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory record store for one domain, mirrored to a key-value blob backend.
//!
//! Every successful mutation writes the whole [`Snapshot`] back under the
//! domain's store key before returning. Mutations stage the next snapshot
//! and only adopt it once the write succeeded, so a failed write leaves the
//! store as it was.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::{
    Category, CategoryPatch, Domain, NewCategory, NewTransaction, Snapshot, Transaction,
    TransactionPatch,
};
use crate::seed;
use crate::utils::parse_record_date;

/// Opaque key-value storage for serialized snapshots.
pub trait BlobStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl BlobStore for Connection {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .query_row("SELECT value FROM kv_store WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read blob '{}'", key))?;
        Ok(v)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.execute(
            "INSERT INTO kv_store(key, value, updated_at) VALUES(?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
            params![key, value],
        )
        .with_context(|| format!("Failed to write blob '{}'", key))?;
        Ok(())
    }
}

/// Blob backend kept entirely in memory; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls seen so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

pub struct RecordStore<'a, B: BlobStore + ?Sized> {
    backend: &'a B,
    domain: Domain,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
}

impl<'a, B: BlobStore + ?Sized> RecordStore<'a, B> {
    /// Loads the domain snapshot, seeding (and persisting) sample data for
    /// `owner` when nothing has been stored yet.
    pub fn load(backend: &'a B, domain: Domain, owner: Uuid) -> Result<Self> {
        let key = domain.store_key();
        let snapshot = match backend.load(key)? {
            Some(raw) => serde_json::from_str::<Snapshot>(&raw)
                .with_context(|| format!("Corrupt snapshot stored under '{}'", key))?,
            None => {
                tracing::info!("no stored data for {}, seeding sample records", key);
                let snap = seed::snapshot(domain, owner);
                backend.save(key, &serde_json::to_string(&snap)?)?;
                snap
            }
        };
        tracing::debug!(
            "loaded {}: {} transactions, {} categories",
            key,
            snapshot.transactions.len(),
            snapshot.categories.len()
        );
        Ok(Self {
            backend,
            domain,
            transactions: snapshot.transactions,
            categories: snapshot.categories,
        })
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Every transaction in the domain, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn transactions_for(&self, owner: Uuid) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.owner_id == owner)
            .cloned()
            .collect()
    }

    pub fn categories_for(&self, owner: Uuid) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| c.owner_id == owner)
            .cloned()
            .collect()
    }

    pub fn find(&self, owner: Uuid, id: Uuid) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.id == id && t.owner_id == owner)
    }

    /// Checks a new record without touching the store.
    pub fn validate(&self, new: &NewTransaction) -> Result<(), ValidationError> {
        validate_transaction(self.domain, new)
    }

    pub fn add(&mut self, new: NewTransaction) -> Result<Uuid> {
        self.validate(&new)?;
        let id = Uuid::new_v4();
        let mut next = self.snapshot();
        next.transactions.push(Transaction {
            id,
            owner_id: new.owner_id,
            amount: new.amount,
            description: new.description,
            category_id: new.category_id,
            date: new.date,
            is_recurring: new.is_recurring,
            created_at: Utc::now(),
            updated_at: None,
        });
        self.commit(next)?;
        tracing::info!("added {} {}", self.domain, id);
        Ok(id)
    }

    /// Merges `patch` over the owner's record. Returns `false` (and writes
    /// nothing) when no such record exists.
    pub fn update(&mut self, owner: Uuid, id: Uuid, patch: TransactionPatch) -> Result<bool> {
        if let Some(amount) = patch.amount {
            if amount <= rust_decimal::Decimal::ZERO {
                return Err(ValidationError::NonPositiveAmount(amount).into());
            }
        }
        if let Some(ref date) = patch.date {
            if parse_record_date(date).is_none() {
                return Err(ValidationError::InvalidDate(date.clone()).into());
            }
        }
        if self.domain == Domain::Income {
            if let Some(ref d) = patch.description {
                if d.as_deref().map(str::trim).unwrap_or_default().is_empty() {
                    return Err(ValidationError::MissingDescription(self.domain).into());
                }
            }
        }

        let mut next = self.snapshot();
        let Some(tx) = next
            .transactions
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner)
        else {
            tracing::warn!("update skipped: no {} with id {}", self.domain, id);
            return Ok(false);
        };
        if let Some(amount) = patch.amount {
            tx.amount = amount;
        }
        if let Some(description) = patch.description {
            tx.description = description;
        }
        if let Some(category_id) = patch.category_id {
            tx.category_id = category_id;
        }
        if let Some(date) = patch.date {
            tx.date = date;
        }
        if let Some(flag) = patch.is_recurring {
            tx.is_recurring = flag;
        }
        tx.updated_at = Some(Utc::now());
        self.commit(next)?;
        tracing::info!("updated {} {}", self.domain, id);
        Ok(true)
    }

    /// Removes the first matching record. Returns `false` when absent.
    pub fn delete(&mut self, owner: Uuid, id: Uuid) -> Result<bool> {
        let Some(pos) = self
            .transactions
            .iter()
            .position(|t| t.id == id && t.owner_id == owner)
        else {
            tracing::warn!("delete skipped: no {} with id {}", self.domain, id);
            return Ok(false);
        };
        let mut next = self.snapshot();
        next.transactions.remove(pos);
        self.commit(next)?;
        tracing::info!("deleted {} {}", self.domain, id);
        Ok(true)
    }

    /// Appends a category and hands back its id, which callers use directly
    /// when attaching a transaction to it.
    pub fn add_category(&mut self, new: NewCategory) -> Result<Uuid> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName.into());
        }
        let id = Uuid::new_v4();
        let mut next = self.snapshot();
        next.categories.push(Category {
            id,
            owner_id: new.owner_id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        });
        self.commit(next)?;
        tracing::info!("added {} category '{}' ({})", self.domain, name, id);
        Ok(id)
    }

    pub fn update_category(&mut self, owner: Uuid, id: Uuid, patch: CategoryPatch) -> Result<bool> {
        let name = match patch.name {
            Some(n) if n.trim().is_empty() => {
                return Err(ValidationError::EmptyCategoryName.into());
            }
            Some(n) => Some(n.trim().to_string()),
            None => None,
        };
        let mut next = self.snapshot();
        let Some(cat) = next
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.owner_id == owner)
        else {
            tracing::warn!("update skipped: no {} category with id {}", self.domain, id);
            return Ok(false);
        };
        if let Some(name) = name {
            cat.name = name;
        }
        cat.updated_at = Some(Utc::now());
        self.commit(next)?;
        Ok(true)
    }

    /// Removes a category. Transactions pointing at it keep the dangling id.
    pub fn delete_category(&mut self, owner: Uuid, id: Uuid) -> Result<bool> {
        let Some(pos) = self
            .categories
            .iter()
            .position(|c| c.id == id && c.owner_id == owner)
        else {
            tracing::warn!("delete skipped: no {} category with id {}", self.domain, id);
            return Ok(false);
        };
        let mut next = self.snapshot();
        next.categories.remove(pos);
        self.commit(next)?;
        tracing::info!("deleted {} category {}", self.domain, id);
        Ok(true)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: Snapshot::VERSION,
            transactions: self.transactions.clone(),
            categories: self.categories.clone(),
        }
    }

    /// Writes `next` to the backend, then makes it the in-memory state.
    fn commit(&mut self, next: Snapshot) -> Result<()> {
        let key = self.domain.store_key();
        let raw = serde_json::to_string(&next)
            .with_context(|| format!("Failed to serialize '{}'", key))?;
        self.backend.save(key, &raw)?;
        tracing::debug!("persisted {} ({} bytes)", key, raw.len());
        self.transactions = next.transactions;
        self.categories = next.categories;
        Ok(())
    }
}

fn validate_transaction(domain: Domain, new: &NewTransaction) -> Result<(), ValidationError> {
    if new.amount <= rust_decimal::Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(new.amount));
    }
    let has_description = new
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if domain == Domain::Income && !has_description {
        return Err(ValidationError::MissingDescription(domain));
    }
    if parse_record_date(&new.date).is_none() {
        return Err(ValidationError::InvalidDate(new.date.clone()));
    }
    Ok(())
}
