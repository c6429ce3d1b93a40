// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendtrail::db;
use spendtrail::error::ValidationError;
use spendtrail::models::{
    CategoryPatch, Domain, NewCategory, NewTransaction, Snapshot, TransactionPatch,
};
use spendtrail::store::{BlobStore, MemoryBlobStore, RecordStore};
use spendtrail::view::category_label;
use uuid::Uuid;

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn expense(owner: Uuid, amount: i64, date: &str) -> NewTransaction {
    NewTransaction {
        owner_id: owner,
        amount: Decimal::from(amount),
        description: Some("Coffee".into()),
        category_id: None,
        date: date.into(),
        is_recurring: false,
    }
}

/// Store loaded over an empty blob so no seed data gets in the way.
fn empty_store(backend: &MemoryBlobStore, domain: Domain) -> RecordStore<'_, MemoryBlobStore> {
    let empty = serde_json::to_string(&Snapshot {
        version: Snapshot::VERSION,
        ..Default::default()
    })
    .unwrap();
    backend.save(domain.store_key(), &empty).unwrap();
    RecordStore::load(backend, domain, Uuid::new_v4()).unwrap()
}

#[test]
fn missing_blob_seeds_and_persists_sample_data() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let store = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    assert_eq!(store.transactions().len(), 3);
    assert_eq!(store.categories().len(), 2);
    assert!(store.transactions().iter().all(|t| t.owner_id == owner));
    assert_eq!(backend.writes(), 1);

    // A second load reads the same ids back instead of reseeding.
    let again = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    assert_eq!(again.transactions(), store.transactions());
    assert_eq!(backend.writes(), 1);
}

#[test]
fn income_seed_uses_income_store_key() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let store = RecordStore::load(&backend, Domain::Income, owner).unwrap();
    assert!(backend.raw("income-store").is_some());
    assert!(backend.raw("expense-store").is_none());
    let names: Vec<_> = store.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Salary", "Side Hustle"]);
}

#[test]
fn add_assigns_id_and_writes_snapshot() {
    let backend = MemoryBlobStore::new();
    let mut store = empty_store(&backend, Domain::Expense);
    let owner = Uuid::new_v4();
    let before = backend.writes();

    let id = store.add(expense(owner, 42, "2024-05-01")).unwrap();
    assert_eq!(backend.writes(), before + 1);

    let stored = store.find(owner, id).unwrap();
    assert_eq!(stored.amount, Decimal::from(42));
    assert!(stored.updated_at.is_none());

    let raw = backend.raw("expense-store").unwrap();
    let snap: Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(snap.transactions.len(), 1);
    assert_eq!(snap.transactions[0].id, id);
}

#[test]
fn update_merges_patch_and_stamps_time() {
    let backend = MemoryBlobStore::new();
    let mut store = empty_store(&backend, Domain::Expense);
    let owner = Uuid::new_v4();
    let id = store.add(expense(owner, 10, "2024-05-01")).unwrap();

    let patch = TransactionPatch {
        amount: Some(Decimal::from(12)),
        is_recurring: Some(true),
        ..Default::default()
    };
    assert!(store.update(owner, id, patch).unwrap());

    let t = store.find(owner, id).unwrap();
    assert_eq!(t.amount, Decimal::from(12));
    assert!(t.is_recurring);
    assert_eq!(t.description.as_deref(), Some("Coffee"));
    assert_eq!(t.date, "2024-05-01");
    assert!(t.updated_at.is_some());
}

#[test]
fn update_unknown_id_is_silent_noop() {
    let backend = MemoryBlobStore::new();
    let mut store = empty_store(&backend, Domain::Expense);
    let owner = Uuid::new_v4();
    store.add(expense(owner, 10, "2024-05-01")).unwrap();
    let before = store.transactions().to_vec();
    let writes = backend.writes();

    let patch = TransactionPatch {
        amount: Some(Decimal::from(99)),
        ..Default::default()
    };
    assert!(!store.update(owner, Uuid::new_v4(), patch).unwrap());
    assert_eq!(store.transactions(), before.as_slice());
    assert_eq!(backend.writes(), writes);
}

#[test]
fn delete_unknown_id_leaves_collection_unchanged() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let mut store = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    let before = store.transactions().to_vec();

    assert!(!store.delete(owner, Uuid::new_v4()).unwrap());
    assert_eq!(store.transactions(), before.as_slice());

    let first = before[0].id;
    assert!(store.delete(owner, first).unwrap());
    assert_eq!(store.transactions().len(), before.len() - 1);
    assert!(store.find(owner, first).is_none());
}

#[test]
fn other_owners_records_are_not_touched() {
    let backend = MemoryBlobStore::new();
    let mut store = empty_store(&backend, Domain::Expense);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let id = store.add(expense(alice, 10, "2024-05-01")).unwrap();

    assert!(!store.delete(bob, id).unwrap());
    assert!(store.transactions_for(bob).is_empty());
    assert_eq!(store.transactions_for(alice).len(), 1);
}

#[test]
fn new_category_id_resolves_immediately() {
    let backend = MemoryBlobStore::new();
    let mut store = empty_store(&backend, Domain::Income);
    let owner = Uuid::new_v4();

    let cat = store
        .add_category(NewCategory {
            owner_id: owner,
            name: "Consulting".into(),
        })
        .unwrap();
    let mut new = expense(owner, 800, "2024-06-01");
    new.category_id = Some(cat);
    let id = store.add(new).unwrap();

    let t = store.find(owner, id).unwrap();
    assert_eq!(category_label(t.category_id, store.categories()), "Consulting");
}

#[test]
fn deleting_category_keeps_dangling_reference() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let mut store = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    let food = store.categories()[0].id;

    assert!(store.delete_category(owner, food).unwrap());
    let groceries = &store.transactions()[0];
    assert_eq!(groceries.category_id, Some(food));
    assert_eq!(
        category_label(groceries.category_id, store.categories()),
        "Uncategorized"
    );
}

#[test]
fn rename_category() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let mut store = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    let food = store.categories()[0].id;
    let patch = CategoryPatch {
        name: Some("  Groceries ".into()),
    };
    assert!(store.update_category(owner, food, patch).unwrap());
    assert_eq!(store.categories()[0].name, "Groceries");
    assert!(store.categories()[0].updated_at.is_some());
}

#[test]
fn validation_rejects_before_mutation() {
    let backend = MemoryBlobStore::new();
    let mut store = empty_store(&backend, Domain::Income);
    let owner = Uuid::new_v4();
    let writes = backend.writes();

    let mut no_description = expense(owner, 100, "2024-01-01");
    no_description.description = Some("   ".into());
    let err = store.add(no_description).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::MissingDescription(Domain::Income))
    );

    let zero = expense(owner, 0, "2024-01-01");
    assert!(store.add(zero).is_err());

    let bad_date = expense(owner, 5, "yesterday");
    assert!(store.add(bad_date).is_err());

    let blank = NewCategory {
        owner_id: owner,
        name: " ".into(),
    };
    assert!(store.add_category(blank).is_err());

    assert!(store.transactions().is_empty());
    assert!(store.categories().is_empty());
    assert_eq!(backend.writes(), writes);
}

#[test]
fn expenses_may_omit_description() {
    let backend = MemoryBlobStore::new();
    let mut store = empty_store(&backend, Domain::Expense);
    let mut new = expense(Uuid::new_v4(), 3, "2024-01-01");
    new.description = None;
    assert!(store.add(new).is_ok());
}

#[test]
fn snapshot_survives_sqlite_reload() {
    let conn = conn();
    let owner = Uuid::new_v4();
    let id = {
        let mut store = RecordStore::load(&conn, Domain::Expense, owner).unwrap();
        store.add(expense(owner, 75, "2024-02-14")).unwrap()
    };

    let store = RecordStore::load(&conn, Domain::Expense, owner).unwrap();
    assert_eq!(store.transactions().len(), 4);
    assert_eq!(store.find(owner, id).unwrap().amount, Decimal::from(75));

    let other = RecordStore::load(&conn, Domain::Income, owner).unwrap();
    assert!(other.find(owner, id).is_none());
}

#[test]
fn corrupt_blob_is_an_error_not_a_reseed() {
    let conn = conn();
    conn.save("expense-store", "{not json").unwrap();
    let res = RecordStore::load(&conn, Domain::Expense, Uuid::new_v4());
    assert!(res.is_err());
    assert_eq!(conn.load("expense-store").unwrap().as_deref(), Some("{not json"));
}

/// Reads like the wrapped store but refuses every write.
struct ReadOnly(MemoryBlobStore);

impl BlobStore for ReadOnly {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.0.load(key)
    }

    fn save(&self, key: &str, _value: &str) -> Result<()> {
        bail!("blob '{}' is read-only", key)
    }
}

fn reload(
    backend: &MemoryBlobStore,
    domain: Domain,
    owner: Uuid,
) -> RecordStore<'_, MemoryBlobStore> {
    RecordStore::load(backend, domain, owner).unwrap()
}

#[test]
fn update_is_persisted() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let mut store = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    let id = store.transactions()[0].id;
    let writes = backend.writes();

    let patch = TransactionPatch {
        description: Some(Some("Farmers market".into())),
        ..Default::default()
    };
    assert!(store.update(owner, id, patch).unwrap());
    assert_eq!(backend.writes(), writes + 1);

    let again = reload(&backend, Domain::Expense, owner);
    let t = again.find(owner, id).unwrap();
    assert_eq!(t.description.as_deref(), Some("Farmers market"));
    assert!(t.updated_at.is_some());
}

#[test]
fn delete_is_persisted() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let mut store = RecordStore::load(&backend, Domain::Income, owner).unwrap();
    let id = store.transactions()[2].id;
    let writes = backend.writes();

    assert!(store.delete(owner, id).unwrap());
    assert_eq!(backend.writes(), writes + 1);

    let again = reload(&backend, Domain::Income, owner);
    assert_eq!(again.transactions().len(), 2);
    assert!(again.find(owner, id).is_none());
}

#[test]
fn add_category_is_persisted() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let mut store = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    let writes = backend.writes();

    let id = store
        .add_category(NewCategory {
            owner_id: owner,
            name: "Utilities".into(),
        })
        .unwrap();
    assert_eq!(backend.writes(), writes + 1);

    let again = reload(&backend, Domain::Expense, owner);
    let cat = again.categories().iter().find(|c| c.id == id).unwrap();
    assert_eq!(cat.name, "Utilities");
}

#[test]
fn update_category_is_persisted() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let mut store = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    let transport = store.categories()[1].id;
    let writes = backend.writes();

    let patch = CategoryPatch {
        name: Some("Travel".into()),
    };
    assert!(store.update_category(owner, transport, patch).unwrap());
    assert_eq!(backend.writes(), writes + 1);

    let again = reload(&backend, Domain::Expense, owner);
    assert_eq!(again.categories()[1].name, "Travel");
    assert_eq!(category_label(Some(transport), again.categories()), "Travel");
}

#[test]
fn delete_category_is_persisted() {
    let backend = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    let mut store = RecordStore::load(&backend, Domain::Income, owner).unwrap();
    let salary = store.categories()[0].id;
    let writes = backend.writes();

    assert!(store.delete_category(owner, salary).unwrap());
    assert_eq!(backend.writes(), writes + 1);

    let again = reload(&backend, Domain::Income, owner);
    assert_eq!(again.categories().len(), 1);
    assert!(again.categories().iter().all(|c| c.id != salary));
}

#[test]
fn failed_write_leaves_store_unchanged() {
    let seeded = MemoryBlobStore::new();
    let owner = Uuid::new_v4();
    RecordStore::load(&seeded, Domain::Expense, owner).unwrap();
    let backend = ReadOnly(seeded);

    let mut store = RecordStore::load(&backend, Domain::Expense, owner).unwrap();
    let before = store.snapshot();
    let id = before.transactions[0].id;
    let food = before.categories[0].id;

    assert!(store.add(expense(owner, 5, "2024-01-01")).is_err());
    let patch = TransactionPatch {
        amount: Some(Decimal::from(1)),
        ..Default::default()
    };
    assert!(store.update(owner, id, patch).is_err());
    assert!(store.delete(owner, id).is_err());
    let new = NewCategory {
        owner_id: owner,
        name: "Pets".into(),
    };
    assert!(store.add_category(new).is_err());
    let rename = CategoryPatch {
        name: Some("Dining".into()),
    };
    assert!(store.update_category(owner, food, rename).is_err());
    assert!(store.delete_category(owner, food).is_err());

    assert_eq!(store.snapshot(), before);
}
