// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{TrendScope, by_category, by_month, by_source, percentage, total};
use crate::models::Domain;
use crate::store::{BlobStore, RecordStore};
use crate::utils::{fmt_money, get_owner_id, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

pub fn handle<B: BlobStore + ?Sized>(
    store: &RecordStore<'_, B>,
    owner: Uuid,
    default_scope: TrendScope,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("total", sub)) => report_total(store, owner, sub)?,
        Some(("by-category", sub)) => report_by_category(store, owner, sub)?,
        Some(("by-source", sub)) => report_by_source(store, owner, sub)?,
        Some(("trends", sub)) => {
            let scope = if sub.get_flag("all_years") {
                TrendScope::AllYears
            } else if let Some(y) = sub.get_one::<i32>("year") {
                TrendScope::Year(*y)
            } else {
                default_scope
            };
            report_trends(store, owner, scope, sub)?
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct TotalRow {
    domain: Domain,
    records: usize,
    total: Decimal,
}

fn report_total<B: BlobStore + ?Sized>(
    store: &RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let txs = store.transactions_for(owner);
    let row = TotalRow {
        domain: store.domain(),
        records: txs.len(),
        total: total(&txs),
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &row)? {
        println!(
            "{}",
            pretty_table(
                &["Ledger", "Records", "Total"],
                vec![vec![
                    row.domain.to_string(),
                    row.records.to_string(),
                    fmt_money(&row.total),
                ]],
            )
        );
    }
    Ok(())
}

fn report_by_category<B: BlobStore + ?Sized>(
    store: &RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let txs = store.transactions_for(owner);
    let grand = total(&txs);
    let data = by_category(&txs, &store.categories_for(owner));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    fmt_money(&c.total),
                    format!("{:.1}%", percentage(c.total, grand)),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Total", "Share"], rows));
    }
    Ok(())
}

fn report_by_source<B: BlobStore + ?Sized>(
    store: &RecordStore<'_, B>,
    owner: Uuid,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let txs = store.transactions_for(owner);
    let grand = total(&txs);
    let data = by_source(&txs);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|s| {
                vec![
                    s.source.clone(),
                    fmt_money(&s.total),
                    format!("{:.1}%", percentage(s.total, grand)),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Source", "Total", "Share"], rows));
    }
    Ok(())
}

fn report_trends<B: BlobStore + ?Sized>(
    store: &RecordStore<'_, B>,
    owner: Uuid,
    scope: TrendScope,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let trend = by_month(&store.transactions_for(owner), scope);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trend)? {
        let rows = trend
            .points
            .iter()
            .map(|p| vec![p.month.to_string(), fmt_money(&p.amount)])
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", &format!("Amount ({})", trend.scope)], rows)
        );
        if !trend.unparsed.is_zero() {
            println!(
                "Not shown: {} from records with unreadable dates",
                fmt_money(&trend.unparsed)
            );
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub expense: Decimal,
    pub income: Decimal,
    pub net: Decimal,
}

pub fn summarize<B: BlobStore + ?Sized>(backend: &B, owner: Uuid) -> Result<Summary> {
    let expense = total(&RecordStore::load(backend, Domain::Expense, owner)?.transactions_for(owner));
    let income = total(&RecordStore::load(backend, Domain::Income, owner)?.transactions_for(owner));
    Ok(Summary {
        expense,
        income,
        net: income - expense,
    })
}

pub fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = get_owner_id(conn)?;
    let s = summarize(conn, owner)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "{}",
            pretty_table(
                &["Income", "Expenses", "Net"],
                vec![vec![fmt_money(&s.income), fmt_money(&s.expense), fmt_money(&s.net)]],
            )
        );
    }
    Ok(())
}
