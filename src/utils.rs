// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::aggregate::TrendScope;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Lenient parse of a stored `date` field: plain dates, RFC 3339 timestamps
/// (as written by browsers' `toISOString`), or naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc().date());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s.trim()).with_context(|| format!("Invalid id '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Settings

pub const SETTING_OWNER_ID: &str = "owner_id";
pub const SETTING_TREND_SCOPE: &str = "trend_scope";
pub const SETTING_KEYS: [&str; 2] = [SETTING_OWNER_ID, SETTING_TREND_SCOPE];

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Owner every record of this database belongs to; generated on first use.
pub fn get_owner_id(conn: &Connection) -> Result<Uuid> {
    if let Some(raw) = get_setting(conn, SETTING_OWNER_ID)? {
        return Uuid::parse_str(&raw)
            .with_context(|| format!("Stored owner id '{}' is not a UUID", raw));
    }
    let owner = Uuid::new_v4();
    set_setting(conn, SETTING_OWNER_ID, &owner.to_string())?;
    tracing::info!("generated owner id {}", owner);
    Ok(owner)
}

pub fn get_trend_scope(conn: &Connection) -> Result<TrendScope> {
    match get_setting(conn, SETTING_TREND_SCOPE)? {
        Some(raw) => raw.parse(),
        None => Ok(TrendScope::AllYears),
    }
}

/// Validates a setting before it is stored.
pub fn check_setting(key: &str, value: &str) -> Result<String> {
    match key {
        SETTING_OWNER_ID => Ok(parse_uuid(value)?.to_string()),
        SETTING_TREND_SCOPE => Ok(value.parse::<TrendScope>()?.to_string()),
        other => bail!(
            "Unknown setting '{}' (known: {})",
            other,
            SETTING_KEYS.join(", ")
        ),
    }
}

pub fn require<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .ok_or_else(|| anyhow!("Missing required argument '{}'", name))
}
