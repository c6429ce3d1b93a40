// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    SETTING_KEYS, SETTING_OWNER_ID, SETTING_TREND_SCOPE, check_setting, get_owner_id,
    get_setting, get_trend_scope, pretty_table, require, set_setting,
};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => {
            let data = vec![
                vec![SETTING_OWNER_ID.to_string(), get_owner_id(conn)?.to_string()],
                vec![
                    SETTING_TREND_SCOPE.to_string(),
                    get_trend_scope(conn)?.to_string(),
                ],
            ];
            println!("{}", pretty_table(&["Key", "Value"], data));
        }
        Some(("get", sub)) => {
            let key = require(sub, "key")?.trim();
            if !SETTING_KEYS.contains(&key) {
                bail!("Unknown setting '{}' (known: {})", key, SETTING_KEYS.join(", "));
            }
            match get_setting(conn, key)? {
                Some(v) => println!("{}", v),
                None => println!("(unset)"),
            }
        }
        Some(("set", sub)) => {
            let key = require(sub, "key")?.trim();
            let value = check_setting(key, require(sub, "value")?)?;
            set_setting(conn, key, &value)?;
            if key == SETTING_OWNER_ID {
                tracing::warn!("owner changed; records of the previous owner are hidden");
            }
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
