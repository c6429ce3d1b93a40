// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use spendtrail::models::Domain;
use spendtrail::store::RecordStore;
use spendtrail::{cli, commands, db, utils};

const LOG_ENV: &str = "SPENDTRAIL_LOG";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("spendtrail=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let owner = utils::get_owner_id(&conn)?;
            for domain in Domain::ALL {
                RecordStore::load(&conn, domain, owner)?;
            }
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("summary", sub)) => commands::reports::summary(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("expense", sub)) => commands::handle_domain(&conn, Domain::Expense, sub)?,
        Some(("income", sub)) => commands::handle_domain(&conn, Domain::Income, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
