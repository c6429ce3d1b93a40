// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, crate_version, value_parser};

use crate::models::Domain;
use crate::view::SortMode;

pub fn build_cli() -> Command {
    Command::new("spendtrail")
        .version(crate_version!())
        .about("Track expenses and income, break them down by category and month, export CSV")
        .subcommand(Command::new("init").about("Create the database and seed sample data"))
        .subcommand(
            Command::new("summary")
                .about("Totals for both ledgers and the net balance")
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(Command::new("doctor").about("Report dangling categories and bad dates"))
        .subcommand(
            Command::new("config")
                .about("Inspect or change settings")
                .subcommand(Command::new("list"))
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(domain_command(Domain::Expense))
        .subcommand(domain_command(Domain::Income))
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print as pretty JSON")
}

fn jsonl_flag() -> Arg {
    Arg::new("jsonl")
        .long("jsonl")
        .action(ArgAction::SetTrue)
        .conflicts_with("json")
        .help("Print one JSON object per line")
}

fn category_filter_arg() -> Arg {
    Arg::new("category")
        .long("category")
        .default_value("all")
        .help("'all', a category id, or a category name")
}

fn sort_arg() -> Arg {
    Arg::new("sort")
        .long("sort")
        .default_value("date-desc")
        .help(format!("One of {}", SortMode::NAMES.join(", ")))
}

fn domain_command(domain: Domain) -> Command {
    let name = domain.label();
    Command::new(name)
        .about(format!("Manage {} records", name))
        .subcommand(
            Command::new("add")
                .about(format!("Record a new {}", name))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description").short('d'))
                .arg(Arg::new("category").long("category").help("Existing category name or id"))
                .arg(
                    Arg::new("new_category")
                        .long("new-category")
                        .help("Create this category and attach the record to it"),
                )
                .group(ArgGroup::new("category_choice").args(["category", "new_category"]))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                .arg(Arg::new("recurring").long("recurring").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("list")
                .about(format!("List {} records", name))
                .arg(category_filter_arg())
                .arg(sort_arg())
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("update")
                .about(format!("Change fields of an existing {}", name))
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("description").long("description").short('d'))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("uncategorized")
                        .long("uncategorized")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("category"),
                )
                .arg(Arg::new("date").long("date"))
                .arg(
                    Arg::new("recurring")
                        .long("recurring")
                        .value_parser(value_parser!(bool)),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about(format!("Delete a {}", name))
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("category")
                .about(format!("Manage {} categories", name))
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("list").arg(json_flag()).arg(jsonl_flag()))
                .subcommand(
                    Command::new("rename")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(report_command(domain))
        .subcommand(
            Command::new("export")
                .about(format!("Write {} records to a file", name))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv or json"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .default_value(domain.export_filename()),
                )
                .arg(category_filter_arg())
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .help("Order rows; insertion order when omitted"),
                ),
        )
}

fn report_command(domain: Domain) -> Command {
    let report = Command::new("report")
        .about(format!("{} totals and breakdowns", domain.label()))
        .subcommand(
            Command::new("total")
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("by-category")
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("trends")
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32))
                        .help("Only count records dated in this year"),
                )
                .arg(
                    Arg::new("all_years")
                        .long("all-years")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("year")
                        .help("Sum the same month across all years"),
                )
                .arg(json_flag())
                .arg(jsonl_flag()),
        );
    match domain {
        Domain::Income => report.subcommand(
            Command::new("by-source")
                .about("Income totals grouped by description")
                .arg(json_flag())
                .arg(jsonl_flag()),
        ),
        Domain::Expense => report,
    }
}
