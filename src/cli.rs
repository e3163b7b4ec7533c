// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

fn output_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .short('p')
        .default_value("ALL")
        .help("1D | 1W | 1M | 1Y | ALL (anything else means ALL)")
}

fn tx_fields(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .short('t')
            .required(true)
            .help("income | expense | investment"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .short('a')
            .required(true)
            .allow_hyphen_values(true)
            .help("Positive amount, e.g. 150000 or 150.000"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .short('c')
            .required(true),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .short('d')
            .required(true)
            .help("YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]"),
    )
    .arg(Arg::new("description").long("description").short('m'))
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("dompet")
        .version(clap::crate_version!())
        .about("Track income, expenses and investments; view period dashboards")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("DOMPET_DB")
                .value_parser(value_parser!(PathBuf))
                .help("SQLite database file (defaults to the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(tx_fields(Command::new("add").about("Record a transaction")))
                .subcommand(tx_fields(
                    Command::new("edit")
                        .about("Replace the fields of a transaction")
                        .arg(id_arg()),
                ))
                .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
                .subcommand(output_flags(
                    Command::new("list")
                        .about("Transaction history, newest first")
                        .arg(Arg::new("from").long("from").help("First day, YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").help("Last day, YYYY-MM-DD"))
                        .arg(Arg::new("type").long("type").short('t'))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("group")
                                .long("group")
                                .action(ArgAction::SetTrue)
                                .help("Group by day"),
                        ),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").short('n').required(true))
                        .arg(Arg::new("type").long("type").short('t').required(true)),
                )
                .subcommand(output_flags(
                    Command::new("list").arg(Arg::new("type").long("type").short('t')),
                ))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("defaults").about("Seed default categories if none exist"),
                ),
        )
        .subcommand(
            Command::new("balance")
                .about("Initial balance and current wealth")
                .subcommand(output_flags(Command::new("show")))
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("amount")
                            .required(true)
                            .allow_hyphen_values(true),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated statistics")
                .subcommand(output_flags(
                    Command::new("dashboard")
                        .about("Balance, period totals, trend and top categories")
                        .arg(period_arg()),
                ))
                .subcommand(output_flags(
                    Command::new("stats")
                        .about("Totals for a period")
                        .arg(period_arg()),
                ))
                .subcommand(output_flags(
                    Command::new("breakdown")
                        .about("Per-category totals for a period")
                        .arg(period_arg())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .help("Collapse to top N + Others for this type"),
                        )
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        ),
                ))
                .subcommand(output_flags(
                    Command::new("trend")
                        .about("Cumulative daily income/expense")
                        .arg(period_arg()),
                )),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv | json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Report malformed ledger rows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }
}
