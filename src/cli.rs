// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (default: current month)")
}

pub fn build_cli() -> Command {
    Command::new("ndalaflow")
        .version(crate_version!())
        .about("Budgets, savings goals and reports in MWK")
        .subcommand(
            Command::new("init")
                .about("Create the database")
                .arg(
                    Arg::new("with_defaults")
                        .long("with-defaults")
                        .action(ArgAction::SetTrue)
                        .help("Add the standard budget categories"),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Log and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record income or an expense")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("income | expense"),
                        )
                        .arg(Arg::new("amount").long("amount").help("Amount in MWK"))
                        .arg(
                            Arg::new("keys")
                                .long("keys")
                                .help("Keypad presses, e.g. \"150<00\" ('<' is backspace)"),
                        )
                        .group(
                            ArgGroup::new("value")
                                .args(["amount", "keys"])
                                .required(true),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("Category id for the chosen type (see `tx categories`)"),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("categories")
                        .about("Categories offered for a transaction type")
                        .arg(Arg::new("type").long("type").default_value("expense")),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage budget categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("color").long("color").help("#RRGGBB")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("set")
                        .about("Change a category's monthly budget")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Budget progress for a month")
                .subcommand(json_flags(Command::new("status").arg(month_arg())))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("One category with its recent spending")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("deadline")
                                .long("deadline")
                                .required(true)
                                .help("YYYY-MM-DD"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("deadline").long("deadline")),
                )
                .subcommand(
                    Command::new("contribute")
                        .about("Add money to a goal")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Reports and analytics")
                .subcommand(json_flags(Command::new("summary").arg(month_arg())))
                .subcommand(json_flags(
                    Command::new("view")
                        .arg(
                            Arg::new("view")
                                .long("view")
                                .default_value("pie")
                                .help("pie | bar | trend"),
                        )
                        .arg(month_arg())
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize))
                                .help("Months covered by the bar view (default 5)"),
                        ),
                )),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Balance, this month's flow, alerts and a tip")
                .arg(
                    Arg::new("hide_balance")
                        .long("hide-balance")
                        .action(ArgAction::SetTrue),
                ),
        ))
        .subcommand(
            Command::new("theme")
                .about("Light or dark mode")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(Command::new("toggle"))
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("mode")
                            .long("mode")
                            .required(true)
                            .help("light | dark"),
                    ),
                ),
        )
        .subcommand(
            Command::new("onboard")
                .about("Set your name and phone number")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .required(true)
                        .help("+265XXXXXXXXX or 0XXXXXXXXX"),
                ),
        )
        .subcommand(
            Command::new("auth")
                .about("Sign in to cloud sync")
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("status")),
        )
        .subcommand(
            Command::new("remote")
                .about("Cloud database settings")
                .subcommand(
                    Command::new("configure")
                        .arg(Arg::new("project").long("project").required(true))
                        .arg(Arg::new("api_key").long("api-key").required(true)),
                )
                .subcommand(Command::new("show")),
        )
        .subcommand(
            Command::new("sync")
                .about("Exchange records with the cloud database")
                .subcommand(Command::new("push"))
                .subcommand(Command::new("pull"))
                .subcommand(Command::new("status")),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Look for data that needs attention"))
}
