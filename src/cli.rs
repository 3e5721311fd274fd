// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{ArgGroup, Command, arg, value_parser};

fn with_output(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON").conflicts_with("jsonl"))
        .arg(arg!(--jsonl "Print one JSON object per line"))
}

/// `--month YYYY-MM` or `--year YYYY`, plus the note domain.
fn period_args(cmd: Command) -> Command {
    cmd.arg(arg!(--month <YYYYMM> "YYYY-MM").required(false))
        .arg(
            arg!(--year <YEAR> "Note for the whole year")
                .required(false)
                .value_parser(value_parser!(i32)),
        )
        .group(
            ArgGroup::new("period")
                .args(["month", "year"])
                .required(true),
        )
        .arg(arg!(--domain <DOMAIN>).required(false))
}

pub fn build_cli() -> Command {
    Command::new("homeledger")
        .about("Household ledger: transactions, recurring expenses, properties and monthly notes")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            arg!(--backend <KIND> "Store to use: local or remote")
                .required(false)
                .global(true)
                .env("HOMELEDGER_BACKEND"),
        )
        .arg(
            arg!(--"api-url" <URL> "Base URL of the REST backend")
                .required(false)
                .global(true)
                .env("HOMELEDGER_API_URL"),
        )
        .arg(arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(Command::new("init").about("Create the data directory, settings and local database"))
        .subcommand(
            Command::new("login")
                .about("Sign in to the REST backend")
                .arg(arg!(--email <EMAIL>).required(true))
                .arg(
                    arg!(--password <PASSWORD>)
                        .required(true)
                        .env("HOMELEDGER_PASSWORD")
                        .hide_env_values(true),
                ),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(with_output(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(arg!(<KEY> "Setting name").required(true))
                        .arg(arg!(<VALUE> "New value").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(
                            arg!(--"type" <TYPE> "income or expense")
                                .required(false)
                                .default_value("expense"),
                        )
                        .arg(arg!(--color <HEX> "#RRGGBB; derived from the name when omitted").required(false)),
                )
                .subcommand(with_output(
                    Command::new("list").arg(arg!(--"type" <TYPE> "Only this type").required(false)),
                ))
                .subcommand(with_output(
                    Command::new("show").arg(arg!(<CATEGORY> "Id or name").required(true)),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<CATEGORY> "Id or name").required(true))
                        .arg(arg!(--name <NAME>).required(false))
                        .arg(arg!(--"type" <TYPE>).required(false))
                        .arg(arg!(--color <HEX>).required(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<CATEGORY> "Id or name").required(true))),
        )
        .subcommand(
            Command::new("expense")
                .about("Manage recurring and installment expenses")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(
                            arg!(--day <DAY> "Day of month, 1-31")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(arg!(--amount <AMOUNT> "Omit for a variable amount").required(false))
                        .arg(
                            arg!(--"type" <TYPE> "ongoing or installment")
                                .required(false)
                                .default_value("ongoing"),
                        )
                        .arg(
                            arg!(--payments <N> "Total payments, installments only")
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(arg!(--start <DATE> "Defaults to today").required(false))
                        .arg(arg!(--notes <TEXT>).required(false)),
                )
                .subcommand(with_output(
                    Command::new("list")
                        .arg(arg!(--active "Only active definitions").conflicts_with("inactive"))
                        .arg(arg!(--inactive "Only inactive definitions"))
                        .arg(arg!(--"type" <TYPE> "ongoing or installment").required(false)),
                ))
                .subcommand(with_output(
                    Command::new("show").arg(arg!(<EXPENSE> "Id or name").required(true)),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<EXPENSE> "Id or name").required(true))
                        .arg(arg!(--name <NAME>).required(false))
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(
                            arg!(--day <DAY>)
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(arg!(--amount <AMOUNT>).required(false))
                        .arg(arg!(--"type" <TYPE>).required(false))
                        .arg(
                            arg!(--payments <N>)
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(arg!(--start <DATE>).required(false))
                        .arg(arg!(--active <BOOL> "true or false").required(false))
                        .arg(arg!(--notes <TEXT>).required(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<EXPENSE> "Id or name").required(true)))
                .subcommand(with_output(
                    Command::new("generate")
                        .about("Record one payment of the expense as a transaction")
                        .arg(arg!(<EXPENSE> "Id or name").required(true))
                        .arg(arg!(--date <DATE> "Defaults to today").required(false))
                        .arg(arg!(--amount <AMOUNT> "Overrides the expense amount").required(false))
                        .arg(arg!(--property <PROPERTY> "Defaults to the default property").required(false))
                        .arg(arg!(--notes <TEXT>).required(false)),
                ))
                .subcommand(with_output(
                    Command::new("upcoming")
                        .about("Active expenses still due this month")
                        .arg(arg!(--date <DATE> "Reference day, defaults to today").required(false)),
                )),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--date <DATE>).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--property <PROPERTY> "Defaults to the default property").required(false))
                        .arg(arg!(--description <TEXT>).required(false))
                        .arg(arg!(--tags <TAGS> "Comma separated").required(false))
                        .arg(arg!(--"payment-method" <METHOD>).required(false))
                        .arg(arg!(--expense <EXPENSE> "Link to an expense definition").required(false))
                        .arg(arg!(--notes <TEXT>).required(false)),
                )
                .subcommand(with_output(
                    Command::new("list")
                        .arg(arg!(--month <YYYYMM> "YYYY-MM").required(false).conflicts_with_all(["from", "to"]))
                        .arg(arg!(--from <DATE>).required(false))
                        .arg(arg!(--to <DATE>).required(false))
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(
                            arg!(--limit <N>)
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            arg!(--offset <N>)
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        ),
                ))
                .subcommand(with_output(
                    Command::new("show").arg(arg!(<ID>).required(true)),
                ))
                .subcommand(Command::new("rm").arg(arg!(<ID>).required(true))),
        )
        .subcommand(
            Command::new("property")
                .about("Manage properties")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--inactive "Create as inactive"))
                        .arg(arg!(--default "Make it the default property")),
                )
                .subcommand(with_output(Command::new("list")))
                .subcommand(with_output(
                    Command::new("show").arg(arg!(<PROPERTY> "Id or name").required(true)),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<PROPERTY> "Id or name").required(true))
                        .arg(arg!(--name <NAME>).required(false))
                        .arg(arg!(--active <BOOL>).required(false))
                        .arg(arg!(--default <BOOL>).required(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<PROPERTY> "Id or name").required(true)))
                .subcommand(
                    Command::new("default")
                        .about("Make a property the default")
                        .arg(arg!(<PROPERTY> "Id or name").required(true)),
                ),
        )
        .subcommand(
            Command::new("note")
                .about("Monthly and yearly notes")
                .subcommand(with_output(
                    Command::new("list").arg(arg!(--domain <DOMAIN>).required(false)),
                ))
                .subcommand(with_output(period_args(Command::new("show"))))
                .subcommand(
                    period_args(Command::new("set"))
                        .about("Create or replace the note for a month or a year")
                        .arg(arg!(--text <TEXT>).required(true)),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<ID>).required(true))
                        .arg(arg!(--text <TEXT>).required(true)),
                )
                .subcommand(Command::new("rm").arg(arg!(<ID>).required(true))),
        )
        .subcommand(with_output(
            Command::new("dashboard")
                .about("Month summary, spending by category, trend, upcoming expenses and notes")
                .arg(arg!(--month <YYYYMM> "YYYY-MM, defaults to the current month").required(false))
                .arg(
                    arg!(--months <N> "Trend window in months, 1-120")
                        .required(false)
                        .default_value("6")
                        .value_parser(value_parser!(u32).range(1..=120)),
                ),
        ))
}
