// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, builder::PossibleValuesParser};

use crate::models::{DEFAULT_PERSON, ExpenseCategory};
use crate::store::PAYSLIP_DEDUCTION_FIELDS;

pub fn build_cli() -> Command {
    Command::new("homeledger")
        .about("Household budget, payslip deduction, and family debt ledger")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(salary_cmd())
        .subcommand(expense_cmd())
        .subcommand(debt_cmd())
        .subcommand(report_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check the ledger for inconsistencies"))
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .required(true)
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .value_name("ID")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn amount_arg() -> Arg {
    Arg::new("amount")
        .long("amount")
        .value_name("AMOUNT")
        .required(true)
}

fn person_arg() -> Arg {
    Arg::new("person")
        .long("person")
        .value_name("NAME")
        .default_value(DEFAULT_PERSON)
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print JSON instead of a table")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print JSON Lines instead of a table")
            .action(ArgAction::SetTrue),
    )
}

fn page_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("page")
            .long("page")
            .value_name("N")
            .value_parser(clap::value_parser!(usize))
            .default_value("1"),
    )
    .arg(
        Arg::new("per-page")
            .long("per-page")
            .value_name("N")
            .value_parser(clap::value_parser!(usize))
            .default_value("5"),
    )
}

fn deduction_args(mut cmd: Command) -> Command {
    for &(flag, description, _) in PAYSLIP_DEDUCTION_FIELDS {
        cmd = cmd.arg(
            Arg::new(flag)
                .long(flag)
                .value_name("AMOUNT")
                .help(format!("{} deduction", description)),
        );
    }
    cmd
}

fn salary_cmd() -> Command {
    Command::new("salary")
        .about("Payslips and bonuses")
        .subcommand(deduction_args(
            Command::new("payslip")
                .about("Record a payslip with its deductions")
                .arg(month_arg())
                .arg(
                    Arg::new("gross")
                        .long("gross")
                        .value_name("AMOUNT")
                        .required(true),
                ),
        ))
        .subcommand(
            Command::new("bonus")
                .about("Record a one-off bonus")
                .arg(month_arg())
                .arg(amount_arg()),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List a month's salary entries with deductions and net pay")
                .arg(month_arg()),
        ))
        .subcommand(deduction_args(
            Command::new("edit")
                .about("Rewrite a payslip and replace its deductions")
                .arg(id_arg())
                .arg(month_arg())
                .arg(
                    Arg::new("gross")
                        .long("gross")
                        .value_name("AMOUNT")
                        .required(true),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a salary entry (payslip deductions go with it)")
                .arg(id_arg()),
        )
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Categorized expenses")
        .subcommand(
            Command::new("add")
                .about("Record an expense for a month")
                .arg(month_arg())
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("CATEGORY")
                        .required(true)
                        .value_parser(PossibleValuesParser::new(ExpenseCategory::NAMES)),
                )
                .arg(amount_arg())
                .arg(
                    Arg::new("description")
                        .long("description")
                        .value_name("TEXT"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("Month view: debt account, category totals, expense details")
                .arg(month_arg())
                .arg(person_arg()),
        ))
        .subcommand(
            Command::new("edit")
                .about("Update an expense's date, amount and description")
                .arg(id_arg())
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .required(true),
                )
                .arg(amount_arg())
                .arg(
                    Arg::new("description")
                        .long("description")
                        .value_name("TEXT")
                        .required(true),
                ),
        )
        .subcommand(Command::new("rm").about("Delete an expense").arg(id_arg()))
}

fn debt_cmd() -> Command {
    Command::new("debt")
        .about("Informal debt ledger")
        .subcommand(
            Command::new("add")
                .about("Record a debt transaction")
                .arg(month_arg())
                .arg(amount_arg())
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_name("DIRECTION")
                        .required(true)
                        .value_parser(PossibleValuesParser::new(["iOwe", "theyOwe"])),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .value_name("TEXT")
                        .required(true),
                )
                .arg(person_arg()),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("Balance and transaction history")
                .arg(month_arg().required(false))
                .arg(person_arg()),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a debt transaction")
                .arg(id_arg()),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Monthly summaries and breakdowns")
        .subcommand(json_flags(page_args(
            Command::new("summary")
                .about("All-time monthly financial summary, newest first")
                .arg(person_arg()),
        )))
        .subcommand(json_flags(
            Command::new("trends")
                .about("Twelve-month trend data for a year")
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_name("YYYY")
                        .required(true),
                )
                .arg(person_arg()),
        ))
        .subcommand(json_flags(
            Command::new("categories")
                .about("Category breakdown for a month, largest first")
                .arg(month_arg())
                .arg(person_arg()),
        ))
        .subcommand(json_flags(page_args(
            Command::new("deductions").about("Monthly deduction breakdown, newest first"),
        )))
}

fn export_cmd() -> Command {
    let table = |name: &'static str, about: &'static str| {
        Command::new(name)
            .about(about)
            .arg(
                Arg::new("format")
                    .long("format")
                    .value_name("FORMAT")
                    .required(true)
                    .value_parser(PossibleValuesParser::new(["csv", "json"])),
            )
            .arg(
                Arg::new("out")
                    .long("out")
                    .value_name("PATH")
                    .required(true),
            )
    };
    Command::new("export")
        .about("Export raw ledger rows")
        .subcommand(table("salaries", "Export salary entries"))
        .subcommand(table("expenses", "Export expense entries"))
        .subcommand(table("debts", "Export debt entries"))
}
