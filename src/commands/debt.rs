// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::models::{DebtDirection, DebtEntry};
use crate::store::{self, SortOrder};
use crate::utils::{maybe_print_json, parse_month, parse_positive_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap())?;
    let raw_type = sub.get_one::<String>("type").unwrap();
    let direction = DebtDirection::parse(raw_type)
        .with_context(|| format!("Unknown debt type '{}'", raw_type))?;
    let description = sub.get_one::<String>("description").unwrap();
    let person = sub.get_one::<String>("person").unwrap();
    let date = store::insert_debt(conn, month, person, direction, amount, description)?;
    println!(
        "Recorded {} {} for {} on {}",
        direction, amount, person, date
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct DebtView {
    person: String,
    balance: Decimal,
    transactions: Vec<DebtEntry>,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let person = sub.get_one::<String>("person").unwrap();
    let window = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?
        .map(|m| m.window());
    let debts = store::find_debts(conn, person, window.as_ref(), SortOrder::Desc)?;
    let balance = aggregate::debt_balance(&debts);
    let view = DebtView {
        person: person.to_string(),
        balance,
        transactions: debts,
    };
    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    let standing = if balance > Decimal::ZERO {
        format!("{} owes you", view.person)
    } else if balance < Decimal::ZERO {
        format!("You owe {}", view.person)
    } else {
        "Settled up".to_string()
    };
    println!("Balance with {}: {:.2} ({})", view.person, balance, standing);
    let rows = view
        .transactions
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.date.to_string(),
                d.direction.to_string(),
                format!("{:.2}", d.amount),
                d.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Date", "Type", "Amount", "Description"], rows)
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    store::delete_debt(conn, id)?;
    println!("Removed debt transaction {}", id);
    Ok(())
}
