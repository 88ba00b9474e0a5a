// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{self, ExpenseFilter, SortOrder};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("salaries", sub)) => export_salaries(conn, sub),
        Some(("expenses", sub)) => export_expenses(conn, sub),
        Some(("debts", sub)) => export_debts(conn, sub),
        _ => Ok(()),
    }
}

fn export_salaries(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let entries = store::find_salaries(conn, None, SortOrder::Asc)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "amount", "source"])?;
            for e in &entries {
                wtr.write_record([
                    e.id.to_string(),
                    e.date.to_string(),
                    e.amount.to_string(),
                    e.source.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&entries)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} salary entries to {}", entries.len(), out);
    Ok(())
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let entries = store::find_expenses(conn, None, ExpenseFilter::All, SortOrder::Asc)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "amount", "category", "description"])?;
            for e in &entries {
                wtr.write_record([
                    e.id.to_string(),
                    e.date.to_string(),
                    e.amount.to_string(),
                    e.category.to_string(),
                    e.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&entries)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} expense entries to {}", entries.len(), out);
    Ok(())
}

fn export_debts(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    // Export is not scoped to one counterparty; pull every person on file.
    let mut entries = Vec::new();
    let mut stmt = conn.prepare("SELECT DISTINCT person FROM debts ORDER BY person")?;
    let people = stmt.query_map([], |r| r.get::<_, String>(0))?;
    for person in people {
        let person = person?;
        entries.extend(store::find_debts(conn, &person, None, SortOrder::Asc)?);
    }

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "amount", "person", "type", "description"])?;
            for e in &entries {
                wtr.write_record([
                    e.id.to_string(),
                    e.date.to_string(),
                    e.amount.to_string(),
                    e.person.clone(),
                    e.direction.to_string(),
                    e.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&entries)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} debt entries to {}", entries.len(), out);
    Ok(())
}
