// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{self, Payslip};
use crate::models::MonthKey;
use crate::store::{self, DeductionInput, ExpenseFilter, PAYSLIP_DEDUCTION_FIELDS, SortOrder};
use crate::utils::{maybe_print_json, parse_decimal, parse_month, parse_positive_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("payslip", sub)) => payslip(conn, sub)?,
        Some(("bonus", sub)) => bonus(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

// Zero and absent deduction flags produce no row.
fn collect_deductions(sub: &clap::ArgMatches) -> Result<Vec<DeductionInput>> {
    let mut deductions = Vec::new();
    for &(flag, description, category) in PAYSLIP_DEDUCTION_FIELDS {
        if let Some(raw) = sub.get_one::<String>(flag) {
            let amount = parse_decimal(raw)?;
            if amount > Decimal::ZERO {
                deductions.push(DeductionInput {
                    description: description.to_string(),
                    category,
                    amount,
                });
            }
        }
    }
    Ok(deductions)
}

fn payslip(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let gross = parse_positive_decimal(sub.get_one::<String>("gross").unwrap())?;
    let deductions = collect_deductions(sub)?;
    let date = store::create_payslip(conn, month, gross, &deductions)?;
    println!(
        "Recorded payslip of {} on {} with {} deduction(s)",
        gross,
        date,
        deductions.len()
    );
    Ok(())
}

fn bonus(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = store::insert_bonus(conn, month, amount)?;
    println!("Recorded bonus of {} on {}", amount, date);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let payslips = month_payslips(conn, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &payslips)? {
        let rows = payslips
            .iter()
            .map(|p| {
                vec![
                    p.salary.id.to_string(),
                    p.salary.date.to_string(),
                    p.salary.source.to_string(),
                    format!("{:.2}", p.salary.amount),
                    format!("{:.2}", p.total_deductions),
                    format!("{:.2}", p.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Source", "Gross", "Deductions", "Net"], rows)
        );
    }
    Ok(())
}

/// The month's salary entries, newest first, each with its same-dated
/// deduction rows attached.
pub fn month_payslips(conn: &Connection, month: MonthKey) -> Result<Vec<Payslip>> {
    let window = month.window();
    let salaries = store::find_salaries(conn, Some(&window), SortOrder::Desc)?;
    let deductions = store::find_expenses(
        conn,
        Some(&window),
        ExpenseFilter::Deductions,
        SortOrder::Desc,
    )?;
    Ok(salaries
        .into_iter()
        .map(|s| aggregate::payslip_with_deductions(s, &deductions))
        .collect())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let gross = parse_positive_decimal(sub.get_one::<String>("gross").unwrap())?;
    let deductions = collect_deductions(sub)?;
    let date = store::update_payslip(conn, id, month, gross, &deductions)?;
    println!("Updated payslip {} (now dated {})", id, date);
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    store::delete_salary(conn, id)?;
    println!("Removed salary entry {}", id);
    Ok(())
}
