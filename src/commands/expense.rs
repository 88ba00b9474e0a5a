// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{self, CategoryTotal};
use crate::models::{DebtEntry, ExpenseCategory, ExpenseEntry, MonthKey};
use crate::store::{self, ExpenseFilter, SortOrder};
use crate::utils::{
    maybe_print_json, parse_date, parse_month, parse_positive_decimal, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let raw_category = sub.get_one::<String>("category").unwrap();
    let category = ExpenseCategory::parse(raw_category)
        .with_context(|| format!("Unknown category '{}'", raw_category))?;
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.as_str())
        .unwrap_or(category.as_str());
    let date = store::insert_expense(conn, month, category, amount, description)?;
    println!("Recorded {} {} expense on {}", amount, category, date);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ExpenseMonth {
    pub month: MonthKey,
    pub person: String,
    pub debt_balance: Decimal,
    pub debts: Vec<DebtEntry>,
    pub categories: Vec<CategoryTotal>,
    pub grand_total: Decimal,
    pub expenses: Vec<ExpenseEntry>,
}

/// Everything the month view shows: the counterparty account, category
/// totals with the synthetic account row, and the raw general expenses.
pub fn month_view(conn: &Connection, month: MonthKey, person: &str) -> Result<ExpenseMonth> {
    let window = month.window();
    let debts = store::find_debts(conn, person, Some(&window), SortOrder::Desc)?;
    let expenses = store::find_expenses(
        conn,
        Some(&window),
        ExpenseFilter::General,
        SortOrder::Desc,
    )?;
    let spending = aggregate::category_spending(&expenses, &debts, person, window);
    Ok(ExpenseMonth {
        month,
        person: person.to_string(),
        debt_balance: aggregate::debt_balance(&debts),
        debts,
        categories: spending.categories,
        grand_total: spending.grand_total,
        expenses,
    })
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let person = sub.get_one::<String>("person").unwrap();
    let view = month_view(conn, month, person)?;
    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    println!(
        "{}'s account balance for {}: {:.2}",
        view.person, view.month, view.debt_balance
    );
    if !view.debts.is_empty() {
        let rows = view
            .debts
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
    }

    let cat_rows = view
        .categories
        .iter()
        .map(|c| vec![c.label.clone(), format!("{:.2}", c.total)])
        .collect();
    println!("{}", pretty_table(&["Category", "Total"], cat_rows));
    println!("Grand total: {:.2}", view.grand_total);

    let mut details = view.expenses.clone();
    details.sort_by(|a, b| {
        a.category
            .as_str()
            .cmp(b.category.as_str())
            .then(b.date.cmp(&a.date))
    });
    let detail_rows = details
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.category.to_string(),
                e.description.clone(),
                e.date.to_string(),
                format!("{:.2}", e.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Category", "Description", "Date", "Amount"],
            detail_rows
        )
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_positive_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    store::update_expense(conn, id, date, amount, description)?;
    println!("Updated expense {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    store::delete_expense(conn, id)?;
    println!("Removed expense {}", id);
    Ok(())
}
