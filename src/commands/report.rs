// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::models::{DateWindow, MonthKey};
use crate::store::{self, ExpenseFilter, SortOrder};
use crate::utils::{maybe_print_json, paginate, parse_month, parse_year, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("trends", sub)) => trends(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("deductions", sub)) => deductions(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let page = *sub.get_one::<usize>("page").unwrap();
    let per_page = *sub.get_one::<usize>("per-page").unwrap();
    let person = sub.get_one::<String>("person").unwrap();

    let salaries = store::find_salaries(conn, None, SortOrder::Asc)?;
    let expenses = store::find_expenses(conn, None, ExpenseFilter::All, SortOrder::Asc)?;
    let debts = store::find_debts(conn, person, None, SortOrder::Asc)?;

    let mut months = aggregate::observed_months(&salaries, &expenses, &debts);
    months.reverse();
    let summaries = aggregate::monthly_summary(&salaries, &expenses, &debts, &months);
    let total_net_balance: Decimal = summaries.iter().map(|s| s.net_balance).sum();
    let (page_rows, total_pages) = paginate(&summaries, page, per_page);

    if !maybe_print_json(json_flag, jsonl_flag, &page_rows)? {
        let rows = page_rows
            .iter()
            .map(|s| {
                vec![
                    s.month.to_string(),
                    format!("{:.2}", s.gross),
                    format!("{:.2}", s.deductions),
                    format!("{:.2}", s.net_income),
                    format!("{:.2}", s.total_expenses),
                    format!("{:.2}", s.debt_balance),
                    format!("{:.2}", s.net_balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Month",
                    "Gross",
                    "Deductions",
                    "Net Income",
                    "Expenses",
                    "Debt (Monthly)",
                    "Net Balance",
                ],
                rows
            )
        );
        println!("Total net balance: {:.2}", total_net_balance);
        println!("Page {} of {}", page, total_pages.max(1));
    }
    Ok(())
}

fn trends(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year = parse_year(sub.get_one::<String>("year").unwrap())?;
    let person = sub.get_one::<String>("person").unwrap();

    let window = DateWindow::year(year).with_context(|| format!("Invalid year {}", year))?;
    let salaries = store::find_salaries(conn, Some(&window), SortOrder::Asc)?;
    let expenses = store::find_expenses(conn, Some(&window), ExpenseFilter::All, SortOrder::Asc)?;
    let debts = store::find_debts(conn, person, Some(&window), SortOrder::Asc)?;

    let months = MonthKey::months_of_year(year);
    let summaries = aggregate::monthly_summary(&salaries, &expenses, &debts, &months);

    if !maybe_print_json(json_flag, jsonl_flag, &summaries)? {
        let rows = summaries
            .iter()
            .map(|s| {
                vec![
                    s.month.to_string(),
                    format!("{:.2}", s.net_income),
                    format!("{:.2}", s.total_expenses),
                    format!("{:.2}", s.net_balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Net Income", "Expenses", "Net Balance"], rows)
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let person = sub.get_one::<String>("person").unwrap();

    let window = month.window();
    let expenses = store::find_expenses(conn, Some(&window), ExpenseFilter::All, SortOrder::Asc)?;
    let debts = store::find_debts(conn, person, Some(&window), SortOrder::Asc)?;
    let mut breakdown = aggregate::category_breakdown(&expenses, &debts, person, window);
    aggregate::sort_by_total_desc(&mut breakdown);

    if !maybe_print_json(json_flag, jsonl_flag, &breakdown)? {
        let rows = breakdown
            .iter()
            .map(|c| vec![c.label.clone(), format!("{:.2}", c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Total"], rows));
    }
    Ok(())
}

fn deductions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let page = *sub.get_one::<usize>("page").unwrap();
    let per_page = *sub.get_one::<usize>("per-page").unwrap();

    let expenses = store::find_expenses(conn, None, ExpenseFilter::Deductions, SortOrder::Asc)?;
    let mut breakdown = aggregate::monthly_deductions(&expenses);
    breakdown.reverse();
    let (page_rows, total_pages) = paginate(&breakdown, page, per_page);

    if !maybe_print_json(json_flag, jsonl_flag, &page_rows)? {
        let rows = page_rows
            .iter()
            .map(|d| {
                let split = d
                    .by_category
                    .iter()
                    .map(|(category, amount)| format!("{} {:.2}", category, amount))
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![d.month.to_string(), format!("{:.2}", d.total), split]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Total", "Breakdown"], rows)
        );
        println!("Page {} of {}", page, total_pages.max(1));
    }
    Ok(())
}
