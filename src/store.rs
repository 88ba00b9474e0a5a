// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage collaborator over SQLite. Amounts and dates are stored as TEXT
//! and parsed on read. Writes that touch both a payslip and its deduction
//! rows run inside one transaction; deductions relate to their payslip by
//! exact date, so each row kind keeps its own day-of-month slot.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Transaction, params, params_from_iter};
use rust_decimal::Decimal;

use crate::models::{
    DateWindow, DebtDirection, DebtEntry, ExpenseCategory, ExpenseEntry, MonthKey, SalaryEntry,
    SalarySource,
};

/// Edit or delete aimed at a row that is not there.
#[derive(Debug, thiserror::Error)]
#[error("{kind} entry {id} not found")]
pub struct NotFound {
    pub kind: &'static str,
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseFilter {
    All,
    /// Taxes, Benefits, Retirement, Other.
    Deductions,
    /// Everything that is neither a deduction nor Gasoline.
    General,
    Category(ExpenseCategory),
}

// Must stay in sync with ExpenseCategory::DEDUCTIONS.
const DEDUCTION_SET_SQL: &str = "('Taxes','Benefits','Retirement','Other')";

// Day-of-month slots per row kind. The first payslip of a month lands on
// day 15, later ones on 16, 17, ... so same-month payslips never collide.
const FIRST_PAYSLIP_DAY: u32 = 15;
const BONUS_DAY: u32 = 28;
const EXPENSE_DAY: u32 = 2;
const DEBT_DAY: u32 = 1;

/// Fixed payslip deduction catalog: CLI flag, ledger description, category.
pub const PAYSLIP_DEDUCTION_FIELDS: &[(&str, &str, ExpenseCategory)] = &[
    ("federal-tax", "Federal Income Tax", ExpenseCategory::Taxes),
    ("social-security-tax", "Social Security Tax", ExpenseCategory::Taxes),
    ("medicare-tax", "Medicare Tax", ExpenseCategory::Taxes),
    ("ca-state-tax", "CA State Income Tax", ExpenseCategory::Taxes),
    ("ca-sdi-tax", "CA SDI Tax", ExpenseCategory::Taxes),
    ("medical-pre-tax", "Medical Pre Tax", ExpenseCategory::Benefits),
    ("401k", "401K", ExpenseCategory::Retirement),
    ("other", "Other", ExpenseCategory::Other),
];

#[derive(Debug, Clone)]
pub struct DeductionInput {
    pub description: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
}

fn day_in_month(month: MonthKey, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(month.year(), month.month(), day)
        .with_context(|| format!("No day {} in {}", day, month))
}

fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid stored date '{}'", s))
}

fn parse_stored_amount(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid stored amount '{}'", s))
}

fn push_window(sql: &mut String, params_vec: &mut Vec<String>, window: Option<&DateWindow>) {
    if let Some(w) = window {
        sql.push_str(" AND date>=? AND date<?");
        params_vec.push(w.start.to_string());
        params_vec.push(w.end.to_string());
    }
}

pub fn find_salaries(
    conn: &Connection,
    window: Option<&DateWindow>,
    order: SortOrder,
) -> Result<Vec<SalaryEntry>> {
    let mut sql = String::from("SELECT id, date, amount, source FROM salaries WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();
    push_window(&mut sql, &mut params_vec, window);
    sql.push_str(&format!(
        " ORDER BY date {order}, id {order}",
        order = order.as_sql()
    ));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(params_vec.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let source: String = r.get(3)?;
        out.push(SalaryEntry {
            id,
            date: parse_stored_date(&date)?,
            amount: parse_stored_amount(&amount)?,
            source: SalarySource::parse(&source)
                .with_context(|| format!("Invalid salary source '{}'", source))?,
        });
    }
    Ok(out)
}

pub fn find_expenses(
    conn: &Connection,
    window: Option<&DateWindow>,
    filter: ExpenseFilter,
    order: SortOrder,
) -> Result<Vec<ExpenseEntry>> {
    let mut sql =
        String::from("SELECT id, date, amount, category, description FROM expenses WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();
    push_window(&mut sql, &mut params_vec, window);
    match filter {
        ExpenseFilter::All => {}
        ExpenseFilter::Deductions => {
            sql.push_str(&format!(" AND category IN {}", DEDUCTION_SET_SQL));
        }
        ExpenseFilter::General => {
            sql.push_str(&format!(
                " AND category NOT IN {} AND category<>'Gasoline'",
                DEDUCTION_SET_SQL
            ));
        }
        ExpenseFilter::Category(category) => {
            sql.push_str(" AND category=?");
            params_vec.push(category.as_str().to_string());
        }
    }
    sql.push_str(&format!(
        " ORDER BY date {order}, id {order}",
        order = order.as_sql()
    ));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(params_vec.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let category: String = r.get(3)?;
        let description: String = r.get(4)?;
        out.push(ExpenseEntry {
            id,
            date: parse_stored_date(&date)?,
            amount: parse_stored_amount(&amount)?,
            category: ExpenseCategory::parse(&category)
                .with_context(|| format!("Invalid expense category '{}'", category))?,
            description,
        });
    }
    Ok(out)
}

pub fn find_debts(
    conn: &Connection,
    person: &str,
    window: Option<&DateWindow>,
    order: SortOrder,
) -> Result<Vec<DebtEntry>> {
    let mut sql = String::from(
        "SELECT id, date, amount, person, type, description FROM debts WHERE person=?",
    );
    let mut params_vec: Vec<String> = vec![person.to_string()];
    push_window(&mut sql, &mut params_vec, window);
    sql.push_str(&format!(
        " ORDER BY date {order}, id {order}",
        order = order.as_sql()
    ));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(params_vec.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let person: String = r.get(3)?;
        let direction: String = r.get(4)?;
        let description: String = r.get(5)?;
        out.push(DebtEntry {
            id,
            date: parse_stored_date(&date)?,
            amount: parse_stored_amount(&amount)?,
            person,
            direction: DebtDirection::parse(&direction)
                .with_context(|| format!("Invalid debt type '{}'", direction))?,
            description,
        });
    }
    Ok(out)
}

pub fn count_payslips(conn: &Connection, window: &DateWindow) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM salaries WHERE source='Payslip' AND date>=?1 AND date<?2",
        params![window.start.to_string(), window.end.to_string()],
        |r| r.get(0),
    )?;
    Ok(n)
}

pub fn get_salary(conn: &Connection, id: i64) -> Result<Option<SalaryEntry>> {
    let row = conn
        .query_row(
            "SELECT id, date, amount, source FROM salaries WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;
    match row {
        Some((id, date, amount, source)) => Ok(Some(SalaryEntry {
            id,
            date: parse_stored_date(&date)?,
            amount: parse_stored_amount(&amount)?,
            source: SalarySource::parse(&source)
                .with_context(|| format!("Invalid salary source '{}'", source))?,
        })),
        None => Ok(None),
    }
}

/// Insert a payslip and its deduction rows atomically, all sharing the
/// month's next free payslip date.
pub fn create_payslip(
    conn: &mut Connection,
    month: MonthKey,
    gross: Decimal,
    deductions: &[DeductionInput],
) -> Result<NaiveDate> {
    let existing = count_payslips(conn, &month.window())?;
    let date = day_in_month(month, FIRST_PAYSLIP_DAY + existing as u32)?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO salaries(date, amount, source) VALUES (?1, ?2, 'Payslip')",
        params![date.to_string(), gross.to_string()],
    )?;
    insert_deductions(&tx, date, deductions)?;
    tx.commit()?;
    Ok(date)
}

/// Rewrite a payslip: delete the old same-dated deduction rows, update the
/// salary row, insert the replacements — one transaction. The original
/// day-of-month is preserved so sibling payslips keep their dates.
pub fn update_payslip(
    conn: &mut Connection,
    id: i64,
    month: MonthKey,
    gross: Decimal,
    deductions: &[DeductionInput],
) -> Result<NaiveDate> {
    let original = get_salary(conn, id)?.ok_or(NotFound { kind: "salary", id })?;
    let date = day_in_month(month, original.date.day())?;

    let tx = conn.transaction()?;
    tx.execute(
        &format!(
            "DELETE FROM expenses WHERE date=?1 AND category IN {}",
            DEDUCTION_SET_SQL
        ),
        params![original.date.to_string()],
    )?;
    tx.execute(
        "UPDATE salaries SET date=?1, amount=?2 WHERE id=?3",
        params![date.to_string(), gross.to_string(), id],
    )?;
    insert_deductions(&tx, date, deductions)?;
    tx.commit()?;
    Ok(date)
}

/// Delete a salary entry. A payslip takes its same-dated deduction rows
/// with it (compensating cascade, not a foreign key); a bonus is a single
/// delete.
pub fn delete_salary(conn: &mut Connection, id: i64) -> Result<()> {
    let salary = get_salary(conn, id)?.ok_or(NotFound { kind: "salary", id })?;
    if salary.source == SalarySource::Payslip {
        let tx = conn.transaction()?;
        tx.execute(
            &format!(
                "DELETE FROM expenses WHERE date=?1 AND category IN {}",
                DEDUCTION_SET_SQL
            ),
            params![salary.date.to_string()],
        )?;
        tx.execute("DELETE FROM salaries WHERE id=?1", params![id])?;
        tx.commit()?;
    } else {
        conn.execute("DELETE FROM salaries WHERE id=?1", params![id])?;
    }
    Ok(())
}

fn insert_deductions(
    tx: &Transaction<'_>,
    date: NaiveDate,
    deductions: &[DeductionInput],
) -> Result<()> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO expenses(date, amount, category, description) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for d in deductions {
        stmt.execute(params![
            date.to_string(),
            d.amount.to_string(),
            d.category.as_str(),
            d.description
        ])?;
    }
    Ok(())
}

pub fn insert_bonus(conn: &Connection, month: MonthKey, amount: Decimal) -> Result<NaiveDate> {
    let date = day_in_month(month, BONUS_DAY)?;
    conn.execute(
        "INSERT INTO salaries(date, amount, source) VALUES (?1, ?2, 'Bonus')",
        params![date.to_string(), amount.to_string()],
    )?;
    Ok(date)
}

pub fn insert_expense(
    conn: &Connection,
    month: MonthKey,
    category: ExpenseCategory,
    amount: Decimal,
    description: &str,
) -> Result<NaiveDate> {
    let date = day_in_month(month, EXPENSE_DAY)?;
    conn.execute(
        "INSERT INTO expenses(date, amount, category, description) VALUES (?1, ?2, ?3, ?4)",
        params![
            date.to_string(),
            amount.to_string(),
            category.as_str(),
            description
        ],
    )?;
    Ok(date)
}

pub fn update_expense(
    conn: &Connection,
    id: i64,
    date: NaiveDate,
    amount: Decimal,
    description: &str,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE expenses SET date=?1, amount=?2, description=?3 WHERE id=?4",
        params![date.to_string(), amount.to_string(), description, id],
    )?;
    if changed == 0 {
        return Err(NotFound {
            kind: "expense",
            id,
        }
        .into());
    }
    Ok(())
}

pub fn delete_expense(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(NotFound {
            kind: "expense",
            id,
        }
        .into());
    }
    Ok(())
}

pub fn insert_debt(
    conn: &Connection,
    month: MonthKey,
    person: &str,
    direction: DebtDirection,
    amount: Decimal,
    description: &str,
) -> Result<NaiveDate> {
    let date = day_in_month(month, DEBT_DAY)?;
    conn.execute(
        "INSERT INTO debts(date, amount, person, type, description) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            date.to_string(),
            amount.to_string(),
            person,
            direction.as_str(),
            description
        ],
    )?;
    Ok(date)
}

pub fn delete_debt(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM debts WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(NotFound { kind: "debt", id }.into());
    }
    Ok(())
}
