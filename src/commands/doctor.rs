// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Deduction rows whose date matches no payslip. The deduction link
    // is exact date equality, so these are unreachable from any payslip.
    let mut stmt = conn.prepare(
        "SELECT date, category, amount FROM expenses
         WHERE category IN ('Taxes','Benefits','Retirement','Other')
           AND NOT EXISTS (
               SELECT 1 FROM salaries s
               WHERE s.date=expenses.date AND s.source='Payslip'
           )
         ORDER BY date",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let date: String = r.get(0)?;
        let category: String = r.get(1)?;
        let amount: String = r.get(2)?;
        rows.push(vec![
            "orphan_deduction".into(),
            format!("{} {} {}", date, category, amount),
        ]);
    }

    // 2) Two salary rows on one exact date
    let mut stmt2 =
        conn.prepare("SELECT date, COUNT(*) FROM salaries GROUP BY date HAVING COUNT(*) > 1")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let date: String = r.get(0)?;
        let n: i64 = r.get(1)?;
        rows.push(vec![
            "salary_date_collision".into(),
            format!("{} x{}", date, n),
        ]);
    }

    // 3) Amounts that fail to parse or are not positive
    for table in ["salaries", "expenses", "debts"] {
        let mut stmt3 = conn.prepare(&format!("SELECT id, amount FROM {} ORDER BY id", table))?;
        let mut cur3 = stmt3.query([])?;
        while let Some(r) = cur3.next()? {
            let id: i64 = r.get(0)?;
            let amount: String = r.get(1)?;
            match amount.parse::<Decimal>() {
                Ok(d) if d > Decimal::ZERO => {}
                Ok(_) => rows.push(vec![
                    "non_positive_amount".into(),
                    format!("{} #{} = {}", table, id, amount),
                ]),
                Err(_) => rows.push(vec![
                    "bad_amount".into(),
                    format!("{} #{} = '{}'", table, id, amount),
                ]),
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
