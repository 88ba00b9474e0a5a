// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use homeledger::{cli, commands::exporter};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE salaries(id INTEGER PRIMARY KEY AUTOINCREMENT, date TEXT NOT NULL, amount TEXT NOT NULL, source TEXT NOT NULL);
        CREATE TABLE expenses(id INTEGER PRIMARY KEY AUTOINCREMENT, date TEXT NOT NULL, amount TEXT NOT NULL, category TEXT NOT NULL, description TEXT NOT NULL);
        CREATE TABLE debts(id INTEGER PRIMARY KEY AUTOINCREMENT, date TEXT NOT NULL, amount TEXT NOT NULL, person TEXT NOT NULL, type TEXT NOT NULL, description TEXT NOT NULL);
        "#,
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args.iter().copied());
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_expenses_writes_csv_rows() {
    let conn = setup();
    conn.execute(
        "INSERT INTO expenses(date, amount, category, description) VALUES \
        ('2024-03-02','1200','Rent','Rent'), ('2024-03-15','500','Taxes','Federal Income Tax')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("expenses.csv");
    let out_str = out_path.to_string_lossy().to_string();
    run_export(
        &conn,
        &[
            "homeledger",
            "export",
            "expenses",
            "--format",
            "csv",
            "--out",
            &out_str,
        ],
    );

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "id,date,amount,category,description");
    assert_eq!(lines[1], "1,2024-03-02,1200,Rent,Rent");
    assert_eq!(lines[2], "2,2024-03-15,500,Taxes,Federal Income Tax");
}

#[test]
fn export_debts_streams_pretty_json() {
    let conn = setup();
    conn.execute(
        "INSERT INTO debts(date, amount, person, type, description) VALUES \
        ('2024-03-01','30','Mom','iOwe','groceries')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("debts.json");
    let out_str = out_path.to_string_lossy().to_string();
    run_export(
        &conn,
        &[
            "homeledger",
            "export",
            "debts",
            "--format",
            "json",
            "--out",
            &out_str,
        ],
    );

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "date": "2024-03-01",
                "amount": "30",
                "person": "Mom",
                "type": "iOwe",
                "description": "groceries"
            }
        ])
    );
}

#[test]
fn export_rejects_unknown_format_at_parse_time() {
    let cli = cli::build_cli();
    let res = cli.try_get_matches_from([
        "homeledger",
        "export",
        "salaries",
        "--format",
        "xml",
        "--out",
        "out.xml",
    ]);
    assert!(res.is_err());
}
