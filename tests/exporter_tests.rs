// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ndalaflow::{cli, commands::exporter, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "ndalaflow",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO transactions(date,kind,amount,source,category,note) VALUES \
        ('2025-09-02','expense','15000',NULL,'market','Limbe Market'), \
        ('2025-09-01','income','450000','salary','salary',NULL)",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();
    export(&conn, "json", &out_str).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-09-01",
                "type": "income",
                "amount": "450000",
                "currency": "MWK",
                "source": "salary",
                "category": "salary",
                "note": null
            },
            {
                "date": "2025-09-02",
                "type": "expense",
                "amount": "15000",
                "currency": "MWK",
                "source": null,
                "category": "market",
                "note": "Limbe Market"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO transactions(date,kind,amount,category) VALUES ('2025-09-05','expense','75000','school')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    export(&conn, "CSV", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "date,type,amount,currency,source,category,note");
    assert_eq!(lines[1], "2025-09-05,expense,75000,MWK,,school,");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();
    assert!(export(&conn, "xml", &out_str).is_err());
    assert!(!out_path.exists());
}
