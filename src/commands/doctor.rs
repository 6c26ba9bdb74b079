// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::goals::load_goals;
use crate::goals::is_completed;
use crate::sync::pending_counts;
use crate::utils::{pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// `(issue, detail)` pairs; empty when nothing needs attention.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Budgets that every expense will push over
    let mut stmt = conn.prepare("SELECT key, monthly_budget FROM budget_categories ORDER BY key")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let key: String = r.get(0)?;
        let amount: String = r.get(1)?;
        if amount.parse::<Decimal>().map(|a| a <= Decimal::ZERO).unwrap_or(true) {
            rows.push(vec!["zero_budget".into(), key]);
        }
    }

    // 2) Goals past their deadline and still short
    let day = today();
    for g in load_goals(conn)? {
        if g.deadline <= day && !is_completed(g.saved, g.target) {
            rows.push(vec![
                "overdue_goal".into(),
                format!("{} (due {})", g.name, g.deadline),
            ]);
        }
    }

    // 3) Records not yet pushed
    for (table, n) in pending_counts(conn)? {
        if n > 0 {
            rows.push(vec!["unsynced".into(), format!("{} {}", n, table)]);
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
