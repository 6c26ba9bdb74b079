// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget;
use crate::entry::EXPENSE_CATEGORIES;
use crate::models::{BudgetCategory, RecentSpend};
use crate::utils::{
    current_month, fmt_money, maybe_print_json, optional_arg, parse_positive, pretty_table,
    required_arg, slugify,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tracing::debug;

const RECENT_LIMIT: usize = 5;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required_arg(sub, "name")?;
    let amount = required_arg(sub, "amount")?;
    let color = optional_arg(sub, "color");
    let mut cats = load_categories(conn, &current_month())?;
    if let Some(c) = budget::add_category(&mut cats, name, amount, color) {
        insert_category(conn, c, None)?;
        println!(
            "Added budget '{}' ({}) = {} per month",
            c.name,
            c.key,
            fmt_money(&c.monthly_budget)
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let cats = load_categories(conn, &current_month())?;
    if !maybe_print_json(json_flag, jsonl_flag, &cats)? {
        let rows = cats
            .iter()
            .map(|c| {
                vec![
                    c.key.clone(),
                    c.name.clone(),
                    c.color.clone(),
                    fmt_money(&c.monthly_budget),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Key", "Name", "Color", "Monthly budget"], rows)
        );
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = slugify(required_arg(sub, "category")?);
    let Some(amount) = parse_positive(required_arg(sub, "amount")?) else {
        debug!(%key, "set-budget ignored: amount missing or not positive");
        return Ok(());
    };
    let n = conn.execute(
        "UPDATE budget_categories SET monthly_budget=?1, synced=0 WHERE key=?2",
        params![amount.to_string(), key],
    )?;
    if n == 0 {
        return Err(anyhow::anyhow!("Budget category '{}' not found", key));
    }
    println!("Budget for {} set to {}", key, fmt_money(&amount));
    Ok(())
}

pub fn insert_category(
    conn: &Connection,
    c: &BudgetCategory,
    remote_id: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO budget_categories(key, name, color, monthly_budget, remote_id, synced)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            c.key,
            c.name,
            c.color,
            c.monthly_budget.to_string(),
            remote_id,
            remote_id.is_some()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The standard categories of the expense form, with typical monthly amounts.
pub fn insert_defaults(conn: &Connection) -> Result<usize> {
    let amounts: [i64; 6] = [80000, 75000, 20000, 25000, 150000, 30000];
    let mut added = 0;
    for (opt, amount) in EXPENSE_CATEGORIES.iter().zip(amounts) {
        added += conn.execute(
            "INSERT OR IGNORE INTO budget_categories(key, name, color, monthly_budget)
             VALUES (?1, ?2, ?3, ?4)",
            params![opt.id, opt.name, opt.color, amount.to_string()],
        )?;
    }
    Ok(added)
}

pub fn budget_keys(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT key FROM budget_categories ORDER BY key")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Categories with `spent` summed from the month's expense transactions.
pub fn load_categories(conn: &Connection, month: &str) -> Result<Vec<BudgetCategory>> {
    let mut stmt = conn.prepare(
        "SELECT id, key, name, color, monthly_budget FROM budget_categories ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;

    let mut spent_stmt = conn.prepare_cached(
        "SELECT date, amount, COALESCE(note, '') FROM transactions
         WHERE kind='expense' AND category=?1 AND substr(date,1,7)=?2
         ORDER BY date DESC, id DESC",
    )?;

    let mut out = Vec::new();
    for row in rows {
        let (id, key, name, color, budget_s) = row?;
        let monthly_budget = budget_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget amount '{}' for {}", budget_s, key))?;

        let mut spent = Decimal::ZERO;
        let mut recent = Vec::new();
        let mut cur = spent_stmt.query(params![key, month])?;
        while let Some(r) = cur.next()? {
            let d: String = r.get(0)?;
            let a_s: String = r.get(1)?;
            let note: String = r.get(2)?;
            let amount = a_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in transactions", a_s))?;
            spent += amount;
            if recent.len() < RECENT_LIMIT {
                recent.push(RecentSpend {
                    date: chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d")?,
                    description: if note.is_empty() { name.clone() } else { note },
                    amount,
                });
            }
        }
        out.push(BudgetCategory {
            id,
            key,
            name,
            color,
            monthly_budget,
            spent,
            recent,
        });
    }
    Ok(out)
}
