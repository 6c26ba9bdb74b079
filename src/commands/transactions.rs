// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::categories::budget_keys;
use crate::entry::{AmountEntry, TransactionDraft, built_in_categories};
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::utils::{
    fmt_money, maybe_print_json, optional_arg, parse_date, parse_month, parse_positive,
    pretty_table, required_arg, today,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Fills the entry form from arguments; the draft decides whether it can be saved.
pub fn draft_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let kind: TransactionKind = required_arg(sub, "type")?.parse()?;
    let mut draft = TransactionDraft::new(kind).with_budget_categories(budget_keys(conn)?);

    let amount = match (optional_arg(sub, "amount"), optional_arg(sub, "keys")) {
        (Some(raw), _) => match parse_positive(raw) {
            Some(value) => AmountEntry::from_value(value),
            None => {
                debug!(amount = raw, "amount ignored: not a positive number");
                AmountEntry::new()
            }
        },
        (None, Some(keys)) => AmountEntry::from_keys(keys),
        (None, None) => AmountEntry::new(),
    };
    draft.set_amount(amount);

    let category = required_arg(sub, "category")?;
    if !draft.select_category(category) {
        debug!(category, kind = %kind, "category not offered for this type");
    }
    if let Some(note) = optional_arg(sub, "note") {
        draft.set_note(note);
    }
    Ok(draft)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match optional_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let draft = draft_from_args(conn, sub)?;
    let Some(tx) = draft.to_new_transaction(date) else {
        debug!(
            amount = draft.amount().text(),
            category = ?draft.category(),
            "save disabled: amount and category are both required"
        );
        return Ok(());
    };
    insert(conn, &tx, None)?;
    println!(
        "Saved {} {} ({}) on {}",
        tx.kind,
        fmt_money(&tx.amount),
        tx.category,
        tx.date
    );
    Ok(())
}

/// Writes locally; a `remote_id` marks the row as already synced.
pub fn insert(conn: &Connection, tx: &NewTransaction, remote_id: Option<&str>) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(date, kind, amount, source, category, note, remote_id, synced)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            tx.date.to_string(),
            tx.kind.as_str(),
            tx.amount.to_string(),
            tx.source.map(|s| s.as_str()),
            tx.category,
            tx.note,
            remote_id,
            remote_id.is_some()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

type RawRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    Option<String>,
);

fn to_transaction(raw: RawRow) -> Result<Transaction> {
    let (id, date, kind, amount, source, category, note, remote_id) = raw;
    Ok(Transaction {
        id,
        date: parse_date(&date)?,
        kind: kind.parse()?,
        amount: amount
            .parse()
            .with_context(|| format!("Invalid amount '{}' in transactions", amount))?,
        source: source.map(|s| s.parse()).transpose()?,
        category,
        note,
        remote_id,
    })
}

const SELECT_TX: &str =
    "SELECT id, date, kind, amount, source, category, note, remote_id FROM transactions";

fn query(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, |r| {
        Ok((
            r.get(0)?,
            r.get(1)?,
            r.get(2)?,
            r.get(3)?,
            r.get(4)?,
            r.get(5)?,
            r.get(6)?,
            r.get(7)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(to_transaction(row?)?);
    }
    Ok(out)
}

#[derive(Debug, Default, Clone)]
pub struct TxFilter {
    pub month: Option<String>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

/// Newest first.
pub fn load(conn: &Connection, filter: &TxFilter) -> Result<Vec<Transaction>> {
    let mut sql = format!("{} WHERE 1=1", SELECT_TX);
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(ref month) = filter.month {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.clone());
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().into());
    }
    if let Some(ref cat) = filter.category {
        sql.push_str(" AND category=?");
        params_vec.push(cat.to_ascii_lowercase());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }
    let args: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    query(conn, &sql, &args)
}

pub fn load_pending(conn: &Connection) -> Result<Vec<Transaction>> {
    query(conn, &format!("{} WHERE synced=0 ORDER BY id", SELECT_TX), &[])
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub note: String,
    pub synced: bool,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = TxFilter {
        month: optional_arg(sub, "month").map(parse_month).transpose()?,
        kind: optional_arg(sub, "type").map(str::parse::<TransactionKind>).transpose()?,
        category: optional_arg(sub, "category").map(str::to_string),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    Ok(load(conn, &filter)?
        .into_iter()
        .map(|t| TransactionRow {
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            category: t.category,
            amount: t.amount.to_string(),
            note: t.note.unwrap_or_default(),
            synced: t.remote_id.is_some(),
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.note.clone(),
                    if r.synced { "yes" } else { "pending" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Category", "Amount (MWK)", "Note", "Synced"],
                rows,
            )
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TransactionKind = required_arg(sub, "type")?.parse()?;
    let mut rows: Vec<Vec<String>> = built_in_categories(kind)
        .iter()
        .map(|c| vec![c.id.to_string(), c.name.to_string()])
        .collect();
    if kind == TransactionKind::Expense {
        for key in budget_keys(conn)? {
            if !rows.iter().any(|r| r[0] == key) {
                rows.push(vec![key, "(budget category)".to_string()]);
            }
        }
    }
    println!("{}", pretty_table(&["Id", "Name"], rows));
    Ok(())
}
