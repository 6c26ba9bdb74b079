// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local-first reconciliation with the remote collaborator.
//!
//! Every write lands in SQLite with `synced = 0`. `push_pending` sends those
//! rows up (create, or update once a remote id is known) and marks them
//! synced; a failed row is logged and stays pending for the next push.
//! `pull` inserts remote documents whose ids are not known locally. A local
//! row with the same key wins over a remote one.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::commands::{categories, goals as goal_store, transactions};
use crate::models::{BudgetCategory, Goal, IncomeSource, NewTransaction, TransactionKind};
use crate::remote::{self, RemoteDocument, RemoteStore, Session};
use crate::utils::{delete_setting, get_setting, set_setting, slugify, today};

pub const SESSION_KEY: &str = "remote_session";

pub fn load_session(conn: &Connection) -> Result<Option<Session>> {
    match get_setting(conn, SESSION_KEY)? {
        Some(raw) => Ok(Some(
            serde_json::from_str(&raw).context("Stored remote session is unreadable")?,
        )),
        None => Ok(None),
    }
}

pub fn save_session(conn: &Connection, session: &Session) -> Result<()> {
    set_setting(conn, SESSION_KEY, &serde_json::to_string(session)?)
}

pub fn clear_session(conn: &Connection) -> Result<()> {
    delete_setting(conn, SESSION_KEY)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub pulled: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Rows still waiting for a push, per table.
pub fn pending_counts(conn: &Connection) -> Result<Vec<(&'static str, i64)>> {
    let mut out = Vec::new();
    for table in ["budget_categories", "goals", "transactions"] {
        let n: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE synced=0", table),
            [],
            |r| r.get(0),
        )?;
        out.push((table, n));
    }
    Ok(out)
}

fn money(d: Decimal) -> Value {
    d.to_f64().map(Value::from).unwrap_or(Value::Null)
}

fn json_decimal(v: Option<&Value>) -> Option<Decimal> {
    let v = v?;
    if let Some(i) = v.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(f) = v.as_f64() {
        return Decimal::try_from(f).ok().map(|d| d.round_dp(2));
    }
    v.as_str().and_then(|s| s.trim().parse::<Decimal>().ok())
}

fn json_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `date` if present, else the date part of `createdAt`.
fn json_date(fields: &Map<String, Value>) -> Option<NaiveDate> {
    if let Some(d) = json_str(fields, "date") {
        return NaiveDate::parse_from_str(d, "%Y-%m-%d").ok();
    }
    let ts = json_str(fields, "createdAt")?;
    chrono::DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.date_naive())
}

pub fn transaction_fields(tx: &NewTransaction) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("type".into(), json!(tx.kind.as_str()));
    m.insert("amount".into(), money(tx.amount));
    m.insert("source".into(), json!(tx.source.map(|s| s.as_str())));
    m.insert("category".into(), json!(tx.category));
    m.insert("note".into(), json!(tx.note));
    m.insert("date".into(), json!(tx.date.to_string()));
    m
}

pub fn transaction_from_fields(fields: &Map<String, Value>) -> Option<NewTransaction> {
    let kind: TransactionKind = json_str(fields, "type")?.parse().ok()?;
    let amount = json_decimal(fields.get("amount")).filter(|a| *a > Decimal::ZERO)?;
    let category = json_str(fields, "category")?.to_ascii_lowercase();
    let source = match kind {
        TransactionKind::Income => json_str(fields, "source")
            .unwrap_or(&category)
            .parse::<IncomeSource>()
            .ok(),
        TransactionKind::Expense => None,
    };
    Some(NewTransaction {
        date: json_date(fields).unwrap_or_else(today),
        kind,
        amount,
        source,
        note: json_str(fields, "note").map(str::to_string),
        category,
    })
}

pub fn category_fields(c: &BudgetCategory) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("category".into(), json!(c.key));
    m.insert("name".into(), json!(c.name));
    m.insert("color".into(), json!(c.color));
    m.insert("amount".into(), money(c.monthly_budget));
    m.insert("period".into(), json!("monthly"));
    m
}

pub fn category_from_fields(fields: &Map<String, Value>) -> Option<BudgetCategory> {
    let name = json_str(fields, "name").or_else(|| json_str(fields, "category"))?;
    let key = json_str(fields, "category")
        .map(slugify)
        .unwrap_or_else(|| slugify(name));
    if key.is_empty() {
        return None;
    }
    let monthly_budget = json_decimal(fields.get("amount")).filter(|a| *a > Decimal::ZERO)?;
    Some(BudgetCategory {
        id: 0,
        key,
        name: name.to_string(),
        color: json_str(fields, "color")
            .unwrap_or(crate::budget::DEFAULT_CATEGORY_COLOR)
            .to_string(),
        monthly_budget,
        spent: Decimal::ZERO,
        recent: Vec::new(),
    })
}

pub fn goal_fields(g: &Goal) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("name".into(), json!(g.name));
    m.insert("category".into(), json!(g.category));
    m.insert("color".into(), json!(g.color));
    m.insert("target".into(), money(g.target));
    m.insert("saved".into(), money(g.saved));
    m.insert("deadline".into(), json!(g.deadline.to_string()));
    m.insert("weeklyTarget".into(), money(g.weekly_target));
    m
}

pub fn goal_from_fields(fields: &Map<String, Value>) -> Option<Goal> {
    let name = json_str(fields, "name")?;
    let target = json_decimal(fields.get("target")).filter(|t| *t > Decimal::ZERO)?;
    let deadline = NaiveDate::parse_from_str(json_str(fields, "deadline")?, "%Y-%m-%d").ok()?;
    let saved = json_decimal(fields.get("saved"))
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    Some(Goal {
        id: 0,
        name: name.to_string(),
        category: json_str(fields, "category")
            .unwrap_or(crate::goals::DEFAULT_GOAL_CATEGORY)
            .to_string(),
        color: json_str(fields, "color")
            .unwrap_or(crate::goals::DEFAULT_GOAL_COLOR)
            .to_string(),
        target,
        saved,
        deadline,
        weekly_target: json_decimal(fields.get("weeklyTarget")).unwrap_or(Decimal::ZERO),
    })
}

struct Pending {
    table: &'static str,
    collection: &'static str,
    row_id: i64,
    remote_id: Option<String>,
    fields: Map<String, Value>,
}

fn collect_pending(conn: &Connection) -> Result<Vec<Pending>> {
    let mut out = Vec::new();

    let ids = pending_ids(conn, "budget_categories")?;
    if !ids.is_empty() {
        for c in categories::load_categories(conn, &crate::utils::current_month())? {
            if let Some((_, rid)) = ids.iter().find(|(id, _)| *id == c.id) {
                out.push(Pending {
                    table: "budget_categories",
                    collection: remote::BUDGETS,
                    row_id: c.id,
                    remote_id: rid.clone(),
                    fields: category_fields(&c),
                });
            }
        }
    }

    let ids = pending_ids(conn, "goals")?;
    if !ids.is_empty() {
        for g in goal_store::load_goals(conn)? {
            if let Some((_, rid)) = ids.iter().find(|(id, _)| *id == g.id) {
                out.push(Pending {
                    table: "goals",
                    collection: remote::GOALS,
                    row_id: g.id,
                    remote_id: rid.clone(),
                    fields: goal_fields(&g),
                });
            }
        }
    }

    for tx in transactions::load_pending(conn)? {
        out.push(Pending {
            table: "transactions",
            collection: remote::TRANSACTIONS,
            row_id: tx.id,
            remote_id: tx.remote_id.clone(),
            fields: transaction_fields(&NewTransaction {
                date: tx.date,
                kind: tx.kind,
                amount: tx.amount,
                source: tx.source,
                category: tx.category.clone(),
                note: tx.note.clone(),
            }),
        });
    }
    Ok(out)
}

fn pending_ids(conn: &Connection, table: &str) -> Result<Vec<(i64, Option<String>)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, remote_id FROM {} WHERE synced=0 ORDER BY id",
        table
    ))?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, Option<String>>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn push_pending(
    conn: &Connection,
    remote: &dyn RemoteStore,
    session: &Session,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();
    for p in collect_pending(conn)? {
        let outcome = match p.remote_id {
            Some(ref rid) => remote
                .update(session, p.collection, rid, p.fields)
                .map(|_| (rid.clone(), false)),
            None => remote
                .create(session, p.collection, p.fields)
                .map(|rid| (rid, true)),
        };
        match outcome {
            Ok((rid, created)) => {
                conn.execute(
                    &format!("UPDATE {} SET remote_id=?1, synced=1 WHERE id=?2", p.table),
                    params![rid, p.row_id],
                )?;
                if created {
                    report.created += 1;
                } else {
                    report.updated += 1;
                }
            }
            Err(err) => {
                warn!(table = p.table, row = p.row_id, error = %err, "push failed; row stays pending");
                report.failed += 1;
            }
        }
    }
    info!(?report, "push finished");
    Ok(report)
}

fn known_remote_ids(conn: &Connection, table: &str) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT remote_id FROM {} WHERE remote_id IS NOT NULL",
        table
    ))?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = HashSet::new();
    for row in rows {
        out.insert(row?);
    }
    Ok(out)
}

fn fetch(
    remote: &dyn RemoteStore,
    session: &Session,
    collection: &str,
    report: &mut SyncReport,
) -> Option<Vec<RemoteDocument>> {
    match remote.list(session, collection) {
        Ok(docs) => Some(docs),
        Err(err) => {
            warn!(collection, error = %err, "pull failed");
            report.failed += 1;
            None
        }
    }
}

pub fn pull(conn: &Connection, remote: &dyn RemoteStore, session: &Session) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    if let Some(docs) = fetch(remote, session, remote::BUDGETS, &mut report) {
        let known = known_remote_ids(conn, "budget_categories")?;
        let local_keys: HashSet<String> = categories::load_categories(conn, &crate::utils::current_month())?
            .into_iter()
            .map(|c| c.key)
            .collect();
        for doc in docs.iter().filter(|d| !known.contains(&d.id)) {
            match category_from_fields(&doc.fields) {
                Some(c) if !local_keys.contains(&c.key) => {
                    categories::insert_category(conn, &c, Some(&doc.id))?;
                    report.pulled += 1;
                }
                Some(c) => {
                    debug!(key = %c.key, "remote category shadowed by local one");
                    report.skipped += 1;
                }
                None => {
                    debug!(id = %doc.id, "remote budget document unreadable");
                    report.skipped += 1;
                }
            }
        }
    }

    if let Some(docs) = fetch(remote, session, remote::GOALS, &mut report) {
        let known = known_remote_ids(conn, "goals")?;
        let local_names: HashSet<String> = goal_store::load_goals(conn)?
            .into_iter()
            .map(|g| g.name.to_lowercase())
            .collect();
        for doc in docs.iter().filter(|d| !known.contains(&d.id)) {
            match goal_from_fields(&doc.fields) {
                Some(g) if !local_names.contains(&g.name.to_lowercase()) => {
                    goal_store::insert_goal(conn, &g, Some(&doc.id))?;
                    report.pulled += 1;
                }
                _ => {
                    debug!(id = %doc.id, "remote goal skipped");
                    report.skipped += 1;
                }
            }
        }
    }

    if let Some(docs) = fetch(remote, session, remote::TRANSACTIONS, &mut report) {
        let known = known_remote_ids(conn, "transactions")?;
        for doc in docs.iter().filter(|d| !known.contains(&d.id)) {
            match transaction_from_fields(&doc.fields) {
                Some(tx) => {
                    transactions::insert(conn, &tx, Some(&doc.id))?;
                    report.pulled += 1;
                }
                None => {
                    debug!(id = %doc.id, "remote transaction unreadable");
                    report.skipped += 1;
                }
            }
        }
    }

    if let Some(docs) = fetch(remote, session, remote::TIPS, &mut report) {
        let tips: Vec<(String, String, String)> = docs
            .iter()
            .filter_map(|d| {
                let en = json_str(&d.fields, "en")?;
                let ch = json_str(&d.fields, "ch").unwrap_or("");
                Some((d.id.clone(), en.to_string(), ch.to_string()))
            })
            .collect();
        if !tips.is_empty() {
            let tx = conn.unchecked_transaction()?;
            tx.execute("DELETE FROM tips", [])?;
            for (rid, en, ch) in &tips {
                tx.execute(
                    "INSERT INTO tips(en, ch, remote_id) VALUES (?1, ?2, ?3)",
                    params![en, ch, rid],
                )?;
            }
            tx.commit()?;
            report.pulled += tips.len();
        }
    }

    info!(?report, "pull finished");
    Ok(report)
}
