// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::budgets::progress_bar;
use crate::goals::{self, GoalProgress};
use crate::models::Goal;
use crate::utils::{
    colored_cell, fmt_money, maybe_print_json, optional_arg, parse_date, parse_positive,
    pretty_table, required_arg, today,
};
use anyhow::{anyhow, Context, Result};
use comfy_table::Cell;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut all = load_goals(conn)?;
    let added = goals::add_goal(
        &mut all,
        required_arg(sub, "name")?,
        required_arg(sub, "amount")?,
        required_arg(sub, "deadline")?,
        today(),
    );
    if let Some(g) = added {
        insert_goal(conn, g, None)?;
        println!(
            "Added goal '{}': {} by {} ({} per week)",
            g.name,
            fmt_money(&g.target),
            g.deadline,
            fmt_money(&g.weekly_target)
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let day = today();
    let all = load_goals(conn)?;
    let progress: Vec<GoalProgress> = all.iter().map(|g| goals::progress(g, day)).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &progress)? {
        return Ok(());
    }

    let mut table = pretty_table(
        &["Goal", "Saved", "Target", "Progress", "Weeks left", "Per week"],
        Vec::new(),
    );
    for (g, p) in all.iter().zip(&progress) {
        let weeks = if p.completed {
            "done".to_string()
        } else if p.overdue {
            "overdue".to_string()
        } else {
            p.weeks_remaining.to_string()
        };
        table.add_row(vec![
            colored_cell(&g.name, &g.color),
            Cell::new(fmt_money(&p.saved)),
            Cell::new(fmt_money(&p.target)),
            colored_cell(
                progress_bar(p.bar_percentage),
                goals::progress_color(p.percentage),
            ),
            Cell::new(weeks),
            Cell::new(fmt_money(&p.weekly_target)),
        ]);
    }
    println!("{}", table);
    let t = goals::totals(&all);
    println!(
        "Saved {} of {} across all goals",
        fmt_money(&t.saved),
        fmt_money(&t.target)
    );
    Ok(())
}

fn find_goal(conn: &Connection, name: &str) -> Result<Goal> {
    load_goals(conn)?
        .into_iter()
        .find(|g| g.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| anyhow!("Goal '{}' not found", name.trim()))
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut goal = find_goal(conn, required_arg(sub, "name")?)?;
    let rename = optional_arg(sub, "rename");
    if let Some(new_name) = rename {
        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM goals WHERE lower(name)=lower(?1) AND id<>?2",
                params![new_name.trim(), goal.id],
                |r| r.get(0),
            )
            .optional()?;
        if taken.is_some() {
            debug!(name = new_name, "edit-goal ignored: name in use");
            return Ok(());
        }
    }
    let changed = goals::edit_goal(
        &mut goal,
        rename,
        optional_arg(sub, "amount"),
        optional_arg(sub, "deadline"),
        today(),
    );
    if !changed {
        debug!(goal = %goal.name, "edit-goal ignored: invalid field");
        return Ok(());
    }
    save_goal(conn, &goal)?;
    println!(
        "Updated '{}': {} by {} ({} per week)",
        goal.name,
        fmt_money(&goal.target),
        goal.deadline,
        fmt_money(&goal.weekly_target)
    );
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut goal = find_goal(conn, required_arg(sub, "name")?)?;
    let amount = parse_positive(required_arg(sub, "amount")?).unwrap_or(Decimal::ZERO);
    if !goals::contribute(&mut goal, amount) {
        debug!(goal = %goal.name, "contribution ignored: amount not positive");
        return Ok(());
    }
    save_goal(conn, &goal)?;
    let p = goals::progress(&goal, today());
    println!(
        "Saved {} toward '{}' ({} of {}){}",
        fmt_money(&amount),
        goal.name,
        fmt_money(&goal.saved),
        fmt_money(&goal.target),
        if p.completed { " - goal reached" } else { "" }
    );
    Ok(())
}

pub fn insert_goal(conn: &Connection, g: &Goal, remote_id: Option<&str>) -> Result<i64> {
    conn.execute(
        "INSERT INTO goals(name, category, color, target, saved, deadline, weekly_target, remote_id, synced)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            g.name,
            g.category,
            g.color,
            g.target.to_string(),
            g.saved.to_string(),
            g.deadline.to_string(),
            g.weekly_target.to_string(),
            remote_id,
            remote_id.is_some()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites a stored goal and queues it for the next push.
pub fn save_goal(conn: &Connection, g: &Goal) -> Result<()> {
    conn.execute(
        "UPDATE goals SET name=?1, category=?2, color=?3, target=?4, saved=?5, deadline=?6,
         weekly_target=?7, synced=0 WHERE id=?8",
        params![
            g.name,
            g.category,
            g.color,
            g.target.to_string(),
            g.saved.to_string(),
            g.deadline.to_string(),
            g.weekly_target.to_string(),
            g.id
        ],
    )?;
    Ok(())
}

fn dec(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in goals", what, s))
}

pub fn load_goals(conn: &Connection) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category, color, target, saved, deadline, weekly_target
         FROM goals ORDER BY deadline, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, category, color, target, saved, deadline, weekly) = row?;
        out.push(Goal {
            id,
            name,
            category,
            color,
            target: dec(&target, "target")?,
            saved: dec(&saved, "saved amount")?,
            deadline: parse_date(&deadline)?,
            weekly_target: dec(&weekly, "weekly target")?,
        });
    }
    Ok(out)
}
