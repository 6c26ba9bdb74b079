// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{self, BudgetTotals, CategoryUsage};
use crate::commands::categories::load_categories;
use crate::models::RecentSpend;
use crate::theme::Palette;
use crate::utils::{
    colored_cell, current_month, fmt_money, fmt_percent, maybe_print_json, optional_arg,
    parse_month, pretty_table, required_arg, slugify,
};
use anyhow::{anyhow, Result};
use comfy_table::Cell;
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, palette: &Palette) -> Result<()> {
    match m.subcommand() {
        Some(("status", sub)) => status(conn, sub, palette)?,
        Some(("show", sub)) => show(conn, sub, palette)?,
        _ => {}
    }
    Ok(())
}

fn month_from(sub: &clap::ArgMatches) -> Result<String> {
    match optional_arg(sub, "month") {
        Some(m) => parse_month(m),
        None => Ok(current_month()),
    }
}

#[derive(Serialize)]
struct StatusReport {
    month: String,
    totals: BudgetTotals,
    categories: Vec<CategoryUsage>,
}

fn status(conn: &Connection, sub: &clap::ArgMatches, palette: &Palette) -> Result<()> {
    let month = month_from(sub)?;
    let cats = load_categories(conn, &month)?;
    let report = StatusReport {
        totals: budget::totals(&cats),
        categories: cats.iter().map(budget::usage).collect(),
        month,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let mut table = pretty_table(
        &["Category", "Budget", "Spent", "Remaining", "Used", "Status"],
        Vec::new(),
    );
    for u in &report.categories {
        let used = match u.percentage {
            Some(p) => fmt_percent(&p),
            None => fmt_percent(&u.bar_percentage),
        };
        table.add_row(vec![
            Cell::new(&u.name),
            Cell::new(fmt_money(&u.budget)),
            Cell::new(fmt_money(&u.spent)),
            Cell::new(fmt_money(&u.remaining)),
            colored_cell(used, u.status.bar_color(palette)),
            colored_cell(u.status.as_str(), u.status.color()),
        ]);
    }
    println!("Budgets for {}", report.month);
    println!("{}", table);
    let t = &report.totals;
    println!(
        "Total budget {}  spent {}  remaining {}",
        fmt_money(&t.total_budget),
        fmt_money(&t.total_spent),
        fmt_money(&t.remaining)
    );
    Ok(())
}

#[derive(Serialize)]
struct CategoryDetail {
    month: String,
    usage: CategoryUsage,
    color: String,
    recent: Vec<RecentSpend>,
}

fn show(conn: &Connection, sub: &clap::ArgMatches, palette: &Palette) -> Result<()> {
    let month = month_from(sub)?;
    let key = slugify(required_arg(sub, "category")?);
    let cat = load_categories(conn, &month)?
        .into_iter()
        .find(|c| c.key == key)
        .ok_or_else(|| anyhow!("Budget category '{}' not found", key))?;
    let detail = CategoryDetail {
        usage: budget::usage(&cat),
        color: cat.color,
        recent: cat.recent,
        month,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &detail)? {
        return Ok(());
    }

    let u = &detail.usage;
    println!("{} ({})", u.name, detail.month);
    println!(
        "Spent {} of {}  ({} left)",
        fmt_money(&u.spent),
        fmt_money(&u.budget),
        fmt_money(&u.remaining)
    );
    let mut bar = pretty_table(&["Progress", "Status"], Vec::new());
    bar.add_row(vec![
        colored_cell(progress_bar(u.bar_percentage), u.status.bar_color(palette)),
        colored_cell(u.status.as_str(), u.status.color()),
    ]);
    println!("{}", bar);

    let rows = detail
        .recent
        .iter()
        .map(|r| vec![r.date.to_string(), r.description.clone(), fmt_money(&r.amount)])
        .collect();
    println!("{}", pretty_table(&["Date", "Description", "Amount"], rows));
    Ok(())
}

/// Twenty-cell text bar for a 0..=100 percentage.
pub fn progress_bar(percent: Decimal) -> String {
    let filled = (percent / Decimal::from(5))
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(20);
    format!(
        "{}{} {}",
        "#".repeat(filled),
        "-".repeat(20 - filled),
        fmt_percent(&percent)
    )
}
