// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, CategorySlice, ChartView, DailySpend, MonthFlow, MonthSummary};
use crate::commands::budgets::progress_bar;
use crate::commands::categories::load_categories;
use crate::commands::transactions::{load, TxFilter};
use crate::models::Transaction;
use crate::theme::Palette;
use crate::utils::{
    colored_cell, current_month, fmt_money, fmt_percent, maybe_print_json, month_back,
    optional_arg, parse_month, pretty_table, required_arg,
};
use anyhow::Result;
use comfy_table::Cell;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

const DEFAULT_BAR_MONTHS: usize = 5;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, palette: &Palette) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("view", sub)) => view(conn, sub, palette)?,
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

fn month_transactions(conn: &Connection, month: &str) -> Result<Vec<Transaction>> {
    load(
        conn,
        &TxFilter {
            month: Some(month.to_string()),
            ..TxFilter::default()
        },
    )
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_from(sub)?;
    let s: MonthSummary = analytics::summarize(&month, &month_transactions(conn, &month)?);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let mut table = pretty_table(
        &["Month", "Income", "Expenses", "Savings", "Savings rate"],
        Vec::new(),
    );
    let bar_width = s.savings_rate.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED);
    table.add_row(vec![
        Cell::new(&s.month),
        Cell::new(fmt_money(&s.income)),
        Cell::new(fmt_money(&s.expenses)),
        Cell::new(fmt_money(&s.savings)),
        colored_cell(
            format!("{} ({}%)", progress_bar(bar_width), s.savings_rate),
            analytics::savings_rate_color(s.savings_rate),
        ),
    ]);
    println!("{}", table);
    Ok(())
}

#[derive(Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
enum ViewData {
    Pie {
        month: String,
        slices: Vec<CategorySlice>,
    },
    Bar {
        months: Vec<MonthFlow>,
    },
    Trend {
        month: String,
        days: Vec<DailySpend>,
    },
}

fn view(conn: &Connection, sub: &clap::ArgMatches, palette: &Palette) -> Result<()> {
    let chart: ChartView = required_arg(sub, "view")?.parse()?;
    let month = month_from(sub)?;
    let data = match chart {
        ChartView::Pie => ViewData::Pie {
            slices: analytics::expense_breakdown(
                &month_transactions(conn, &month)?,
                &load_categories(conn, &month)?,
            ),
            month,
        },
        ChartView::Bar => {
            let n = sub
                .get_one::<usize>("months")
                .copied()
                .unwrap_or(DEFAULT_BAR_MONTHS)
                .max(1);
            let mut months = Vec::with_capacity(n);
            for back in (0..n).rev() {
                months.push(month_back(&month, back as u32)?);
            }
            let txs = load(conn, &TxFilter::default())?;
            ViewData::Bar {
                months: analytics::monthly_flows(&txs, &months),
            }
        }
        ChartView::Trend => ViewData::Trend {
            days: analytics::daily_spending(&month_transactions(conn, &month)?, &month),
            month,
        },
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    render(&data, palette);
    Ok(())
}

fn render(data: &ViewData, palette: &Palette) {
    match data {
        ViewData::Pie { month, slices } => {
            let mut table = pretty_table(&["Category", "Amount", "Share"], Vec::new());
            for s in slices {
                table.add_row(vec![
                    colored_cell(&s.name, &s.color),
                    Cell::new(fmt_money(&s.amount)),
                    Cell::new(fmt_percent(&s.share)),
                ]);
            }
            println!("Spending by category, {}", month);
            println!("{}", table);
        }
        ViewData::Bar { months } => {
            let mut table = pretty_table(&["Month", "Income", "Expenses"], Vec::new());
            for f in months {
                table.add_row(vec![
                    Cell::new(&f.month),
                    colored_cell(fmt_money(&f.income), palette.progress_safe),
                    colored_cell(fmt_money(&f.expenses), palette.progress_over),
                ]);
            }
            println!("{}", table);
        }
        ViewData::Trend { month, days } => {
            let rows = days
                .iter()
                .map(|d| vec![d.date.to_string(), fmt_money(&d.amount)])
                .collect();
            println!("Daily spending, {}", month);
            println!("{}", pretty_table(&["Day", "Spent"], rows));
        }
    }
}
