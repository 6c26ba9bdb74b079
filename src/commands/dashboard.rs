// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, MonthSummary};
use crate::budget::{self, CategoryUsage};
use crate::commands::categories::load_categories;
use crate::commands::onboard::PROFILE_NAME_KEY;
use crate::commands::transactions::{load, TxFilter};
use crate::models::{Transaction, TransactionKind};
use crate::theme::Palette;
use crate::utils::{
    colored_cell, current_month, fmt_money, fmt_percent, get_setting, maybe_print_json,
    pretty_table, today,
};
use anyhow::Result;
use chrono::{Datelike, Local, Timelike};
use comfy_table::Cell;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

const RECENT_COUNT: usize = 5;
pub const HIDDEN_AMOUNT: &str = "MWK ••••••";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    pub en: String,
    pub ch: String,
}

const BUILT_IN_TIPS: [(&str, &str); 5] = [
    (
        "Save at least 20% of your income for emergencies",
        "Sungani 20% ya ndalama zanu za tsiku ndi tsiku",
    ),
    (
        "Write down every kwacha you spend this week",
        "Lembani kwacha iliyonse yomwe mwagwiritsa ntchito sabata ino",
    ),
    (
        "Buy in bulk at the market to save money",
        "Gulani zambiri pamodzi ku msika kuti musunge ndalama",
    ),
    (
        "Pay school fees early to avoid extra charges",
        "Lipirani fizi ya sukulu msanga kuti mupewe zolipira zina",
    ),
    (
        "Set a goal before you start saving",
        "Khazikitsani cholinga musanayambe kusunga",
    ),
];

pub fn built_in_tips() -> Vec<Tip> {
    BUILT_IN_TIPS
        .iter()
        .map(|(en, ch)| Tip {
            en: en.to_string(),
            ch: ch.to_string(),
        })
        .collect()
}

/// Tips pulled from the cloud replace the built-in list once there are any.
pub fn load_tips(conn: &Connection) -> Result<Vec<Tip>> {
    let mut stmt = conn.prepare("SELECT en, ch FROM tips ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Tip {
            en: r.get(0)?,
            ch: r.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    if out.is_empty() {
        return Ok(built_in_tips());
    }
    Ok(out)
}

/// Rotates through `tips` once per day.
pub fn tip_of_the_day(tips: &[Tip], day: chrono::NaiveDate) -> Option<&Tip> {
    if tips.is_empty() {
        return None;
    }
    let idx = day.num_days_from_ce().rem_euclid(tips.len() as i32) as usize;
    tips.get(idx)
}

/// All-time income minus all-time expenses.
pub fn balance(txs: &[Transaction]) -> Decimal {
    analytics::total(txs, TransactionKind::Income)
        - analytics::total(txs, TransactionKind::Expense)
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    }
}

#[derive(Serialize)]
struct RecentLine {
    date: String,
    kind: TransactionKind,
    category: String,
    description: String,
    amount: String,
}

#[derive(Serialize)]
struct Dashboard {
    name: Option<String>,
    balance: String,
    month: MonthSummary,
    recent: Vec<RecentLine>,
    alerts: Vec<CategoryUsage>,
    tip: Option<Tip>,
}

fn masked(d: &Decimal, hide: bool) -> String {
    if hide {
        HIDDEN_AMOUNT.to_string()
    } else {
        fmt_money(d)
    }
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches, palette: &Palette) -> Result<()> {
    let hide = sub.get_flag("hide_balance");
    let month = current_month();
    let all = load(conn, &TxFilter::default())?;
    let tips = load_tips(conn)?;
    let view = Dashboard {
        name: get_setting(conn, PROFILE_NAME_KEY)?,
        balance: masked(&balance(&all), hide),
        month: analytics::summarize(&month, &all),
        recent: all
            .iter()
            .take(RECENT_COUNT)
            .map(|t| RecentLine {
                date: t.date.to_string(),
                kind: t.kind,
                category: t.category.clone(),
                description: t.note.clone().unwrap_or_else(|| t.category.clone()),
                amount: masked(&t.amount, hide),
            })
            .collect(),
        alerts: budget::alerts(&load_categories(conn, &month)?),
        tip: tip_of_the_day(&tips, today()).cloned(),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }

    let hello = greeting(Local::now().hour());
    match view.name {
        Some(ref n) => println!("{}, {}", hello, n),
        None => println!("{}", hello),
    }
    let mut head = pretty_table(
        &["Current balance", "Income this month", "Expenses this month"],
        Vec::new(),
    );
    head.add_row(vec![
        colored_cell(&view.balance, palette.primary),
        colored_cell(masked(&view.month.income, hide), palette.progress_safe),
        colored_cell(masked(&view.month.expenses, hide), palette.progress_over),
    ]);
    println!("{}", head);

    let rows = view
        .recent
        .iter()
        .map(|r| {
            vec![
                r.date.clone(),
                r.kind.to_string(),
                r.description.clone(),
                r.amount.clone(),
            ]
        })
        .collect();
    println!("Recent transactions");
    println!("{}", pretty_table(&["Date", "Type", "Description", "Amount"], rows));

    if !view.alerts.is_empty() {
        let mut alerts = pretty_table(&["Budget alert", "Spent", "Limit", "Used"], Vec::new());
        for a in &view.alerts {
            alerts.add_row(vec![
                Cell::new(&a.name),
                Cell::new(masked(&a.spent, hide)),
                Cell::new(masked(&a.budget, hide)),
                colored_cell(fmt_percent(&a.bar_percentage), a.status.color()),
            ]);
        }
        println!("{}", alerts);
    }

    if let Some(tip) = &view.tip {
        println!("Financial tip: {}", tip.en);
        println!("               {}", tip.ch);
    }
    Ok(())
}
