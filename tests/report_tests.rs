// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ndalaflow::analytics::{self, ChartView};
use ndalaflow::commands::{dashboard, reports};
use ndalaflow::models::{BudgetCategory, IncomeSource, Transaction, TransactionKind};
use ndalaflow::theme::{Palette, ThemeMode};
use ndalaflow::{cli, db};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

fn tx(id: i64, date: &str, kind: TransactionKind, amount: i64, category: &str) -> Transaction {
    Transaction {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        kind,
        amount: Decimal::new(amount, 0),
        source: match kind {
            TransactionKind::Income => category.parse::<IncomeSource>().ok(),
            TransactionKind::Expense => None,
        },
        category: category.into(),
        note: None,
        remote_id: None,
    }
}

fn sample() -> Vec<Transaction> {
    use TransactionKind::*;
    vec![
        tx(1, "2025-08-01", Income, 450000, "salary"),
        tx(2, "2025-08-15", Expense, 354500, "rent"),
        tx(3, "2025-09-01", Income, 450000, "salary"),
        tx(4, "2025-09-01", Expense, 15000, "market"),
        tx(5, "2025-09-01", Expense, 5000, "market"),
        tx(6, "2025-09-05", Expense, 75000, "school"),
        tx(7, "2025-09-12", Expense, 5000, "church"),
    ]
}

#[test]
fn month_summary_and_savings_rate() {
    let s = analytics::summarize("2025-09", &sample());
    assert_eq!(s.income, Decimal::new(450000, 0));
    assert_eq!(s.expenses, Decimal::new(100000, 0));
    assert_eq!(s.savings, Decimal::new(350000, 0));
    assert_eq!(s.savings_rate, Decimal::new(778, 1));

    let empty = analytics::summarize("2025-01", &sample());
    assert_eq!(empty.savings_rate, Decimal::ZERO);
}

#[test]
fn breakdown_uses_budget_names_and_shares() {
    let budgets = vec![BudgetCategory {
        id: 1,
        key: "church".into(),
        name: "Church".into(),
        color: "#8B5CF6".into(),
        monthly_budget: Decimal::new(10000, 0),
        spent: Decimal::ZERO,
        recent: Vec::new(),
    }];
    let september: Vec<Transaction> = sample()
        .into_iter()
        .filter(|t| t.date.format("%Y-%m").to_string() == "2025-09")
        .collect();
    let slices = analytics::expense_breakdown(&september, &budgets);
    let keys: Vec<&str> = slices.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(keys, vec!["school", "market", "church"]);
    assert_eq!(slices[0].name, "School Fees");
    assert_eq!(slices[0].share, Decimal::new(75, 0));
    assert_eq!(slices[1].amount, Decimal::new(20000, 0));
    assert_eq!(slices[2].name, "Church");
    assert_eq!(slices[2].color, "#8B5CF6");
    let total: Decimal = slices.iter().map(|s| s.share).sum();
    assert_eq!(total, Decimal::ONE_HUNDRED);
}

#[test]
fn monthly_flows_fill_quiet_months() {
    let months = vec!["2025-07".to_string(), "2025-08".into(), "2025-09".into()];
    let flows = analytics::monthly_flows(&sample(), &months);
    assert_eq!(flows.len(), 3);
    assert_eq!(flows[0].income, Decimal::ZERO);
    assert_eq!(flows[1].expenses, Decimal::new(354500, 0));
    assert_eq!(flows[2].income, Decimal::new(450000, 0));
}

#[test]
fn daily_spending_groups_by_day() {
    let days = analytics::daily_spending(&sample(), "2025-09");
    let amounts: Vec<(String, Decimal)> = days
        .iter()
        .map(|d| (d.date.to_string(), d.amount))
        .collect();
    assert_eq!(
        amounts,
        vec![
            ("2025-09-01".to_string(), Decimal::new(20000, 0)),
            ("2025-09-05".to_string(), Decimal::new(75000, 0)),
            ("2025-09-12".to_string(), Decimal::new(5000, 0)),
        ]
    );
}

#[test]
fn balance_is_all_time() {
    assert_eq!(dashboard::balance(&sample()), Decimal::new(445500, 0));
}

#[test]
fn chart_view_defaults_to_pie() {
    assert_eq!(ChartView::default(), ChartView::Pie);
    assert_eq!("Bar".parse::<ChartView>().unwrap(), ChartView::Bar);
}

#[test]
fn report_views_run_against_the_database() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    for t in sample() {
        conn.execute(
            "INSERT INTO transactions(date,kind,amount,category) VALUES (?1,?2,?3,?4)",
            params![t.date.to_string(), t.kind.as_str(), t.amount.to_string(), t.category],
        )
        .unwrap();
    }
    let palette = Palette::for_mode(ThemeMode::Dark);
    for view in ["pie", "bar", "trend"] {
        let matches = cli::build_cli().get_matches_from([
            "ndalaflow", "report", "view", "--view", view, "--month", "2025-09", "--months", "3",
        ]);
        if let Some(("report", m)) = matches.subcommand() {
            reports::handle(&conn, m, &palette).unwrap();
        } else {
            panic!("no report subcommand");
        }
    }
    let matches =
        cli::build_cli().get_matches_from(["ndalaflow", "report", "view", "--view", "donut"]);
    if let Some(("report", m)) = matches.subcommand() {
        assert!(reports::handle(&conn, m, &palette).is_err());
    }
}
