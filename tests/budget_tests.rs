// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ndalaflow::budget::{self, BudgetStatus};
use ndalaflow::commands::categories::{self, load_categories};
use ndalaflow::models::BudgetCategory;
use ndalaflow::{cli, db};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn cat(key: &str, budget: i64, spent: i64) -> BudgetCategory {
    BudgetCategory {
        id: 0,
        key: key.into(),
        name: key.into(),
        color: "#EF4444".into(),
        monthly_budget: Decimal::new(budget, 0),
        spent: Decimal::new(spent, 0),
        recent: Vec::new(),
    }
}

fn run_category(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["ndalaflow", "category"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("category", m)) => categories::handle(conn, m),
        _ => panic!("no category subcommand"),
    }
}

#[test]
fn totals_and_negative_remaining() {
    let cats = vec![cat("market", 80000, 68000), cat("transport", 20000, 25000)];
    let t = budget::totals(&cats);
    assert_eq!(t.total_budget, Decimal::new(100000, 0));
    assert_eq!(t.total_spent, Decimal::new(93000, 0));
    assert_eq!(t.remaining, Decimal::new(7000, 0));

    let over = budget::totals(&[cat("rent", 100, 150)]);
    assert_eq!(over.remaining, Decimal::new(-50, 0));
    assert_eq!(
        over.total_budget - over.total_spent,
        over.remaining
    );
}

#[test]
fn market_at_85_percent_is_warning() {
    let u = budget::usage(&cat("market", 80000, 68000));
    assert_eq!(u.percentage, Some(Decimal::new(85, 0)));
    assert_eq!(u.status, BudgetStatus::Warning);
    assert_eq!(u.remaining, Decimal::new(12000, 0));
}

#[test]
fn over_budget_bar_is_clamped() {
    let u = budget::usage(&cat("transport", 20000, 25000));
    assert_eq!(u.status, BudgetStatus::Over);
    assert_eq!(u.percentage, Some(Decimal::new(125, 0)));
    assert_eq!(u.bar_percentage, Decimal::ONE_HUNDRED);
}

#[test]
fn alerts_skip_safe_categories() {
    let cats = vec![
        cat("market", 80000, 68000),
        cat("food", 30000, 1000),
        cat("transport", 20000, 25000),
    ];
    let keys: Vec<String> = budget::alerts(&cats).into_iter().map(|u| u.key).collect();
    assert_eq!(keys, vec!["transport", "market"]);
}

#[test]
fn add_category_rejects_bad_input() {
    let mut cats = vec![cat("market", 80000, 0)];
    assert!(budget::add_category(&mut cats, "", "1000", None).is_none());
    assert!(budget::add_category(&mut cats, "Church", "", None).is_none());
    assert!(budget::add_category(&mut cats, "Church", "abc", None).is_none());
    assert!(budget::add_category(&mut cats, "Church", "0", None).is_none());
    assert!(budget::add_category(&mut cats, "Market", "5000", None).is_none());
    assert_eq!(cats.len(), 1);

    let added = budget::add_category(&mut cats, "Church Offering", "10000", None).unwrap();
    assert_eq!(added.key, "church-offering");
    assert_eq!(added.color, budget::DEFAULT_CATEGORY_COLOR);
    assert_eq!(added.spent, Decimal::ZERO);
    assert_eq!(cats.len(), 2);
}

#[test]
fn spent_comes_from_the_months_expenses() {
    let conn = setup();
    conn.execute(
        "INSERT INTO budget_categories(key,name,color,monthly_budget) VALUES ('market','Market & Groceries','#EF4444','80000')",
        [],
    )
    .unwrap();
    let rows = [
        ("2025-08-31", "expense", "9000", "market"),
        ("2025-09-01", "income", "450000", "salary"),
        ("2025-09-02", "expense", "15000", "market"),
        ("2025-09-03", "expense", "8000", "market"),
        ("2025-09-04", "expense", "12000", "transport"),
        ("2025-09-05", "expense", "5000", "market"),
        ("2025-09-06", "expense", "10000", "market"),
        ("2025-09-07", "expense", "20000", "market"),
        ("2025-09-08", "expense", "10000", "market"),
    ];
    for (date, kind, amount, category) in rows {
        conn.execute(
            "INSERT INTO transactions(date,kind,amount,category) VALUES (?1,?2,?3,?4)",
            params![date, kind, amount, category],
        )
        .unwrap();
    }

    let cats = load_categories(&conn, "2025-09").unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].spent, Decimal::new(68000, 0));
    assert_eq!(cats[0].recent.len(), 5);
    assert_eq!(cats[0].recent[0].date.to_string(), "2025-09-08");
    assert_eq!(cats[0].recent[0].description, "Market & Groceries");
    assert_eq!(
        budget::budget_status(cats[0].spent, cats[0].monthly_budget),
        BudgetStatus::Warning
    );

    let august = load_categories(&conn, "2025-08").unwrap();
    assert_eq!(august[0].spent, Decimal::new(9000, 0));
}

#[test]
fn category_cli_add_and_set() {
    let conn = setup();
    run_category(&conn, &["add", "--name", "Church", "--amount", "10000"]).unwrap();
    run_category(&conn, &["add", "--name", "church", "--amount", "99"]).unwrap();
    run_category(&conn, &["add", "--name", "Savings", "--amount", "lots"]).unwrap();
    let cats = load_categories(&conn, "2025-09").unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].monthly_budget, Decimal::new(10000, 0));

    run_category(&conn, &["set", "--category", "Church", "--amount", "12500"]).unwrap();
    let cats = load_categories(&conn, "2025-09").unwrap();
    assert_eq!(cats[0].monthly_budget, Decimal::new(12500, 0));

    assert!(run_category(&conn, &["set", "--category", "nothing", "--amount", "5"]).is_err());
}

#[test]
fn defaults_are_seeded_once() {
    let conn = setup();
    assert_eq!(categories::insert_defaults(&conn).unwrap(), 6);
    assert_eq!(categories::insert_defaults(&conn).unwrap(), 0);
    let keys = categories::budget_keys(&conn).unwrap();
    assert!(keys.contains(&"market".to_string()));
    assert!(keys.contains(&"rent".to_string()));
}
