// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDate};
use ndalaflow::commands::goals::{self as goal_cmd, load_goals};
use ndalaflow::goals;
use ndalaflow::models::Goal;
use ndalaflow::utils::today;
use ndalaflow::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn goal(name: &str, target: i64, saved: i64, deadline: NaiveDate) -> Goal {
    Goal {
        id: 1,
        name: name.into(),
        category: "Education".into(),
        color: "#3B82F6".into(),
        target: Decimal::new(target, 0),
        saved: Decimal::new(saved, 0),
        deadline,
        weekly_target: Decimal::ZERO,
    }
}

fn run_goal(conn: &Connection, args: &[&str]) {
    let mut argv = vec!["ndalaflow", "goal"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("goal", m)) = matches.subcommand() {
        goal_cmd::handle(conn, m).unwrap();
    } else {
        panic!("no goal subcommand");
    }
}

#[test]
fn ten_days_is_two_weeks() {
    let today = day(2025, 9, 1);
    assert_eq!(goals::weeks_remaining(today + Duration::days(10), today), 2);
}

#[test]
fn overshooting_target_is_completed() {
    let g = goal("School fees", 300000, 320000, day(2025, 12, 1));
    let p = goals::progress(&g, day(2025, 9, 1));
    assert_eq!(p.percentage.round_dp(1), Decimal::new(1067, 1));
    assert_eq!(p.bar_percentage, Decimal::ONE_HUNDRED);
    assert!(p.completed);
    assert!(!p.overdue);
}

#[test]
fn past_deadline_unfinished_is_overdue() {
    let g = goal("Bicycle", 90000, 30000, day(2025, 8, 1));
    let p = goals::progress(&g, day(2025, 9, 1));
    assert_eq!(p.weeks_remaining, 0);
    assert!(p.overdue);
    assert_eq!(goals::progress_color(p.percentage), "#EF4444");
}

#[test]
fn add_goal_rejects_bad_input() {
    let today = day(2025, 9, 1);
    let mut list = vec![goal("Emergency fund", 200000, 0, day(2026, 1, 1))];
    assert!(goals::add_goal(&mut list, "", "1000", "2025-12-01", today).is_none());
    assert!(goals::add_goal(&mut list, "Radio", "", "2025-12-01", today).is_none());
    assert!(goals::add_goal(&mut list, "Radio", "ten", "2025-12-01", today).is_none());
    assert!(goals::add_goal(&mut list, "Radio", "1000", "soon", today).is_none());
    assert!(goals::add_goal(&mut list, "emergency FUND", "1000", "2025-12-01", today).is_none());
    assert_eq!(list.len(), 1);

    let g = goals::add_goal(&mut list, "Radio", "40000", "2025-09-29", today).unwrap();
    assert_eq!(g.saved, Decimal::ZERO);
    assert_eq!(g.weekly_target, Decimal::new(10000, 0));
    assert_eq!(g.category, goals::DEFAULT_GOAL_CATEGORY);
    assert_eq!(list.len(), 2);
}

#[test]
fn edit_recomputes_weekly_target() {
    let today = day(2025, 9, 1);
    let mut g = goal("Radio", 40000, 0, day(2025, 9, 29));
    assert!(goals::edit_goal(&mut g, None, Some("80000"), None, today));
    assert_eq!(g.weekly_target, Decimal::new(20000, 0));
    assert!(!goals::edit_goal(&mut g, Some("  "), None, None, today));
    assert!(!goals::edit_goal(&mut g, None, Some("-5"), None, today));
    assert_eq!(g.target, Decimal::new(80000, 0));
}

#[test]
fn totals_across_goals() {
    let d = day(2026, 1, 1);
    let t = goals::totals(&[goal("a", 100000, 25000, d), goal("b", 100000, 75000, d)]);
    assert_eq!(t.saved, Decimal::new(100000, 0));
    assert_eq!(t.target, Decimal::new(200000, 0));
    assert_eq!(t.bar_percentage, Decimal::new(50, 0));
}

#[test]
fn goal_cli_add_contribute_edit() {
    let conn = setup();
    let deadline = (today() + Duration::days(70)).to_string();
    run_goal(&conn, &["add", "--name", "School fees", "--amount", "300000", "--deadline", &deadline]);
    run_goal(&conn, &["add", "--name", "school fees", "--amount", "5", "--deadline", &deadline]);
    let list = load_goals(&conn).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].weekly_target, Decimal::new(30000, 0));

    run_goal(&conn, &["contribute", "--name", "School Fees", "--amount", "45000"]);
    run_goal(&conn, &["contribute", "--name", "School Fees", "--amount", "0"]);
    let list = load_goals(&conn).unwrap();
    assert_eq!(list[0].saved, Decimal::new(45000, 0));

    run_goal(&conn, &["edit", "--name", "School Fees", "--rename", "Fees 2026"]);
    let list = load_goals(&conn).unwrap();
    assert_eq!(list[0].name, "Fees 2026");
    assert_eq!(list[0].saved, Decimal::new(45000, 0));
}
