// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ndalaflow::commands::doctor::find_issues;
use ndalaflow::db;
use rusqlite::Connection;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn clean_database_has_no_issues() {
    let conn = base_conn();
    assert!(find_issues(&conn).unwrap().is_empty());
}

#[test]
fn flags_zero_budgets_overdue_goals_and_unsynced_rows() {
    let conn = base_conn();
    conn.execute_batch(
        "INSERT INTO budget_categories(key,name,color,monthly_budget,synced) VALUES \
            ('church','Church','#8B5CF6','0',1), ('rent','Rent','#8B5CF6','150000',1); \
         INSERT INTO goals(name,category,color,target,saved,deadline,synced) VALUES \
            ('Roof','Home','#F59E0B','200000','50000','2020-01-01',1), \
            ('Bike','Transport','#10B981','90000','90000','2020-01-01',1); \
         INSERT INTO transactions(date,kind,amount,category) VALUES \
            ('2025-09-01','expense','5000','church');",
    )
    .unwrap();

    let issues = find_issues(&conn).unwrap();
    assert_eq!(
        issues,
        vec![
            vec!["zero_budget".to_string(), "church".to_string()],
            vec!["overdue_goal".to_string(), "Roof (due 2020-01-01)".to_string()],
            vec!["unsynced".to_string(), "1 transactions".to_string()],
        ]
    );
}
