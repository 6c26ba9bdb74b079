// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ndalaflow::commands::onboard::{self, ONBOARDED_KEY, PROFILE_NAME_KEY, PROFILE_PHONE_KEY};
use ndalaflow::utils::get_setting;
use ndalaflow::{cli, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run_onboard(conn: &Connection, name: &str, phone: &str) {
    let matches = cli::build_cli().get_matches_from([
        "ndalaflow", "onboard", "--name", name, "--phone", phone,
    ]);
    if let Some(("onboard", m)) = matches.subcommand() {
        onboard::handle(conn, m).unwrap();
    } else {
        panic!("no onboard subcommand");
    }
}

#[test]
fn invalid_phone_stores_nothing() {
    let conn = setup();
    run_onboard(&conn, "Chisomo", "12345");
    run_onboard(&conn, "  ", "0881234567");
    assert_eq!(get_setting(&conn, PROFILE_NAME_KEY).unwrap(), None);
    assert_eq!(get_setting(&conn, ONBOARDED_KEY).unwrap(), None);
}

#[test]
fn local_number_is_stored_in_international_form() {
    let conn = setup();
    run_onboard(&conn, "Chisomo", "0881 234 567");
    assert_eq!(
        get_setting(&conn, PROFILE_NAME_KEY).unwrap().as_deref(),
        Some("Chisomo")
    );
    assert_eq!(
        get_setting(&conn, PROFILE_PHONE_KEY).unwrap().as_deref(),
        Some("+265881234567")
    );
    assert_eq!(get_setting(&conn, ONBOARDED_KEY).unwrap().as_deref(), Some("true"));
}
