// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::RemoteConfig;
use crate::prefs::{is_authenticated, set_authenticated, SettingsStore};
use crate::remote::{FirestoreClient, RemoteError, RemoteStore};
use crate::sync::{clear_session, load_session, save_session};
use crate::utils::required_arg;
use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let email = required_arg(sub, "email")?;
            let password = required_arg(sub, "password")?;
            let Some(config) = RemoteConfig::load(conn)? else {
                warn!(error = %RemoteError::NotConfigured, "sign-in skipped");
                return Ok(());
            };
            let client = FirestoreClient::new(config)?;
            if login_with(conn, &client, email, password)? {
                println!("Signed in as {}", email);
            }
        }
        Some(("logout", _)) => {
            logout(conn)?;
            println!("Signed out");
        }
        Some(("status", _)) => {
            let store = SettingsStore::new(conn);
            match load_session(conn)? {
                Some(s) if is_authenticated(&store) => {
                    println!("Signed in as {} (user {})", s.email, s.user_id)
                }
                _ => println!("Not signed in"),
            }
        }
        _ => {}
    }
    Ok(())
}

/// Signs in and records the session. A rejected sign-in is logged and
/// leaves the stored state as it was.
pub fn login_with(
    conn: &Connection,
    remote: &dyn RemoteStore,
    email: &str,
    password: &str,
) -> Result<bool> {
    match remote.sign_in(email, password) {
        Ok(session) => {
            save_session(conn, &session)?;
            set_authenticated(&SettingsStore::new(conn), true);
            info!(user = %session.user_id, "signed in");
            Ok(true)
        }
        Err(err) => {
            warn!(error = %err, email, "sign-in failed");
            Ok(false)
        }
    }
}

pub fn logout(conn: &Connection) -> Result<()> {
    clear_session(conn)?;
    set_authenticated(&SettingsStore::new(conn), false);
    Ok(())
}
