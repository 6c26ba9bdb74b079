// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::RemoteConfig;
use crate::remote::{FirestoreClient, RemoteError, Session};
use crate::sync::{self, SyncReport};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("push", _)) => {
            if let Some((client, session)) = connect(conn)? {
                print_report("Pushed", &sync::push_pending(conn, &client, &session)?);
            }
        }
        Some(("pull", _)) => {
            if let Some((client, session)) = connect(conn)? {
                print_report("Pulled", &sync::pull(conn, &client, &session)?);
            }
        }
        Some(("status", _)) => {
            let rows = sync::pending_counts(conn)?
                .into_iter()
                .map(|(table, n)| vec![table.to_string(), n.to_string()])
                .collect();
            println!("{}", pretty_table(&["Table", "Pending"], rows));
        }
        _ => {}
    }
    Ok(())
}

/// `None` (after logging why) when sync cannot run.
fn connect(conn: &Connection) -> Result<Option<(FirestoreClient, Session)>> {
    let Some(config) = RemoteConfig::load(conn)? else {
        warn!(error = %RemoteError::NotConfigured, "sync skipped");
        return Ok(None);
    };
    let Some(session) = sync::load_session(conn)? else {
        warn!(error = %RemoteError::NotSignedIn, "sync skipped");
        return Ok(None);
    };
    Ok(Some((FirestoreClient::new(config)?, session)))
}

fn print_report(what: &str, r: &SyncReport) {
    println!(
        "{}: {} created, {} updated, {} pulled, {} skipped, {} failed",
        what, r.created, r.updated, r.pulled, r.skipped, r.failed
    );
}
