// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::RemoteConfig;
use crate::utils::{pretty_table, required_arg};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("configure", sub)) => {
            let config = RemoteConfig {
                project_id: required_arg(sub, "project")?.to_string(),
                api_key: required_arg(sub, "api_key")?.to_string(),
            };
            config.save(conn)?;
            println!("Cloud project set to {}", config.project_id);
        }
        Some(("show", _)) => match RemoteConfig::load(conn)? {
            Some(c) => println!(
                "{}",
                pretty_table(
                    &["Project", "API key"],
                    vec![vec![c.project_id.clone(), c.masked_key()]],
                )
            ),
            None => println!("Cloud sync is not configured"),
        },
        _ => {}
    }
    Ok(())
}
