// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ndalaflow::prefs::SettingsStore;
use ndalaflow::theme::{EnvAppearance, ThemeStore};
use ndalaflow::{cli, commands, db};

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for tables and JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let mut theme = ThemeStore::load(SettingsStore::new(&conn), &EnvAppearance);
    let palette = theme.palette().clone();

    match matches.subcommand() {
        Some(("init", sub)) => {
            if sub.get_flag("with_defaults") {
                let added = commands::categories::insert_defaults(&conn)?;
                println!("Added {} budget categories", added);
            }
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&conn, sub, &palette)?,
        Some(("goal", sub)) => commands::goals::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub, &palette)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&conn, sub, &palette)?,
        Some(("theme", sub)) => commands::theme::handle(sub, &mut theme)?,
        Some(("onboard", sub)) => commands::onboard::handle(&conn, sub)?,
        Some(("auth", sub)) => commands::auth::handle(&conn, sub)?,
        Some(("remote", sub)) => commands::remote::handle(&conn, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
