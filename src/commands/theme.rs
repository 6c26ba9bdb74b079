// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::prefs::PreferenceStore;
use crate::theme::{Palette, ThemeMode, ThemeStore};
use crate::utils::{colored_cell, maybe_print_json, pretty_table, required_arg};
use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;

pub fn handle<S: PreferenceStore>(m: &clap::ArgMatches, theme: &mut ThemeStore<S>) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(sub, theme)?,
        Some(("toggle", _)) => {
            let mode = theme.toggle();
            println!("Theme is now {}", mode);
        }
        Some(("set", sub)) => {
            let mode: ThemeMode = required_arg(sub, "mode")?.parse()?;
            theme.set(mode);
            println!("Theme is now {}", theme.mode());
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct ThemeView<'a> {
    mode: ThemeMode,
    palette: &'a Palette,
}

fn show<S: PreferenceStore>(sub: &clap::ArgMatches, theme: &ThemeStore<S>) -> Result<()> {
    let view = ThemeView {
        mode: theme.mode(),
        palette: theme.palette(),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }
    println!("Theme: {}", view.mode);
    let mut table = pretty_table(&["Role", "Color"], Vec::new());
    for (role, hex) in view.palette.entries() {
        table.add_row(vec![Cell::new(role), colored_cell(hex, hex)]);
    }
    println!("{}", table);
    Ok(())
}
