// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use ndalaflow::prefs::{self, PreferenceStore, SettingsStore};
use ndalaflow::theme::{
    scheme_from_colorfgbg, AppearanceSource, Palette, ThemeMode, ThemeStore, THEME_KEY,
};
use ndalaflow::db;
use ndalaflow::utils::get_setting;
use rusqlite::Connection;

#[derive(Default)]
struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    writes: RefCell<usize>,
}

impl MemoryStore {
    fn with(key: &str, value: &str) -> Self {
        let s = Self::default();
        s.values.borrow_mut().insert(key.into(), value.into());
        s
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        *self.writes.borrow_mut() += 1;
        self.values.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }
}

struct BrokenStore;

impl PreferenceStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("storage unavailable"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("storage unavailable"))
    }
}

struct Fixed(Option<ThemeMode>);

impl AppearanceSource for Fixed {
    fn color_scheme(&self) -> Option<ThemeMode> {
        self.0
    }
}

#[test]
fn toggle_twice_restores_mode() {
    let mut theme = ThemeStore::load(MemoryStore::default(), &Fixed(None));
    let start = theme.mode();
    theme.toggle();
    assert_ne!(theme.mode(), start);
    theme.toggle();
    assert_eq!(theme.mode(), start);
    assert_eq!(theme.palette(), &Palette::for_mode(start));
}

#[test]
fn stored_preference_beats_system() {
    let theme = ThemeStore::load(
        MemoryStore::with(THEME_KEY, "dark"),
        &Fixed(Some(ThemeMode::Light)),
    );
    assert_eq!(theme.mode(), ThemeMode::Dark);
    assert_eq!(theme.palette().primary, "#00796B");
}

#[test]
fn system_then_light_fallback() {
    let theme = ThemeStore::load(MemoryStore::default(), &Fixed(Some(ThemeMode::Dark)));
    assert_eq!(theme.mode(), ThemeMode::Dark);

    let theme = ThemeStore::load(MemoryStore::with(THEME_KEY, "sepia"), &Fixed(None));
    assert_eq!(theme.mode(), ThemeMode::Light);
    assert_eq!(theme.palette().background, "#F5F5F5");
    assert_eq!(*theme.store().writes.borrow(), 0);
}

#[test]
fn set_persists_and_notifies() {
    let seen: Rc<RefCell<Vec<(ThemeMode, &'static str)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let mut theme = ThemeStore::load(MemoryStore::default(), &Fixed(None));
    theme.subscribe(move |mode, palette| sink.borrow_mut().push((mode, palette.background)));

    theme.set(ThemeMode::Light);
    assert!(seen.borrow().is_empty());
    assert_eq!(*theme.store().writes.borrow(), 0);

    theme.set(ThemeMode::Dark);
    assert_eq!(*seen.borrow(), vec![(ThemeMode::Dark, "#121212")]);
    assert_eq!(
        theme.store().get(THEME_KEY).unwrap().as_deref(),
        Some("dark")
    );

    theme.system_appearance_changed(None);
    assert_eq!(theme.mode(), ThemeMode::Dark);
    theme.system_appearance_changed(Some(ThemeMode::Light));
    assert_eq!(theme.mode(), ThemeMode::Light);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn broken_storage_still_switches() {
    let mut theme = ThemeStore::load(BrokenStore, &Fixed(Some(ThemeMode::Dark)));
    assert_eq!(theme.mode(), ThemeMode::Dark);
    assert_eq!(theme.toggle(), ThemeMode::Light);
    assert!(!prefs::is_authenticated(&BrokenStore));
}

#[test]
fn settings_table_backs_the_theme() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    {
        let mut theme = ThemeStore::load(SettingsStore::new(&conn), &Fixed(None));
        theme.toggle();
    }
    assert_eq!(get_setting(&conn, THEME_KEY).unwrap().as_deref(), Some("dark"));
    let theme = ThemeStore::load(SettingsStore::new(&conn), &Fixed(Some(ThemeMode::Light)));
    assert_eq!(theme.mode(), ThemeMode::Dark);
}

#[test]
fn auth_flag_round_trip() {
    let store = MemoryStore::default();
    assert!(!prefs::is_authenticated(&store));
    prefs::set_authenticated(&store, true);
    assert!(prefs::is_authenticated(&store));
    assert_eq!(store.get(prefs::AUTH_KEY).unwrap().as_deref(), Some("true"));
}

#[test]
fn terminal_background_hint() {
    assert_eq!(scheme_from_colorfgbg("15;0"), Some(ThemeMode::Dark));
    assert_eq!(scheme_from_colorfgbg("0;15"), Some(ThemeMode::Light));
    assert_eq!(scheme_from_colorfgbg("garbage"), None);
}
