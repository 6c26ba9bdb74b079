// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! On-device key-value preferences, backed by the `settings` table.

use anyhow::Result;
use rusqlite::Connection;
use tracing::warn;

use crate::utils::{get_setting, set_setting};

pub const AUTH_KEY: &str = "isAuthenticated";

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub struct SettingsStore<'c> {
    conn: &'c Connection,
}

impl<'c> SettingsStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceStore for SettingsStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        get_setting(self.conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        set_setting(self.conn, key, value)
    }
}

/// Stored as JSON `true`/`false`; anything unreadable counts as signed out.
pub fn is_authenticated(store: &dyn PreferenceStore) -> bool {
    match store.get(AUTH_KEY) {
        Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or(false),
        Ok(None) => false,
        Err(err) => {
            warn!(error = %err, "could not read auth flag");
            false
        }
    }
}

pub fn set_authenticated(store: &dyn PreferenceStore, value: bool) {
    if let Err(err) = store.set(AUTH_KEY, if value { "true" } else { "false" }) {
        warn!(error = %err, "could not save auth flag");
    }
}
