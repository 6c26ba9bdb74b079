// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::utils::{get_setting, set_setting};

pub const PROJECT_KEY: &str = "firebase_project";
pub const API_KEY_KEY: &str = "firebase_api_key";
pub const PROJECT_ENV: &str = "NDALAFLOW_FIREBASE_PROJECT";
pub const API_KEY_ENV: &str = "NDALAFLOW_FIREBASE_API_KEY";

/// Where the hosted database lives. Environment variables win over stored settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteConfig {
    pub project_id: String,
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl RemoteConfig {
    pub fn load(conn: &Connection) -> Result<Option<RemoteConfig>> {
        let project = env_or_setting(conn, PROJECT_ENV, PROJECT_KEY)?;
        let api_key = env_or_setting(conn, API_KEY_ENV, API_KEY_KEY)?;
        Ok(match (project, api_key) {
            (Some(project_id), Some(api_key)) => Some(RemoteConfig {
                project_id,
                api_key,
            }),
            _ => None,
        })
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        set_setting(conn, PROJECT_KEY, &self.project_id)?;
        set_setting(conn, API_KEY_KEY, &self.api_key)?;
        Ok(())
    }

    /// Key with all but the last four characters hidden.
    pub fn masked_key(&self) -> String {
        let n = self.api_key.chars().count();
        let tail: String = self.api_key.chars().skip(n.saturating_sub(4)).collect();
        format!("{}{}", "*".repeat(n.saturating_sub(4)), tail)
    }
}

fn env_or_setting(conn: &Connection, env: &str, key: &str) -> Result<Option<String>> {
    if let Ok(v) = std::env::var(env) {
        if !v.trim().is_empty() {
            return Ok(Some(v.trim().to_string()));
        }
    }
    Ok(get_setting(conn, key)?.filter(|v| !v.trim().is_empty()))
}
