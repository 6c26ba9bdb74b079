// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{required_arg, set_setting};
use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

pub const PROFILE_NAME_KEY: &str = "profile_name";
pub const PROFILE_PHONE_KEY: &str = "profile_phone";
pub const ONBOARDED_KEY: &str = "onboarded";

const COUNTRY_CODE: &str = "+265";
const SUBSCRIBER_DIGITS: usize = 9;

/// Malawian mobile number in `+265XXXXXXXXX` form. Accepts the local
/// `0XXXXXXXXX` form; spaces and dashes are ignored.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let subscriber = compact
        .strip_prefix(COUNTRY_CODE)
        .or_else(|| compact.strip_prefix('0'))?;
    if subscriber.len() != SUBSCRIBER_DIGITS || !subscriber.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}{}", COUNTRY_CODE, subscriber))
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required_arg(sub, "name")?;
    if name.is_empty() {
        debug!("onboarding ignored: empty name");
        return Ok(());
    }
    let raw_phone = required_arg(sub, "phone")?;
    let Some(phone) = normalize_phone(raw_phone) else {
        debug!(phone = raw_phone, "onboarding ignored: not a Malawian mobile number");
        return Ok(());
    };
    set_setting(conn, PROFILE_NAME_KEY, name)?;
    set_setting(conn, PROFILE_PHONE_KEY, &phone)?;
    set_setting(conn, ONBOARDED_KEY, "true")?;
    println!("Welcome, {} ({})", name, phone);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_forms() {
        assert_eq!(normalize_phone("0881 234 567").as_deref(), Some("+265881234567"));
        assert_eq!(normalize_phone("+265-991-234-567").as_deref(), Some("+265991234567"));
        assert_eq!(normalize_phone("088123456"), None);
        assert_eq!(normalize_phone("+26588123456a"), None);
        assert_eq!(normalize_phone("881234567"), None);
    }
}
