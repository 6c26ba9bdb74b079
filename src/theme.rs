// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Light/dark mode selection and the palette every view renders with.
//!
//! The store is created once per session and handed to the views that need
//! colors; there is no process-wide instance.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, warn};

use crate::prefs::PreferenceStore;

pub const THEME_KEY: &str = "ndalaflow-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(anyhow!("Unknown theme '{}' (use light|dark)", other)),
        }
    }
}

/// Named colors as `#rrggbb` hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub primary: &'static str,
    pub card: &'static str,
    pub text: &'static str,
    pub secondary: &'static str,
    pub input_border: &'static str,
    pub progress_safe: &'static str,
    pub progress_warning: &'static str,
    pub progress_over: &'static str,
    pub nav_active: &'static str,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Palette {
        match mode {
            ThemeMode::Light => Palette {
                background: "#F5F5F5",
                foreground: "#000000",
                primary: "#1E88E5",
                card: "#FFFFFF",
                text: "#1A1A1A",
                secondary: "#F0FDF4",
                input_border: "#E5E5E5",
                progress_safe: "#00796B",
                progress_warning: "#FFC107",
                progress_over: "#DC2626",
                nav_active: "#00796B",
            },
            ThemeMode::Dark => Palette {
                background: "#121212",
                foreground: "#FFFFFF",
                primary: "#00796B",
                card: "#111111",
                text: "#FAFAFA",
                secondary: "#1A1A1A",
                input_border: "#2A2A2A",
                progress_safe: "#26A69A",
                progress_warning: "#FFCA28",
                progress_over: "#EF4444",
                nav_active: "#26A69A",
            },
        }
    }

    pub fn entries(&self) -> [(&'static str, &'static str); 11] {
        [
            ("background", self.background),
            ("foreground", self.foreground),
            ("primary", self.primary),
            ("card", self.card),
            ("text", self.text),
            ("secondary", self.secondary),
            ("input border", self.input_border),
            ("progress safe", self.progress_safe),
            ("progress warning", self.progress_warning),
            ("progress over", self.progress_over),
            ("nav active", self.nav_active),
        ]
    }
}

/// Parses `#rrggbb` (leading `#` optional).
pub fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.trim().trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}

/// The host's light/dark preference, if it exposes one.
pub trait AppearanceSource {
    fn color_scheme(&self) -> Option<ThemeMode>;
}

/// Reads `NDALAFLOW_APPEARANCE`, then the terminal's `COLORFGBG` hint.
pub struct EnvAppearance;

impl AppearanceSource for EnvAppearance {
    fn color_scheme(&self) -> Option<ThemeMode> {
        if let Ok(v) = std::env::var("NDALAFLOW_APPEARANCE") {
            if let Ok(mode) = v.parse() {
                return Some(mode);
            }
        }
        let fgbg = std::env::var("COLORFGBG").ok()?;
        scheme_from_colorfgbg(&fgbg)
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;x;bg`); bg 7 or 15 means a light terminal.
pub fn scheme_from_colorfgbg(v: &str) -> Option<ThemeMode> {
    let bg: u8 = v.rsplit(';').next()?.trim().parse().ok()?;
    Some(match bg {
        7 | 15 => ThemeMode::Light,
        _ => ThemeMode::Dark,
    })
}

type Subscriber = Box<dyn FnMut(ThemeMode, &Palette)>;

pub struct ThemeStore<S: PreferenceStore> {
    store: S,
    mode: ThemeMode,
    palette: Palette,
    subscribers: Vec<Subscriber>,
}

impl<S: PreferenceStore> ThemeStore<S> {
    /// Stored preference first, then the host appearance, then light.
    pub fn load(store: S, appearance: &dyn AppearanceSource) -> Self {
        let stored = match store.get(THEME_KEY) {
            Ok(Some(raw)) => match raw.parse::<ThemeMode>() {
                Ok(mode) => Some(mode),
                Err(_) => {
                    debug!(value = %raw, "ignoring unreadable theme preference");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "could not read theme preference");
                None
            }
        };
        let mode = stored
            .or_else(|| appearance.color_scheme())
            .unwrap_or(ThemeMode::Light);
        Self {
            store,
            mode,
            palette: Palette::for_mode(mode),
            subscribers: Vec::new(),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&mut self, f: impl FnMut(ThemeMode, &Palette) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    pub fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.toggled());
        self.mode
    }

    /// Setting the current mode again changes nothing and writes nothing.
    pub fn set(&mut self, mode: ThemeMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.palette = Palette::for_mode(mode);
        if let Err(err) = self.store.set(THEME_KEY, mode.as_str()) {
            warn!(error = %err, mode = %mode, "could not persist theme preference");
        }
        for notify in self.subscribers.iter_mut() {
            notify(self.mode, &self.palette);
        }
    }

    /// Host appearance changed while running; an unknown scheme is ignored.
    pub fn system_appearance_changed(&mut self, scheme: Option<ThemeMode>) {
        if let Some(mode) = scheme {
            self.set(mode);
        }
    }
}
