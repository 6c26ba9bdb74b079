// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod budget;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod entry;
pub mod goals;
pub mod models;
pub mod prefs;
pub mod remote;
pub mod sync;
pub mod theme;
pub mod utils;
