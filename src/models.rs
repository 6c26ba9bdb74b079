// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(anyhow!("Unknown transaction type '{}' (use income|expense)", other)),
        }
    }
}

/// Where income comes from. Ganyu is casual piece work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeSource {
    Salary,
    Business,
    Ganyu,
    Farming,
    Other,
}

impl IncomeSource {
    pub const ALL: [IncomeSource; 5] = [
        IncomeSource::Salary,
        IncomeSource::Business,
        IncomeSource::Ganyu,
        IncomeSource::Farming,
        IncomeSource::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeSource::Salary => "salary",
            IncomeSource::Business => "business",
            IncomeSource::Ganyu => "ganyu",
            IncomeSource::Farming => "farming",
            IncomeSource::Other => "other",
        }
    }
}

impl FromStr for IncomeSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        IncomeSource::ALL
            .into_iter()
            .find(|src| src.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown income source '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Decimal, // always positive, kind carries the sign
    pub source: Option<IncomeSource>,
    pub category: String,
    pub note: Option<String>,
    pub remote_id: Option<String>,
}

/// A transaction that passed validation but has no row yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub source: Option<IncomeSource>,
    pub category: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSpend {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: i64,
    /// Slug matched against `Transaction::category` for expenses.
    pub key: String,
    pub name: String,
    pub color: String,
    pub monthly_budget: Decimal,
    /// Derived from the transaction log for the month being viewed.
    pub spent: Decimal,
    pub recent: Vec<RecentSpend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub color: String,
    pub target: Decimal,
    pub saved: Decimal,
    pub deadline: NaiveDate,
    pub weekly_target: Decimal,
}
