// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keypad-driven transaction entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{IncomeSource, NewTransaction, TransactionKind};

pub const MAX_AMOUNT_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Point,
    Backspace,
}

impl Key {
    /// `<` and `⌫` both mean backspace.
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '0'..='9' => Some(Key::Digit(c)),
            '.' => Some(Key::Point),
            '<' | '⌫' => Some(Key::Backspace),
            _ => None,
        }
    }
}

/// The amount as typed, kept as a string until save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountEntry {
    buf: String,
}

impl AmountEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays a key sequence such as `"12.5<0"`; unknown characters are skipped.
    pub fn from_keys(keys: &str) -> Self {
        let mut entry = Self::new();
        for key in keys.chars().filter_map(Key::from_char) {
            entry.press(key);
        }
        entry
    }

    /// An amount typed in full rather than pressed key by key. The keypad
    /// length limit does not apply.
    pub fn from_value(value: Decimal) -> Self {
        Self {
            buf: value.normalize().to_string(),
        }
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Backspace => {
                self.buf.pop();
            }
            Key::Point => {
                if !self.buf.contains('.') {
                    self.buf.push('.');
                }
            }
            Key::Digit(d) => {
                if self.buf.len() < MAX_AMOUNT_LEN {
                    self.buf.push(d);
                }
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.buf
    }

    /// What the amount field shows: `0` while empty.
    pub fn display(&self) -> &str {
        if self.buf.is_empty() { "0" } else { self.buf.as_str() }
    }

    /// Positive value, or `None` for an empty, lone-point or zero entry.
    pub fn value(&self) -> Option<Decimal> {
        let s = self.buf.trim_end_matches('.');
        if s.is_empty() {
            return None;
        }
        let s = if s.starts_with('.') {
            format!("0{}", s)
        } else {
            s.to_string()
        };
        s.parse::<Decimal>().ok().filter(|d| *d > Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

pub const INCOME_CATEGORIES: [CategoryOption; 5] = [
    CategoryOption { id: "salary", name: "Salary", color: "#3B82F6" },
    CategoryOption { id: "business", name: "Business", color: "#8B5CF6" },
    CategoryOption { id: "ganyu", name: "Ganyu", color: "#F97316" },
    CategoryOption { id: "farming", name: "Farming", color: "#10B981" },
    CategoryOption { id: "other", name: "Other", color: "#6B7280" },
];

pub const EXPENSE_CATEGORIES: [CategoryOption; 6] = [
    CategoryOption { id: "market", name: "Market & Groceries", color: "#EF4444" },
    CategoryOption { id: "school", name: "School Fees", color: "#3B82F6" },
    CategoryOption { id: "transport", name: "Transport", color: "#F97316" },
    CategoryOption { id: "food", name: "Food & Drinks", color: "#EAB308" },
    CategoryOption { id: "rent", name: "Rent & Bills", color: "#6B7280" },
    CategoryOption { id: "health", name: "Health", color: "#10B981" },
];

pub fn built_in_categories(kind: TransactionKind) -> &'static [CategoryOption] {
    match kind {
        TransactionKind::Income => &INCOME_CATEGORIES,
        TransactionKind::Expense => &EXPENSE_CATEGORIES,
    }
}

/// State of the "Add Transaction" form.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    kind: TransactionKind,
    amount: AmountEntry,
    category: Option<String>,
    note: String,
    /// Budget category keys accepted for expenses on top of the built-ins.
    extra_expense: Vec<String>,
}

impl TransactionDraft {
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            amount: AmountEntry::new(),
            category: None,
            note: String::new(),
            extra_expense: Vec::new(),
        }
    }

    pub fn with_budget_categories(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.extra_expense.extend(keys);
        self
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn amount(&self) -> &AmountEntry {
        &self.amount
    }

    /// Switching type drops a category that belonged to the other type.
    pub fn set_kind(&mut self, kind: TransactionKind) {
        if kind != self.kind {
            self.kind = kind;
            self.category = None;
        }
    }

    pub fn offers(&self, id: &str) -> bool {
        built_in_categories(self.kind).iter().any(|c| c.id == id)
            || (self.kind == TransactionKind::Expense && self.extra_expense.iter().any(|k| k == id))
    }

    /// Selects one category for the current type; ids from the other type are refused.
    pub fn select_category(&mut self, id: &str) -> bool {
        let id = id.trim().to_ascii_lowercase();
        if !self.offers(&id) {
            return false;
        }
        self.category = Some(id);
        true
    }

    pub fn press(&mut self, key: Key) {
        self.amount.press(key);
    }

    pub fn set_amount(&mut self, amount: AmountEntry) {
        self.amount = amount;
    }

    pub fn set_note(&mut self, note: &str) {
        self.note = note.to_string();
    }

    pub fn can_save(&self) -> bool {
        self.amount.value().is_some() && self.category.is_some()
    }

    /// The record to write, once both amount and category are set.
    pub fn to_new_transaction(&self, date: NaiveDate) -> Option<NewTransaction> {
        let amount = self.amount.value()?;
        let category = self.category.clone()?;
        let source = match self.kind {
            TransactionKind::Income => category.parse::<IncomeSource>().ok(),
            TransactionKind::Expense => None,
        };
        let note = Some(self.note.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Some(NewTransaction {
            date,
            kind: self.kind,
            amount,
            source,
            category,
            note,
        })
    }
}
