// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget totals and the safe / warning / over classification.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::models::BudgetCategory;
use crate::theme::Palette;
use crate::utils::{parse_positive, slugify};

pub const DEFAULT_CATEGORY_COLOR: &str = "#00796B";

const WARNING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Safe,
    Warning,
    Over,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "safe",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Over => "over",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "#10B981",
            BudgetStatus::Warning => "#EAB308",
            BudgetStatus::Over => "#EF4444",
        }
    }

    /// Progress-bar fill for this status under the active theme.
    pub fn bar_color(&self, palette: &Palette) -> &'static str {
        match self {
            BudgetStatus::Safe => palette.progress_safe,
            BudgetStatus::Warning => palette.progress_warning,
            BudgetStatus::Over => palette.progress_over,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetTotals {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    /// Negative once spending passes the budget.
    pub remaining: Decimal,
}

pub fn totals(categories: &[BudgetCategory]) -> BudgetTotals {
    let total_budget: Decimal = categories.iter().map(|c| c.monthly_budget).sum();
    let total_spent: Decimal = categories.iter().map(|c| c.spent).sum();
    BudgetTotals {
        total_budget,
        total_spent,
        remaining: total_budget - total_spent,
    }
}

/// `spent / budget * 100`, or `None` when there is no budget to divide by.
pub fn usage_percentage(spent: Decimal, budget: Decimal) -> Option<Decimal> {
    if budget.is_zero() {
        return None;
    }
    spent
        .checked_div(budget)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
}

/// A zero budget is always over.
pub fn budget_status(spent: Decimal, budget: Decimal) -> BudgetStatus {
    match usage_percentage(spent, budget) {
        None => BudgetStatus::Over,
        Some(p) if p >= Decimal::ONE_HUNDRED => BudgetStatus::Over,
        Some(p) if p >= WARNING_PERCENT => BudgetStatus::Warning,
        Some(_) => BudgetStatus::Safe,
    }
}

/// Percentage shown on the progress bar, clamped to 0..=100.
pub fn display_percentage(spent: Decimal, budget: Decimal) -> Decimal {
    match usage_percentage(spent, budget) {
        None => Decimal::ONE_HUNDRED,
        Some(p) => p.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryUsage {
    pub key: String,
    pub name: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Unclamped; `None` for a zero budget.
    pub percentage: Option<Decimal>,
    pub bar_percentage: Decimal,
    pub status: BudgetStatus,
}

pub fn usage(category: &BudgetCategory) -> CategoryUsage {
    CategoryUsage {
        key: category.key.clone(),
        name: category.name.clone(),
        budget: category.monthly_budget,
        spent: category.spent,
        remaining: category.monthly_budget - category.spent,
        percentage: usage_percentage(category.spent, category.monthly_budget),
        bar_percentage: display_percentage(category.spent, category.monthly_budget),
        status: budget_status(category.spent, category.monthly_budget),
    }
}

/// Categories needing attention, worst first.
pub fn alerts(categories: &[BudgetCategory]) -> Vec<CategoryUsage> {
    let mut out: Vec<CategoryUsage> = categories
        .iter()
        .map(usage)
        .filter(|u| u.status != BudgetStatus::Safe)
        .collect();
    out.sort_by(|a, b| b.bar_percentage.cmp(&a.bar_percentage));
    out
}

/// Appends a category from raw form input. Blank names, non-numeric or
/// non-positive amounts and duplicate names leave the list untouched.
pub fn add_category<'a>(
    categories: &'a mut Vec<BudgetCategory>,
    name: &str,
    amount: &str,
    color: Option<&str>,
) -> Option<&'a BudgetCategory> {
    let name = name.trim();
    let key = slugify(name);
    let Some(monthly_budget) = parse_positive(amount) else {
        debug!(name, amount, "add-category ignored: amount missing or not positive");
        return None;
    };
    if key.is_empty() {
        debug!("add-category ignored: empty name");
        return None;
    }
    if categories.iter().any(|c| c.key == key) {
        debug!(%key, "add-category ignored: category exists");
        return None;
    }
    let id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    categories.push(BudgetCategory {
        id,
        key,
        name: name.to_string(),
        color: color.unwrap_or(DEFAULT_CATEGORY_COLOR).to_string(),
        monthly_budget,
        spent: Decimal::ZERO,
        recent: Vec::new(),
    });
    categories.last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    #[test]
    fn status_boundaries() {
        assert_eq!(budget_status(d(79), d(100)), BudgetStatus::Safe);
        assert_eq!(budget_status(d(80), d(100)), BudgetStatus::Warning);
        assert_eq!(budget_status(d(99), d(100)), BudgetStatus::Warning);
        assert_eq!(budget_status(d(100), d(100)), BudgetStatus::Over);
        assert_eq!(budget_status(d(150), d(100)), BudgetStatus::Over);
    }

    #[test]
    fn zero_budget_is_over_and_full() {
        assert_eq!(usage_percentage(d(10), Decimal::ZERO), None);
        assert_eq!(budget_status(Decimal::ZERO, Decimal::ZERO), BudgetStatus::Over);
        assert_eq!(display_percentage(d(10), Decimal::ZERO), Decimal::ONE_HUNDRED);
    }
}
