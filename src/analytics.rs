// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Figures behind the reports: category breakdown, monthly flow, daily
//! spending and the savings rate. Everything here is a pure function over
//! already-loaded transactions; the chart view only changes presentation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::entry::{EXPENSE_CATEGORIES, INCOME_CATEGORIES};
use crate::models::{BudgetCategory, Transaction, TransactionKind};
use crate::utils::month_of;

const HEALTHY_SAVINGS_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const FALLBACK_SLICE_COLOR: &str = "#9CA3AF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartView {
    #[default]
    Pie,
    Bar,
    Trend,
}

impl ChartView {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartView::Pie => "pie",
            ChartView::Bar => "bar",
            ChartView::Trend => "trend",
        }
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartView {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pie" => Ok(ChartView::Pie),
            "bar" => Ok(ChartView::Bar),
            "trend" | "line" => Ok(ChartView::Trend),
            other => Err(anyhow!("Unknown view '{}' (use pie|bar|trend)", other)),
        }
    }
}

pub fn total(txs: &[Transaction], kind: TransactionKind) -> Decimal {
    txs.iter().filter(|t| t.kind == kind).map(|t| t.amount).sum()
}

pub fn savings(income: Decimal, expenses: Decimal) -> Decimal {
    income - expenses
}

/// `savings / income * 100` to one decimal place; zero when there was no income.
pub fn savings_rate(income: Decimal, expenses: Decimal) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (savings(income, expenses) / income * Decimal::ONE_HUNDRED).round_dp(1)
}

pub fn savings_rate_color(rate: Decimal) -> &'static str {
    if rate >= HEALTHY_SAVINGS_RATE {
        "#10B981"
    } else {
        "#EF4444"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
    pub savings_rate: Decimal,
}

pub fn summarize(month: &str, txs: &[Transaction]) -> MonthSummary {
    let in_month: Vec<Transaction> = txs
        .iter()
        .filter(|t| month_of(t.date) == month)
        .cloned()
        .collect();
    let income = total(&in_month, TransactionKind::Income);
    let expenses = total(&in_month, TransactionKind::Expense);
    MonthSummary {
        month: month.to_string(),
        income,
        expenses,
        savings: savings(income, expenses),
        savings_rate: savings_rate(income, expenses),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub name: String,
    pub color: String,
    pub amount: Decimal,
    /// Percent of the month's expenses, one decimal place.
    pub share: Decimal,
}

fn label_for(key: &str, budgets: &[BudgetCategory]) -> (String, String) {
    if let Some(c) = budgets.iter().find(|c| c.key == key) {
        return (c.name.clone(), c.color.clone());
    }
    EXPENSE_CATEGORIES
        .iter()
        .chain(INCOME_CATEGORIES.iter())
        .find(|o| o.id == key)
        .map(|o| (o.name.to_string(), o.color.to_string()))
        .unwrap_or_else(|| (key.to_string(), FALLBACK_SLICE_COLOR.to_string()))
}

/// Expenses grouped by category, largest first. Budget categories supply
/// display names and colors where they exist.
pub fn expense_breakdown(txs: &[Transaction], budgets: &[BudgetCategory]) -> Vec<CategorySlice> {
    let mut by_cat: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in txs.iter().filter(|t| t.kind == TransactionKind::Expense) {
        *by_cat.entry(t.category.as_str()).or_default() += t.amount;
    }
    let total: Decimal = by_cat.values().copied().sum();
    let mut out: Vec<CategorySlice> = by_cat
        .into_iter()
        .map(|(key, amount)| {
            let (name, color) = label_for(key, budgets);
            let share = if total.is_zero() {
                Decimal::ZERO
            } else {
                (amount / total * Decimal::ONE_HUNDRED).round_dp(1)
            };
            CategorySlice {
                category: key.to_string(),
                name,
                color,
                amount,
                share,
            }
        })
        .collect();
    out.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthFlow {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// One entry per requested month, in the order given; months without
/// activity show zeros.
pub fn monthly_flows(txs: &[Transaction], months: &[String]) -> Vec<MonthFlow> {
    months
        .iter()
        .map(|m| {
            let mut flow = MonthFlow {
                month: m.clone(),
                income: Decimal::ZERO,
                expenses: Decimal::ZERO,
            };
            for t in txs.iter().filter(|t| month_of(t.date) == *m) {
                match t.kind {
                    TransactionKind::Income => flow.income += t.amount,
                    TransactionKind::Expense => flow.expenses += t.amount,
                }
            }
            flow
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySpend {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Spending per day of `month`, oldest first, days without spending omitted.
pub fn daily_spending(txs: &[Transaction], month: &str) -> Vec<DailySpend> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in txs
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense && month_of(t.date) == month)
    {
        *by_day.entry(t.date).or_default() += t.amount;
    }
    by_day
        .into_iter()
        .map(|(date, amount)| DailySpend { date, amount })
        .collect()
}
