// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Savings goal progress, deadlines and weekly targets.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::models::Goal;
use crate::utils::{parse_date, parse_positive};

pub const DEFAULT_GOAL_COLOR: &str = "#00796B";
pub const DEFAULT_GOAL_CATEGORY: &str = "Custom";

const HIGH_PROGRESS: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const MID_PROGRESS: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Unclamped `saved / target * 100`. A zero target counts as reached.
pub fn progress_percentage(saved: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }
    saved
        .checked_div(target)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ONE_HUNDRED)
}

pub fn display_progress(saved: Decimal, target: Decimal) -> Decimal {
    progress_percentage(saved, target)
        .max(Decimal::ZERO)
        .min(Decimal::ONE_HUNDRED)
}

pub fn is_completed(saved: Decimal, target: Decimal) -> bool {
    progress_percentage(saved, target) >= Decimal::ONE_HUNDRED
}

pub fn progress_color(percentage: Decimal) -> &'static str {
    if percentage >= HIGH_PROGRESS {
        "#10B981"
    } else if percentage >= MID_PROGRESS {
        "#EAB308"
    } else {
        "#EF4444"
    }
}

/// Whole weeks left, rounded up; zero once the deadline is today or past.
pub fn weeks_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    let days = (deadline - today).num_days();
    if days <= 0 {
        return 0;
    }
    (days + 6) / 7
}

/// `target / weeks`; with no weeks left the whole outstanding amount is due now.
pub fn weekly_target(target: Decimal, saved: Decimal, weeks: i64) -> Decimal {
    if weeks <= 0 {
        return (target - saved).max(Decimal::ZERO).round_dp(2);
    }
    (target / Decimal::from(weeks)).round_dp(2)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub name: String,
    pub saved: Decimal,
    pub target: Decimal,
    pub percentage: Decimal,
    pub bar_percentage: Decimal,
    pub completed: bool,
    pub weeks_remaining: i64,
    pub overdue: bool,
    pub weekly_target: Decimal,
}

pub fn progress(goal: &Goal, today: NaiveDate) -> GoalProgress {
    let weeks = weeks_remaining(goal.deadline, today);
    let completed = is_completed(goal.saved, goal.target);
    GoalProgress {
        name: goal.name.clone(),
        saved: goal.saved,
        target: goal.target,
        percentage: progress_percentage(goal.saved, goal.target),
        bar_percentage: display_progress(goal.saved, goal.target),
        completed,
        weeks_remaining: weeks,
        overdue: weeks == 0 && !completed,
        weekly_target: goal.weekly_target,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalTotals {
    pub saved: Decimal,
    pub target: Decimal,
    pub bar_percentage: Decimal,
}

pub fn totals(goals: &[Goal]) -> GoalTotals {
    let saved: Decimal = goals.iter().map(|g| g.saved).sum();
    let target: Decimal = goals.iter().map(|g| g.target).sum();
    let bar_percentage = if target.is_zero() {
        Decimal::ZERO
    } else {
        display_progress(saved, target)
    };
    GoalTotals {
        saved,
        target,
        bar_percentage,
    }
}

/// Appends a goal from raw form input; any blank or unparsable field is a no-op.
pub fn add_goal<'a>(
    goals: &'a mut Vec<Goal>,
    name: &str,
    amount: &str,
    deadline: &str,
    today: NaiveDate,
) -> Option<&'a Goal> {
    let name = name.trim();
    if name.is_empty() {
        debug!("add-goal ignored: empty name");
        return None;
    }
    let Some(target) = parse_positive(amount) else {
        debug!(name, amount, "add-goal ignored: target missing or not positive");
        return None;
    };
    let Ok(deadline) = parse_date(deadline.trim()) else {
        debug!(name, deadline, "add-goal ignored: bad deadline");
        return None;
    };
    if goals.iter().any(|g| g.name.eq_ignore_ascii_case(name)) {
        debug!(name, "add-goal ignored: goal exists");
        return None;
    }
    let id = goals.iter().map(|g| g.id).max().unwrap_or(0) + 1;
    goals.push(Goal {
        id,
        name: name.to_string(),
        category: DEFAULT_GOAL_CATEGORY.to_string(),
        color: DEFAULT_GOAL_COLOR.to_string(),
        target,
        saved: Decimal::ZERO,
        deadline,
        weekly_target: weekly_target(target, Decimal::ZERO, weeks_remaining(deadline, today)),
    });
    goals.last()
}

/// Changes whichever fields parse and recomputes the weekly target.
/// Returns false, leaving the goal untouched, if any supplied field is invalid.
pub fn edit_goal(
    goal: &mut Goal,
    name: Option<&str>,
    amount: Option<&str>,
    deadline: Option<&str>,
    today: NaiveDate,
) -> bool {
    let name = match name.map(str::trim) {
        Some("") => return false,
        other => other,
    };
    let target = match amount {
        Some(raw) => match parse_positive(raw) {
            Some(t) => Some(t),
            None => return false,
        },
        None => None,
    };
    let deadline = match deadline {
        Some(raw) => match parse_date(raw.trim()) {
            Ok(d) => Some(d),
            Err(_) => return false,
        },
        None => None,
    };
    if let Some(n) = name {
        goal.name = n.to_string();
    }
    if let Some(t) = target {
        goal.target = t;
    }
    if let Some(d) = deadline {
        goal.deadline = d;
    }
    goal.weekly_target = weekly_target(
        goal.target,
        goal.saved,
        weeks_remaining(goal.deadline, today),
    );
    true
}

/// "Add money": only positive amounts count.
pub fn contribute(goal: &mut Goal, amount: Decimal) -> bool {
    if amount <= Decimal::ZERO {
        return false;
    }
    goal.saved += amount;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weeks_round_up_and_floor_at_zero() {
        let today = day(2025, 9, 1);
        assert_eq!(weeks_remaining(day(2025, 9, 11), today), 2);
        assert_eq!(weeks_remaining(day(2025, 9, 8), today), 1);
        assert_eq!(weeks_remaining(day(2025, 9, 1), today), 0);
        assert_eq!(weeks_remaining(day(2025, 8, 1), today), 0);
    }

    #[test]
    fn zero_weeks_means_outstanding_is_due() {
        let t = Decimal::new(300000, 0);
        assert_eq!(weekly_target(t, Decimal::new(100000, 0), 0), Decimal::new(200000, 0));
        assert_eq!(weekly_target(t, Decimal::new(400000, 0), 0), Decimal::ZERO);
        assert_eq!(weekly_target(t, Decimal::ZERO, 4), Decimal::new(75000, 0));
    }

    #[test]
    fn progress_colors() {
        assert_eq!(progress_color(Decimal::new(85, 0)), "#10B981");
        assert_eq!(progress_color(Decimal::new(50, 0)), "#EAB308");
        assert_eq!(progress_color(Decimal::new(10, 0)), "#EF4444");
    }
}
