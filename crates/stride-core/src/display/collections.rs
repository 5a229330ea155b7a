//! Collection wrappers with markdown display.

use std::{fmt, ops::Index};

use super::datetime::DayDate;
use crate::models::{DayPlan, Goal, GoalSummary};

/// A list of goal summaries.
///
/// # Examples
///
/// ```rust
/// use stride_core::{display::GoalSummaries, models::GoalSummary};
/// use jiff::Timestamp;
///
/// let summaries = GoalSummaries(vec![GoalSummary {
///     id: 1,
///     title: "Run a 10k".to_string(),
///     duration_days: 30,
///     current_day: 4,
///     created_at: Timestamp::now(),
///     pending_adjustment: false,
///     completed_days: 3,
///     skipped_days: 0,
///     pending_days: 27,
/// }]);
/// assert!(summaries.to_string().contains("Run a 10k (ID: 1)"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GoalSummaries(pub Vec<GoalSummary>);

impl GoalSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GoalSummary> {
        self.0.iter()
    }
}

impl Index<usize> for GoalSummaries {
    type Output = GoalSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for GoalSummaries {
    type Item = GoalSummary;
    type IntoIter = std::vec::IntoIter<GoalSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a GoalSummaries {
    type Item = &'a GoalSummary;
    type IntoIter = std::slice::Iter<'a, GoalSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for GoalSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No goals yet.");
        }
        for summary in &self.0 {
            write!(f, "{summary}")?;
        }
        Ok(())
    }
}

/// A goal with its whole roadmap.
#[derive(Debug, Clone)]
pub struct GoalDetail {
    pub goal: Goal,
    pub days: Vec<DayPlan>,
}

impl fmt::Display for GoalDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.goal)?;
        writeln!(f)?;

        if self.days.is_empty() {
            return writeln!(f, "No days in this roadmap.");
        }
        for day in &self.days {
            let marker = if day.day == self.goal.current_day {
                " (current)"
            } else {
                ""
            };
            writeln!(
                f,
                "*{}{marker}*",
                DayDate {
                    created_at: &self.goal.created_at,
                    day: day.day,
                }
            )?;
            write!(f, "{day}")?;
        }
        Ok(())
    }
}
