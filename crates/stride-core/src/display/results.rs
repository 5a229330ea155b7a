//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    controller::{ResolutionOutcome, TodayView},
    models::{Goal, ResolveAction},
};

/// Result of a create operation.
///
/// # Examples
///
/// ```rust
/// use stride_core::{display::CreateResult, models::Goal};
/// use jiff::Timestamp;
///
/// let goal = Goal {
///     id: 1,
///     user_id: "alice".to_string(),
///     title: "Learn Go".to_string(),
///     duration_days: 14,
///     current_day: 1,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
///     pending_adjustment: false,
///     last_missed_day: None,
/// };
/// let output = CreateResult::new(goal).to_string();
/// assert!(output.contains("Created goal with ID: 1 (14 days)"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Goal> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Created goal with ID: {} ({} days)",
            self.resource.id, self.resource.duration_days
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Result of a delete operation.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Goal> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted goal '{}' (ID: {}) and its {} days",
            self.resource.title, self.resource.id, self.resource.duration_days
        )
    }
}

/// Outcome of a missed-day check.
pub struct MissedDayReport {
    pub goal_id: u64,
    pub missed_day: Option<u32>,
}

impl fmt::Display for MissedDayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.missed_day {
            Some(day) => writeln!(
                f,
                "Goal {} missed day {day}. Resolve it with skip, complete, adjust or extend.",
                self.goal_id
            ),
            None => writeln!(f, "Goal {} is on track.", self.goal_id),
        }
    }
}

impl fmt::Display for TodayView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.goal)?;
        writeln!(f)?;

        if let Some(day) = self.missed_day {
            // the goal header already carries the pending notice
            if !self.goal.pending_adjustment {
                writeln!(f, "> Day {day} was missed.")?;
                writeln!(f)?;
            }
        }

        match &self.plan {
            Some(plan) => write!(f, "{plan}"),
            None => writeln!(f, "No plan stored for day {}.", self.today),
        }
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.applied, self.day) {
            (true, Some(day)) => {
                write!(f, "Resolved missed day {day} with {}", self.action)?;
                if self.action == ResolveAction::AdjustRoadmap && self.moved_tasks > 0 {
                    write!(f, ", moving {} open tasks forward", self.moved_tasks)?;
                }
                if self.action == ResolveAction::Extend {
                    write!(f, ", roadmap now {} days", self.goal.duration_days)?;
                }
                writeln!(f, ".")?;
            }
            (false, Some(day)) => {
                writeln!(f, "Day {day} was already resolved elsewhere.")?;
            }
            (_, None) => {
                writeln!(f, "Goal {} has no missed day to resolve.", self.goal.id)?;
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.goal)
    }
}
