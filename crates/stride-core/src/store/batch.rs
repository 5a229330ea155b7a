//! Write batches applied atomically to one goal's record set.

use crate::models::{DayStatus, Goal, Task};

/// A goal to be created together with its day plans.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub title: String,
    pub duration_days: u32,
    pub created_at: jiff::Timestamp,
    /// Task descriptions for days `1..=duration_days`, in order
    pub days: Vec<Vec<String>>,
}

/// Change to the pending-adjustment pair of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingUpdate {
    #[default]
    Keep,
    /// Enter the pending state naming this day
    Set(u32),
    /// Leave the pending state
    Clear,
}

/// Field-level changes to a goal record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    /// Raise `current_day` to this value if it is lower
    pub advance_current_day_to: Option<u32>,
    /// Add one to `current_day` (not clamped)
    pub increment_current_day: bool,
    /// Days appended to `duration_days`
    pub add_duration_days: u32,
    pub pending: PendingUpdate,
}

/// Write to a single day plan.
///
/// With `tasks` set the day is replaced (or inserted if missing); without,
/// only the status changes and the day must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWrite {
    pub day: u32,
    pub tasks: Option<Vec<Task>>,
    pub status: DayStatus,
}

impl DayWrite {
    /// Status-only write.
    pub fn status(day: u32, status: DayStatus) -> Self {
        Self {
            day,
            tasks: None,
            status,
        }
    }

    /// Full replacement of a day's tasks and status.
    pub fn replace(day: u32, tasks: Vec<Task>, status: DayStatus) -> Self {
        Self {
            day,
            tasks: Some(tasks),
            status,
        }
    }
}

/// Goal fields a batch expects to find unchanged before applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precondition {
    pub current_day: u32,
    pub last_missed_day: Option<u32>,
}

impl Precondition {
    /// Captures the fields of `goal` a later write depends on.
    pub fn of(goal: &Goal) -> Self {
        Self {
            current_day: goal.current_day,
            last_missed_day: goal.last_missed_day,
        }
    }

    /// Whether `goal` still matches the captured state.
    pub fn holds(&self, goal: &Goal) -> bool {
        goal.current_day == self.current_day
            && goal.last_missed_day == self.last_missed_day
            && goal.pending_adjustment == self.last_missed_day.is_some()
    }
}

/// Day writes plus a goal patch, committed in one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    /// When set and not met, nothing is written
    pub precondition: Option<Precondition>,
    pub days: Vec<DayWrite>,
    pub goal: GoalPatch,
}
