//! Day plan and task models.

use serde::{Deserialize, Serialize};

use super::DayStatus;

/// A single task inside a day plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Short description of the work
    pub description: String,

    /// Whether the user has ticked the task off
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Creates an incomplete task.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            is_completed: false,
        }
    }
}

/// The task list and status for one day of a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    /// ID of the parent goal
    pub goal_id: u64,

    /// Day number (1-based)
    pub day: u32,

    /// Ordered tasks for the day
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Resolution status of the day
    pub status: DayStatus,
}

impl DayPlan {
    /// Whether any task on this day is still open.
    pub fn has_incomplete_task(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_completed)
    }

    /// Descriptions of the tasks that are still open, in order.
    pub fn incomplete_descriptions(&self) -> impl Iterator<Item = &str> {
        self.tasks
            .iter()
            .filter(|task| !task.is_completed)
            .map(|task| task.description.as_str())
    }

    /// Number of completed tasks.
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_completed).count()
    }
}
