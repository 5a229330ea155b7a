//! Wire types exchanged with the roadmap service.
//!
//! Field names follow the service's camelCase JSON schema.

use serde::{Deserialize, Serialize};

use crate::error::{GoalError, Result};

/// Request for a new roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapRequest {
    /// Free-text goal description
    pub goal: String,
    /// Number of days the roadmap should span
    pub days: u32,
}

/// One day of a generated roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapDay {
    pub day: u32,
    pub tasks: Vec<String>,
}

/// A generated roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub title: String,
    pub duration_days: u32,
    pub days: Vec<RoadmapDay>,
}

impl Roadmap {
    /// Checks the payload against the schema the engine relies on.
    ///
    /// Days must be numbered `1..=duration_days` in order and every task
    /// must have a non-blank description.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(GoalError::generation("roadmap title is empty"));
        }
        if self.duration_days == 0 {
            return Err(GoalError::generation("roadmap has no days"));
        }
        if self.days.len() != self.duration_days as usize {
            return Err(GoalError::generation(format!(
                "roadmap declares {} days but contains {}",
                self.duration_days,
                self.days.len()
            )));
        }
        for (index, day) in self.days.iter().enumerate() {
            let expected = index as u32 + 1;
            if day.day != expected {
                return Err(GoalError::generation(format!(
                    "expected day {expected}, found day {}",
                    day.day
                )));
            }
            if day.tasks.iter().any(|task| task.trim().is_empty()) {
                return Err(GoalError::generation(format!(
                    "day {} contains an empty task",
                    day.day
                )));
            }
        }
        Ok(())
    }
}

/// Request to rebalance incomplete tasks over the remaining days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedistributionRequest {
    pub remaining_days: Vec<RoadmapDay>,
    pub incomplete_tasks: Vec<String>,
    pub total_remaining_days: u32,
}

/// Rebalanced task lists; days absent from `days` are left as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RedistributionResponse {
    pub days: Vec<RoadmapDay>,
}
