//! Missed-day resolution actions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the user chose to resolve a missed day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolveAction {
    /// Mark the missed day skipped, leaving its tasks untouched
    Skip,

    /// Force every task of the missed day to completed
    MarkCompleted,

    /// Move incomplete tasks forward into the remaining days
    AdjustRoadmap,

    /// Legacy: add three days to the goal without moving tasks
    Extend,
}

/// Days appended by the legacy [`ResolveAction::Extend`] action.
pub const EXTEND_DAYS: u32 = 3;

impl FromStr for ResolveAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(ResolveAction::Skip),
            "mark_completed" | "complete" | "completed" => Ok(ResolveAction::MarkCompleted),
            "adjust_roadmap" | "adjust" => Ok(ResolveAction::AdjustRoadmap),
            "extend" => Ok(ResolveAction::Extend),
            _ => Err(format!("Invalid resolve action: {s}")),
        }
    }
}

impl ResolveAction {
    /// Wire representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveAction::Skip => "SKIP",
            ResolveAction::MarkCompleted => "MARK_COMPLETED",
            ResolveAction::AdjustRoadmap => "ADJUST_ROADMAP",
            ResolveAction::Extend => "EXTEND",
        }
    }
}
