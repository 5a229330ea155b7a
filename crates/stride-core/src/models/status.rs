//! Day status enumeration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of day statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Day has not been resolved yet
    #[default]
    Pending,

    /// Reserved; never produced by the engine
    InProgress,

    /// Day was completed
    Completed,

    /// Day was skipped or folded into a redistribution
    Skipped,
}

impl FromStr for DayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(DayStatus::Pending),
            "in_progress" | "inprogress" => Ok(DayStatus::InProgress),
            "completed" => Ok(DayStatus::Completed),
            "skipped" => Ok(DayStatus::Skipped),
            _ => Err(format!("Invalid day status: {s}")),
        }
    }
}

impl DayStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Pending => "pending",
            DayStatus::InProgress => "in_progress",
            DayStatus::Completed => "completed",
            DayStatus::Skipped => "skipped",
        }
    }

    /// Whether the day no longer takes part in missed-day scans.
    pub fn is_resolved(&self) -> bool {
        matches!(self, DayStatus::Completed | DayStatus::Skipped)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use stride_core::models::DayStatus;
    ///
    /// assert_eq!(DayStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(DayStatus::Skipped.with_icon(), "↷ Skipped");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            DayStatus::Completed => "✓ Completed",
            DayStatus::InProgress => "➤ In Progress",
            DayStatus::Skipped => "↷ Skipped",
            DayStatus::Pending => "○ Pending",
        }
    }
}
