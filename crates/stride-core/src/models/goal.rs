//! Goal model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A user's multi-day objective with a generated roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Unique identifier assigned by the store
    pub id: u64,

    /// Owner of the goal
    pub user_id: String,

    /// Title of the goal
    pub title: String,

    /// Total planned days
    pub duration_days: u32,

    /// Last day the user has progressed to (1-based)
    pub current_day: u32,

    /// Fixes day 1's calendar date
    pub created_at: Timestamp,

    /// Timestamp when the goal record was last written
    pub updated_at: Timestamp,

    /// A missed day must be resolved before normal interaction continues
    #[serde(default)]
    pub pending_adjustment: bool,

    /// Day awaiting resolution while `pending_adjustment` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_missed_day: Option<u32>,
}

impl Goal {
    /// Stored current day clamped into `[1, duration_days]`.
    ///
    /// `complete_day` may leave the stored value one past the last day.
    pub fn clamped_current_day(&self) -> u32 {
        self.current_day.clamp(1, self.duration_days.max(1))
    }

    /// Whether every planned day has been progressed past.
    pub fn is_finished(&self) -> bool {
        self.current_day > self.duration_days
    }
}
