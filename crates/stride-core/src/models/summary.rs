//! Goal summary model for list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Progress overview of a goal without its task lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalSummary {
    pub id: u64,
    pub title: String,
    pub duration_days: u32,
    pub current_day: u32,
    pub created_at: Timestamp,
    pub pending_adjustment: bool,
    pub completed_days: u32,
    pub skipped_days: u32,
    pub pending_days: u32,
}
