//! Parameter structures for goal operations.
//!
//! Shared by every interface (CLI, MCP) so that the controller sees one shape
//! per operation. Interface layers add their own derives and convert with
//! `From`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │
//! │  (clap derives) │    │ (JsonSchema)    │
//! └────────┬────────┘    └────────┬────────┘
//!          └──────────┬───────────┘
//!                     ▼
//!            ┌─────────────────┐
//!            │   Core Params   │
//!            └─────────────────┘
//! ```
//!
//! JSON schema derives are only compiled with the `schema` feature.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{GoalError, Result},
    models::ResolveAction,
};

/// Longest accepted goal title, in characters.
pub const MAX_TITLE_CHARS: usize = 500;

/// Longest accepted roadmap, in days.
pub const MAX_DURATION_DAYS: u32 = 365;

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the goal to operate on
    pub id: u64,
}

/// Parameters for creating a goal from a generated roadmap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateGoal {
    /// What the user wants to achieve
    pub title: String,
    /// Number of days the roadmap should span (1-365)
    pub days: u32,
}

impl CreateGoal {
    /// Validates the request before any generator call is made.
    ///
    /// # Errors
    ///
    /// * `GoalError::InvalidInput` - blank or overlong title, or a duration
    ///   outside `1..=365`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stride_core::params::CreateGoal;
    ///
    /// let params = CreateGoal { title: "  ".into(), days: 30 };
    /// assert!(params.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(GoalError::invalid_input("title").with_reason("title cannot be empty"));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(GoalError::invalid_input("title")
                .with_reason(format!("title is longer than {MAX_TITLE_CHARS} characters")));
        }
        if !(1..=MAX_DURATION_DAYS).contains(&self.days) {
            return Err(GoalError::invalid_input("days")
                .with_reason(format!("days must be between 1 and {MAX_DURATION_DAYS}")));
        }
        Ok(())
    }
}

/// Parameters for toggling one task of today's plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ToggleTask {
    /// ID of the goal
    pub goal_id: u64,
    /// Zero-based index of the task within today's plan
    pub index: usize,
}

/// Parameters for resolving a pending missed day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ResolveMissedDay {
    /// ID of the goal
    pub goal_id: u64,
    /// One of 'skip', 'mark_completed', 'adjust_roadmap' or 'extend'
    pub action: String,
}

impl ResolveMissedDay {
    /// Parses the requested action.
    ///
    /// # Errors
    ///
    /// * `GoalError::InvalidInput` - When the action is not recognized
    pub fn action(&self) -> Result<ResolveAction> {
        self.action
            .parse()
            .map_err(|reason: String| GoalError::invalid_input("action").with_reason(reason))
    }
}
