//! Core library for the Stride goal tracker.
//!
//! A goal is a multi-day roadmap of small daily tasks. This crate keeps a
//! goal's stored progress consistent with the calendar: it derives which day
//! the user should be on, detects days that slipped by unfinished, applies
//! the user's chosen resolution and rebalances outstanding work across the
//! remaining days.
//!
//! # Layers
//!
//! - [`progress`]: pure decision logic (calendar days, missed-day detection,
//!   resolutions, redistribution)
//! - [`store`]: the per-user [`GoalStore`] interface and its SQLite
//!   implementation in [`db`]
//! - [`controller`]: [`GoalController`], which runs the engine against the
//!   store with retries and user scoping
//! - [`session`]: observable view state with optimistic updates
//! - [`service`]: the external roadmap generator seam
//! - [`display`]: markdown formatting for every result type
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stride_core::{params::CreateGoal, CommandRoadmapService, ControllerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = ControllerBuilder::new(CommandRoadmapService::new("stride-generator"))
//!     .with_database_path(Some("stride.db"))
//!     .with_user("alice")
//!     .build()
//!     .await?;
//!
//! let params = CreateGoal {
//!     title: "Learn to play chess".to_string(),
//!     days: 14,
//! };
//! if let Some(goal) = controller.generate_goal_with_roadmap(&params).await? {
//!     println!("{}", controller.today(goal.id).await?);
//! }
//!
//! for summary in controller.list_goals().await? {
//!     println!("Goal: {}", summary.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod controller;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod progress;
pub mod retry;
pub mod service;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{ControllerBuilder, GoalController, ResolutionOutcome, TodayView};
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, GoalDetail, GoalSummaries, MissedDayReport, OperationStatus,
};
pub use error::{ErrorKind, GoalError, Result};
pub use models::{DayPlan, DayStatus, Goal, GoalSummary, ResolveAction, Roadmap, Task};
pub use params::{CreateGoal, Id, ResolveMissedDay, ToggleTask};
pub use retry::RetryPolicy;
pub use service::{CommandRoadmapService, RoadmapService};
pub use session::{GoalSession, ViewState};
pub use store::{GoalStore, SqliteStore};
