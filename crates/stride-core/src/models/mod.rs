//! Data models for goals, day plans and roadmaps.
//!
//! A [`Goal`] owns one [`DayPlan`] per day number, created together when a
//! generated [`Roadmap`] is accepted. Display implementations live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use stride_core::models::{DayPlan, DayStatus, Task};
//!
//! let day = DayPlan {
//!     goal_id: 1,
//!     day: 1,
//!     tasks: vec![Task::new("Read chapter one"), Task::new("Take notes")],
//!     status: DayStatus::Pending,
//! };
//! assert!(day.has_incomplete_task());
//! ```

pub mod day_plan;
pub mod goal;
pub mod resolution;
pub mod roadmap;
pub mod status;
pub mod summary;


pub use day_plan::{DayPlan, Task};
pub use goal::Goal;
pub use resolution::ResolveAction;
pub use roadmap::{
    RedistributionRequest, RedistributionResponse, Roadmap, RoadmapDay, RoadmapRequest,
};
pub use status::DayStatus;
pub use summary::GoalSummary;
