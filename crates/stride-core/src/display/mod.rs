//! Markdown formatting for goals, days and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! newtype wrappers cover collections and operation results. Every
//! formatter produces markdown, which the CLI renders to the terminal and
//! the MCP server returns as text.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Markdown      │
//! │  (Goal, Day)    │───▶│ Result Types    │───▶│ (Terminal/MCP)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: `GoalSummaries`, `GoalDetail`
//! - [`results`]: `CreateResult`, `DeleteResult`, `MissedDayReport` and the
//!   today/resolution views
//! - [`status`]: `OperationStatus`
//! - [`datetime`]: timestamp and day-date formatting
//!
//! # Examples
//!
//! ```rust
//! use stride_core::{display::OperationStatus, models::{DayPlan, DayStatus, Task}};
//!
//! let day = DayPlan {
//!     goal_id: 1,
//!     day: 2,
//!     tasks: vec![Task { description: "Scales".into(), is_completed: true }],
//!     status: DayStatus::Pending,
//! };
//! assert!(day.to_string().contains("- [x] 0. Scales"));
//!
//! let status = OperationStatus::success("Day 2 completed");
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{GoalDetail, GoalSummaries};
pub use datetime::{DayDate, LocalDateTime};
pub use results::{CreateResult, DeleteResult, MissedDayReport};
pub use status::OperationStatus;
