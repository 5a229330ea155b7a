//! Day progress engine.
//!
//! Pure decision logic that keeps a goal's stored progress consistent with
//! the calendar. Nothing in this module performs I/O; the controller reads a
//! snapshot from the store, asks this module what to do, and writes the
//! resulting [`crate::store::WriteBatch`].
//!
//! ```text
//! calendar ──▶ missed ──▶ resolution ──▶ WriteBatch
//!                              │
//!                              └──▶ redistribute (ADJUST_ROADMAP)
//! ```
//!
//! - [`calendar`]: wall clock to day number
//! - [`missed`]: at most one missed day per scan, earliest first
//! - [`resolution`]: SKIP, MARK_COMPLETED, ADJUST_ROADMAP and EXTEND plans
//! - [`redistribute`]: re-dealing tasks four per day

pub mod calendar;
pub mod missed;
pub mod redistribute;
pub mod resolution;

pub use calendar::calculate_current_day;
pub use missed::{detect_missed_day, MissedDay};
pub use redistribute::{redistribute, MAX_TASKS_PER_DAY};
