//! Per-user keyed store of goals and their day plans.
//!
//! [`GoalStore`] is the narrow interface the controller consumes. Methods are
//! synchronous and may block; the controller runs them on the blocking pool.
//! [`SqliteStore`] is the bundled implementation.

use std::path::{Path, PathBuf};

use crate::{
    db::Database,
    error::Result,
    models::{DayPlan, Goal, GoalSummary},
};

pub mod batch;

pub use batch::{DayWrite, GoalPatch, NewGoal, PendingUpdate, Precondition, WriteBatch};

/// Keyed document store scoped by user id.
pub trait GoalStore: Send + Sync {
    /// Creates a goal and all its day plans atomically.
    fn create_goal(&self, user_id: &str, new_goal: &NewGoal) -> Result<(Goal, Vec<DayPlan>)>;

    /// Gets a goal by ID.
    fn get_goal(&self, user_id: &str, goal_id: u64) -> Result<Option<Goal>>;

    /// Lists the user's goals with progress counts.
    fn list_goals(&self, user_id: &str) -> Result<Vec<GoalSummary>>;

    /// Deletes a goal together with its day plans.
    fn delete_goal(&self, user_id: &str, goal_id: u64) -> Result<bool>;

    /// Gets one day plan.
    fn get_day(&self, user_id: &str, goal_id: u64, day: u32) -> Result<Option<DayPlan>>;

    /// Gets every day plan of a goal, ordered by day.
    fn get_days(&self, user_id: &str, goal_id: u64) -> Result<Vec<DayPlan>>;

    /// Transactional read-modify-write of a single day plan.
    fn update_day(
        &self,
        user_id: &str,
        goal_id: u64,
        day: u32,
        mutate: &mut dyn FnMut(&mut DayPlan) -> Result<()>,
    ) -> Result<DayPlan>;

    /// Applies day writes and a goal patch atomically, returning the updated
    /// goal, or `None` if the batch precondition failed.
    fn apply_batch(&self, user_id: &str, goal_id: u64, batch: &WriteBatch)
        -> Result<Option<Goal>>;
}

/// SQLite-backed [`GoalStore`]; opens a connection per operation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens (and if needed initializes) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        Database::new(&db_path)?;
        Ok(Self { db_path })
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Database> {
        Database::new(&self.db_path)
    }
}

impl GoalStore for SqliteStore {
    fn create_goal(&self, user_id: &str, new_goal: &NewGoal) -> Result<(Goal, Vec<DayPlan>)> {
        self.connect()?.create_goal(user_id, new_goal)
    }

    fn get_goal(&self, user_id: &str, goal_id: u64) -> Result<Option<Goal>> {
        self.connect()?.get_goal(user_id, goal_id)
    }

    fn list_goals(&self, user_id: &str) -> Result<Vec<GoalSummary>> {
        self.connect()?.list_goals(user_id)
    }

    fn delete_goal(&self, user_id: &str, goal_id: u64) -> Result<bool> {
        self.connect()?.delete_goal(user_id, goal_id)
    }

    fn get_day(&self, user_id: &str, goal_id: u64, day: u32) -> Result<Option<DayPlan>> {
        self.connect()?.get_day(user_id, goal_id, day)
    }

    fn get_days(&self, user_id: &str, goal_id: u64) -> Result<Vec<DayPlan>> {
        self.connect()?.get_days(user_id, goal_id)
    }

    fn update_day(
        &self,
        user_id: &str,
        goal_id: u64,
        day: u32,
        mutate: &mut dyn FnMut(&mut DayPlan) -> Result<()>,
    ) -> Result<DayPlan> {
        self.connect()?.update_day(user_id, goal_id, day, mutate)
    }

    fn apply_batch(
        &self,
        user_id: &str,
        goal_id: u64,
        batch: &WriteBatch,
    ) -> Result<Option<Goal>> {
        self.connect()?.apply_batch(user_id, goal_id, batch)
    }
}
