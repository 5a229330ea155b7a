//! High-level controller API for goals and daily progress.
//!
//! [`GoalController`] is the single coordinator between interfaces and the
//! store. It owns the user context, the clock and time zone used for
//! calendar-day derivation, the retry policy, a small cache of recently read
//! day plans and the duplicate-submission guard for roadmap generation.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ CLI / MCP /  │    │  GoalController  │    │  GoalStore   │
//! │ GoalSession  │───▶│  (goal_ops,      │───▶│ (blocking    │
//! │              │    │   day_ops, ...)  │    │  pool)       │
//! └──────────────┘    └────────┬─────────┘    └──────────────┘
//!                              │
//!                              ▼
//!                     ┌──────────────────┐
//!                     │ progress engine  │
//!                     │ RoadmapService   │
//!                     └──────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`GoalController`] instances
//! - [`goal_ops`]: Goal creation, listing, deletion and day sync
//! - [`day_ops`]: Task toggling, day completion and the today view
//! - [`resolution_ops`]: Missed-day detection and resolution
//!
//! Every store call runs on the blocking pool. Calls whose repetition is
//! harmless go through the [`RetryPolicy`]; goal creation does not.
//!
//! # Examples
//!
//! ```rust,no_run
//! use stride_core::{params::CreateGoal, CommandRoadmapService, ControllerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = ControllerBuilder::new(CommandRoadmapService::new("stride-generator"))
//!     .with_user("alice")
//!     .build()
//!     .await?;
//!
//! let params = CreateGoal { title: "Run a 10k".into(), days: 30 };
//! if let Some(goal) = controller.generate_goal_with_roadmap(&params).await? {
//!     let today = controller.today(goal.id).await?;
//!     println!("{today}");
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::{atomic::AtomicBool, Arc, Mutex, MutexGuard};

use jiff::tz::TimeZone;
use tokio::task::{self, JoinError};

use crate::{
    clock::Clock,
    error::{GoalError, Result},
    models::{DayPlan, Goal},
    progress::calculate_current_day,
    retry::RetryPolicy,
    store::GoalStore,
};

pub mod builder;
mod cache;
pub mod day_ops;
pub mod goal_ops;
mod guard;
pub mod resolution_ops;

#[cfg(test)]
mod tests;

pub use builder::ControllerBuilder;
pub use cache::DayPlanCache;
pub use day_ops::TodayView;
pub use resolution_ops::ResolutionOutcome;

/// Coordinates goal operations for one signed-in user.
pub struct GoalController<S> {
    store: Arc<dyn GoalStore>,
    service: S,
    user: Option<String>,
    clock: Arc<dyn Clock>,
    time_zone: TimeZone,
    retry: RetryPolicy,
    cache: Mutex<DayPlanCache>,
    generating: AtomicBool,
}

impl<S> GoalController<S> {
    pub(crate) fn new(
        store: Arc<dyn GoalStore>,
        service: S,
        user: Option<String>,
        clock: Arc<dyn Clock>,
        time_zone: TimeZone,
        retry: RetryPolicy,
        cache_capacity: usize,
    ) -> Self {
        Self {
            store,
            service,
            user,
            clock,
            time_zone,
            retry,
            cache: Mutex::new(DayPlanCache::new(cache_capacity)),
            generating: AtomicBool::new(false),
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The roadmap service this controller delegates to.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Time zone used for calendar-day derivation.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// The day number `goal` should be on right now.
    pub fn derived_day(&self, goal: &Goal) -> u32 {
        calculate_current_day(
            goal.created_at,
            goal.duration_days,
            self.clock.now(),
            &self.time_zone,
        )
    }

    fn require_user(&self) -> Result<String> {
        self.user.clone().ok_or(GoalError::NotAuthenticated)
    }

    fn cache(&self) -> MutexGuard<'_, DayPlanCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn remember(&self, plan: &DayPlan) {
        self.cache().put(plan.clone());
    }

    fn forget(&self, goal_id: u64) {
        self.cache().invalidate(goal_id);
    }

    /// Runs a store call once on the blocking pool.
    async fn store_once<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn GoalStore, &str) -> Result<T> + Send + 'static,
    {
        let user = self.require_user()?;
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || f(store.as_ref(), &user))
            .await
            .map_err(join_error)?
    }

    /// Runs a store call on the blocking pool, retrying transient failures.
    ///
    /// Only for calls whose repetition cannot double-apply a change.
    async fn store_call<T, F>(&self, operation: &str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: Fn(&dyn GoalStore, &str) -> Result<T> + Send + Sync + 'static,
    {
        let user = self.require_user()?;
        let f = Arc::new(f);
        self.retry
            .run(operation, || {
                let store = Arc::clone(&self.store);
                let user = user.clone();
                let f = Arc::clone(&f);
                async move {
                    task::spawn_blocking(move || f(store.as_ref(), &user))
                        .await
                        .map_err(join_error)?
                }
            })
            .await
    }

    /// Loads a goal or fails with `GoalNotFound`.
    async fn load_goal(&self, goal_id: u64) -> Result<Goal> {
        self.store_call("load goal", move |store, user| store.get_goal(user, goal_id))
            .await?
            .ok_or(GoalError::GoalNotFound { id: goal_id })
    }

    async fn load_days(&self, goal_id: u64) -> Result<Vec<DayPlan>> {
        self.store_call("load day plans", move |store, user| {
            store.get_days(user, goal_id)
        })
        .await
    }
}

fn join_error(e: JoinError) -> GoalError {
    if e.is_cancelled() {
        GoalError::Cancelled
    } else {
        GoalError::integrity(format!("Task join error: {e}"))
    }
}
