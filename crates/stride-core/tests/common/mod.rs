//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use jiff::{tz::TimeZone, SignedDuration, Timestamp};
use stride_core::{
    models::{RoadmapDay, RoadmapRequest},
    store::{NewGoal, WriteBatch},
    ControllerBuilder, DayPlan, Goal, GoalController, GoalError, GoalStore, GoalSummary,
    ManualClock, Result, RetryPolicy, Roadmap, RoadmapService, SqliteStore,
};
use tempfile::TempDir;

/// Generator double producing `tasks_per_day` tasks named `d{day}t{i}`.
pub struct FakeService {
    pub tasks_per_day: usize,
    pub calls: AtomicU32,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            tasks_per_day: 2,
            calls: AtomicU32::new(0),
        }
    }
}

impl RoadmapService for FakeService {
    async fn generate_roadmap(&self, request: &RoadmapRequest) -> Result<Roadmap> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(Roadmap {
            title: request.goal.clone(),
            duration_days: request.days,
            days: (1..=request.days)
                .map(|day| RoadmapDay {
                    day,
                    tasks: (0..self.tasks_per_day)
                        .map(|i| format!("d{day}t{i}"))
                        .collect(),
                })
                .collect(),
        })
    }
}

/// Store wrapper that injects failures into writes.
///
/// Each counter is the number of upcoming calls that fail with a transient
/// error; `u32::MAX` fails every call.
pub struct FlakyStore {
    inner: SqliteStore,
    pub update_failures: AtomicU32,
    pub batch_failures: AtomicU32,
    /// Committed just ahead of the next conditional batch, standing in for
    /// another session that wins the race
    interleaved: Mutex<Option<WriteBatch>>,
}

impl FlakyStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            update_failures: AtomicU32::new(0),
            batch_failures: AtomicU32::new(0),
            interleaved: Mutex::new(None),
        }
    }

    /// Commits `batch` right before the next batch that carries a
    /// precondition.
    pub fn commit_before_next_conditional(&self, batch: WriteBatch) {
        *self.interleaved.lock().unwrap() = Some(batch);
    }

    pub fn fail_updates(&self, count: u32) {
        self.update_failures.store(count, Ordering::SeqCst);
    }

    pub fn fail_batches(&self, count: u32) {
        self.batch_failures.store(count, Ordering::SeqCst);
    }

    fn should_fail(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                u32::MAX => Some(u32::MAX),
                n => Some(n - 1),
            })
            .is_ok()
    }
}

impl GoalStore for FlakyStore {
    fn create_goal(&self, user_id: &str, new_goal: &NewGoal) -> Result<(Goal, Vec<DayPlan>)> {
        self.inner.create_goal(user_id, new_goal)
    }

    fn get_goal(&self, user_id: &str, goal_id: u64) -> Result<Option<Goal>> {
        self.inner.get_goal(user_id, goal_id)
    }

    fn list_goals(&self, user_id: &str) -> Result<Vec<GoalSummary>> {
        self.inner.list_goals(user_id)
    }

    fn delete_goal(&self, user_id: &str, goal_id: u64) -> Result<bool> {
        self.inner.delete_goal(user_id, goal_id)
    }

    fn get_day(&self, user_id: &str, goal_id: u64, day: u32) -> Result<Option<DayPlan>> {
        self.inner.get_day(user_id, goal_id, day)
    }

    fn get_days(&self, user_id: &str, goal_id: u64) -> Result<Vec<DayPlan>> {
        self.inner.get_days(user_id, goal_id)
    }

    fn update_day(
        &self,
        user_id: &str,
        goal_id: u64,
        day: u32,
        mutate: &mut dyn FnMut(&mut DayPlan) -> Result<()>,
    ) -> Result<DayPlan> {
        if Self::should_fail(&self.update_failures) {
            return Err(GoalError::transient("store unavailable"));
        }
        self.inner.update_day(user_id, goal_id, day, mutate)
    }

    fn apply_batch(
        &self,
        user_id: &str,
        goal_id: u64,
        batch: &WriteBatch,
    ) -> Result<Option<Goal>> {
        if Self::should_fail(&self.batch_failures) {
            return Err(GoalError::transient("store unavailable"));
        }
        if batch.precondition.is_some() {
            let competing = self.interleaved.lock().unwrap().take();
            if let Some(competing) = competing {
                self.inner.apply_batch(user_id, goal_id, &competing)?;
            }
        }
        self.inner.apply_batch(user_id, goal_id, batch)
    }
}

pub struct TestEnv {
    pub dir: TempDir,
    pub clock: Arc<ManualClock>,
    pub store: Arc<FlakyStore>,
    pub controller: Arc<GoalController<FakeService>>,
}

impl TestEnv {
    pub fn next_day(&self) {
        self.clock.advance(SignedDuration::from_hours(24));
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.clock.advance(SignedDuration::from_mins(minutes));
    }

    /// Another session for the same user over the same store and clock.
    pub async fn second_controller(&self) -> Arc<GoalController<FakeService>> {
        Arc::new(build_controller(self.store.clone(), self.clock.clone()).await)
    }

    pub async fn create_goal(&self, days: u32) -> Goal {
        self.controller
            .generate_goal_with_roadmap(&stride_core::CreateGoal {
                title: "Practice piano".to_string(),
                days,
            })
            .await
            .expect("Failed to generate goal")
            .expect("Generation was dropped")
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
        multiplier: 2.0,
    }
}

async fn build_controller(
    store: Arc<FlakyStore>,
    clock: Arc<ManualClock>,
) -> GoalController<FakeService> {
    ControllerBuilder::new(FakeService::default())
        .with_store(store)
        .with_user("alice")
        .with_clock(clock)
        .with_time_zone(TimeZone::UTC)
        .with_retry_policy(fast_retry())
        .build()
        .await
        .expect("Failed to build controller")
}

/// Builds a controller over a fresh database with the clock at `start`.
pub async fn setup_at(start: Timestamp) -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let sqlite = SqliteStore::open(dir.path().join("stride.db")).expect("Failed to open store");
    let store = Arc::new(FlakyStore::new(sqlite));
    let clock = Arc::new(ManualClock::new(start));
    let controller = build_controller(store.clone(), clock.clone()).await;
    TestEnv {
        dir,
        clock,
        store,
        controller: Arc::new(controller),
    }
}

pub async fn setup() -> TestEnv {
    setup_at("2025-06-02T08:30:00Z".parse().expect("valid timestamp")).await
}
