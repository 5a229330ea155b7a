//! Task toggling, day completion and the today view.

use std::sync::OnceLock;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::GoalController;
use crate::{
    error::{GoalError, Result},
    models::{DayPlan, DayStatus, Goal},
    params::ToggleTask,
    store::{DayWrite, GoalPatch, Precondition, WriteBatch},
};

/// Everything a client needs to render a goal's current day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodayView {
    /// The goal after syncing and missed-day detection
    pub goal: Goal,
    /// Calendar-derived day number
    pub today: u32,
    /// Plan of the calendar-derived day, if stored
    pub plan: Option<DayPlan>,
    /// Day awaiting resolution, if any
    pub missed_day: Option<u32>,
}

impl<S> GoalController<S> {
    /// Gets one day plan, served from the cache when possible.
    pub async fn get_day(&self, goal_id: u64, day: u32) -> Result<Option<DayPlan>> {
        let cached = self.cache().get(goal_id, day).cloned();
        if cached.is_some() {
            return Ok(cached);
        }

        let plan = self
            .store_call("get day", move |store, user| {
                store.get_day(user, goal_id, day)
            })
            .await?;
        if let Some(plan) = &plan {
            self.remember(plan);
        }
        Ok(plan)
    }

    /// Syncs the goal to the calendar, checks for a missed day and loads
    /// today's plan.
    pub async fn today(&self, goal_id: u64) -> Result<TodayView> {
        let goal = self.load_goal(goal_id).await?;
        let (goal, missed_day) = self.sync_and_check(goal).await?;
        let today = self.derived_day(&goal);
        let plan = self.get_day(goal_id, today).await?;
        Ok(TodayView {
            goal,
            today,
            plan,
            missed_day,
        })
    }

    /// Flips one task of the calendar-derived current day.
    ///
    /// The flip is a read-modify-write inside a single store transaction.
    /// The target value is fixed by the first attempt, so a retried
    /// attempt can never flip the task back.
    ///
    /// # Errors
    ///
    /// * `GoalError::InvalidInput` - a missed day awaits resolution
    /// * `GoalError::DataIntegrity` - `index` is out of bounds
    /// * `GoalError::DayNotFound` - today's plan does not exist
    pub async fn toggle_task(&self, params: &ToggleTask) -> Result<DayPlan> {
        let goal_id = params.goal_id;
        let index = params.index;
        let goal = self.load_goal(goal_id).await?;
        require_resolved(&goal)?;
        let day = self.derived_day(&goal);

        let target = OnceLock::new();
        let plan = self
            .store_call("toggle task", move |store, user| {
                store.update_day(user, goal_id, day, &mut |plan: &mut DayPlan| {
                    let count = plan.tasks.len();
                    let task = plan.tasks.get_mut(index).ok_or_else(|| {
                        GoalError::integrity(format!(
                            "task index {index} out of range for day {day} ({count} tasks)"
                        ))
                    })?;
                    let value = *target.get_or_init(|| !task.is_completed);
                    task.is_completed = value;
                    Ok(())
                })
            })
            .await?;

        debug!("toggled task {index} of goal {goal_id} day {day}");
        self.remember(&plan);
        Ok(plan)
    }

    /// Marks the stored current day completed and moves to the next day.
    ///
    /// Both writes share one transaction conditional on `current_day`, so a
    /// retry after an ambiguous failure cannot increment twice.
    ///
    /// # Errors
    ///
    /// * `GoalError::InvalidInput` - every day is already behind the goal,
    ///   or a missed day awaits resolution
    /// * `GoalError::DataIntegrity` - the goal moved on concurrently
    pub async fn complete_day(&self, goal_id: u64) -> Result<Goal> {
        let goal = self.load_goal(goal_id).await?;
        require_resolved(&goal)?;
        if goal.is_finished() {
            return Err(GoalError::invalid_input("goal_id")
                .with_reason(format!("goal {goal_id} has no days left to complete")));
        }

        let day = goal.current_day;
        let batch = WriteBatch {
            precondition: Some(Precondition::of(&goal)),
            days: vec![DayWrite::status(day, DayStatus::Completed)],
            goal: GoalPatch {
                increment_current_day: true,
                ..Default::default()
            },
        };
        let applied = self
            .store_call("complete day", move |store, user| {
                store.apply_batch(user, goal_id, &batch)
            })
            .await;
        self.forget(goal_id);

        match applied? {
            Some(updated) => {
                info!("goal {goal_id} completed day {day}");
                Ok(updated)
            }
            None => {
                let current = self.load_goal(goal_id).await?;
                let completed = self
                    .get_day(goal_id, day)
                    .await?
                    .is_some_and(|plan| plan.status == DayStatus::Completed);
                if current.current_day == day + 1 && completed {
                    // an earlier attempt committed before reporting failure
                    Ok(current)
                } else {
                    Err(GoalError::integrity(format!(
                        "goal {goal_id} changed while completing day {day}"
                    )))
                }
            }
        }
    }
}

/// Progress is frozen while a missed day is pending.
fn require_resolved(goal: &Goal) -> Result<()> {
    match goal.last_missed_day.filter(|_| goal.pending_adjustment) {
        Some(day) => Err(GoalError::invalid_input("goal_id").with_reason(format!(
            "day {day} of goal {} was missed; resolve it before continuing",
            goal.id
        ))),
        None => Ok(()),
    }
}
