//! Goal creation, listing, deletion and day sync.

use log::{info, warn};

use super::{guard::InFlightGuard, GoalController};
use crate::{
    error::Result,
    models::{DayPlan, Goal, GoalSummary, RoadmapRequest},
    params::{CreateGoal, Id},
    service::RoadmapService,
    store::{GoalPatch, NewGoal, WriteBatch},
};

impl<S: RoadmapService> GoalController<S> {
    /// Generates a roadmap for a new goal and persists the goal with all of
    /// its day plans.
    ///
    /// Only one generation runs at a time per controller. A request made
    /// while another is in flight is dropped and returns `Ok(None)`; the
    /// in-flight request is unaffected.
    ///
    /// # Errors
    ///
    /// * `GoalError::InvalidInput` - title or duration out of bounds
    /// * `GoalError::NotAuthenticated` - no user is signed in
    /// * `GoalError::Generation` - the generator failed or its payload is
    ///   unusable; nothing is written
    pub async fn generate_goal_with_roadmap(&self, params: &CreateGoal) -> Result<Option<Goal>> {
        params.validate()?;
        let user = self.require_user()?;

        let Some(_guard) = InFlightGuard::acquire(&self.generating) else {
            info!("roadmap generation already in flight, dropping duplicate request");
            return Ok(None);
        };

        let request = RoadmapRequest {
            goal: params.title.trim().to_string(),
            days: params.days,
        };
        let roadmap = self
            .retry
            .run("generate roadmap", || self.service.generate_roadmap(&request))
            .await?;
        roadmap.validate()?;

        if roadmap.duration_days != params.days {
            warn!(
                "generator returned {} days for a {}-day request",
                roadmap.duration_days, params.days
            );
        }

        let new_goal = NewGoal {
            title: request.goal,
            duration_days: roadmap.duration_days,
            created_at: self.clock.now(),
            days: roadmap.days.into_iter().map(|day| day.tasks).collect(),
        };

        // not retried: a repeat could create the goal twice
        let (goal, _days) = self
            .store_once(move |store, user| store.create_goal(user, &new_goal))
            .await?;
        info!("created goal {} for {user} with {} days", goal.id, goal.duration_days);
        Ok(Some(goal))
    }
}

impl<S> GoalController<S> {
    /// Retrieves a goal by its ID.
    pub async fn get_goal(&self, params: &Id) -> Result<Option<Goal>> {
        let goal_id = params.id;
        self.store_call("get goal", move |store, user| store.get_goal(user, goal_id))
            .await
    }

    /// Retrieves a goal together with all of its day plans.
    pub async fn get_goal_with_days(&self, params: &Id) -> Result<Option<(Goal, Vec<DayPlan>)>> {
        let Some(goal) = self.get_goal(params).await? else {
            return Ok(None);
        };
        let days = self.load_days(goal.id).await?;
        Ok(Some((goal, days)))
    }

    /// Lists the signed-in user's goals with progress counts.
    pub async fn list_goals(&self) -> Result<Vec<GoalSummary>> {
        self.store_call("list goals", |store, user| store.list_goals(user))
            .await
    }

    /// Permanently deletes a goal and its day plans. Returns whether a goal
    /// was deleted.
    pub async fn delete_goal(&self, params: &Id) -> Result<bool> {
        let goal_id = params.id;
        let deleted = self
            .store_call("delete goal", move |store, user| {
                store.delete_goal(user, goal_id)
            })
            .await?;
        self.forget(goal_id);
        Ok(deleted)
    }

    /// Raises the stored `current_day` to the calendar-derived day.
    ///
    /// Never lowers it: a goal completed ahead of the calendar keeps its
    /// progress.
    pub async fn sync_current_day(&self, goal_id: u64) -> Result<Goal> {
        let goal = self.load_goal(goal_id).await?;
        self.sync_loaded(goal).await
    }

    pub(super) async fn sync_loaded(&self, goal: Goal) -> Result<Goal> {
        let derived = self.derived_day(&goal);
        if derived <= goal.current_day {
            return Ok(goal);
        }

        let goal_id = goal.id;
        let batch = WriteBatch {
            goal: GoalPatch {
                advance_current_day_to: Some(derived),
                ..Default::default()
            },
            ..Default::default()
        };
        let updated = self
            .store_call("sync current day", move |store, user| {
                store.apply_batch(user, goal_id, &batch)
            })
            .await?;
        self.forget(goal_id);
        info!("goal {goal_id} advanced from day {} to {derived}", goal.current_day);
        Ok(updated.unwrap_or(goal))
    }
}
