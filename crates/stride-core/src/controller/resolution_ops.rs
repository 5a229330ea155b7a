//! Missed-day detection and resolution.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::GoalController;
use crate::{
    error::Result,
    models::{Goal, ResolveAction},
    params::ResolveMissedDay,
    progress::{
        detect_missed_day,
        redistribute::validate_response,
        resolution::{
            collect_incomplete_tasks, plan_adjust, plan_adjust_noop, plan_extend,
            plan_mark_completed, plan_skip, redistribution_request,
        },
        MissedDay,
    },
    service::RoadmapService,
    store::{GoalPatch, PendingUpdate, Precondition, WriteBatch},
};

/// Result of a resolution request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolutionOutcome {
    /// The goal as stored after the request
    pub goal: Goal,
    pub action: ResolveAction,
    /// The missed day that was resolved
    pub day: Option<u32>,
    /// False when there was nothing to resolve or another session resolved
    /// the day first
    pub applied: bool,
    /// Incomplete tasks carried forward by ADJUST_ROADMAP
    pub moved_tasks: usize,
}

impl<S> GoalController<S> {
    /// Syncs the goal and returns the day awaiting resolution, detecting
    /// and recording a new one if needed.
    pub async fn check_for_missed_day(&self, goal_id: u64) -> Result<Option<u32>> {
        let goal = self.load_goal(goal_id).await?;
        let (_, missed_day) = self.sync_and_check(goal).await?;
        Ok(missed_day)
    }

    /// Detects against the stored current day as it was before the sync,
    /// so a current day that lapsed unfinished is still caught, then writes
    /// the sync and records what was found.
    pub(super) async fn sync_and_check(&self, goal: Goal) -> Result<(Goal, Option<u32>)> {
        if goal.pending_adjustment {
            let day = goal.last_missed_day;
            let goal = self.sync_loaded(goal).await?;
            return Ok((goal, day));
        }

        let days = self.load_days(goal.id).await?;
        let today = self.derived_day(&goal);
        let detected = detect_missed_day(&goal, &days, today);
        let goal = self.sync_loaded(goal).await?;
        let day = match detected {
            MissedDay::Detected(day) => day,
            other => return Ok((goal, other.day())),
        };

        let goal_id = goal.id;
        let batch = WriteBatch {
            precondition: Some(Precondition::of(&goal)),
            goal: GoalPatch {
                pending: PendingUpdate::Set(day),
                ..Default::default()
            },
            ..Default::default()
        };
        let recorded = self
            .store_call("record missed day", move |store, user| {
                store.apply_batch(user, goal_id, &batch)
            })
            .await?;

        match recorded {
            Some(updated) => {
                info!("goal {goal_id} missed day {day}");
                Ok((updated, Some(day)))
            }
            None => {
                // another session got there first; its record wins
                let current = self.load_goal(goal_id).await?;
                let day = current.last_missed_day.filter(|_| current.pending_adjustment);
                Ok((current, day))
            }
        }
    }
}

impl<S: RoadmapService> GoalController<S> {
    /// Resolves the pending missed day of a goal.
    ///
    /// The action's writes and the clearing of the pending flags commit in
    /// one transaction, conditional on the goal still pending on the same
    /// day. A goal with nothing pending is left untouched.
    pub async fn resolve_skip_action(
        &self,
        goal_id: u64,
        action: ResolveAction,
    ) -> Result<ResolutionOutcome> {
        let goal = self.load_goal(goal_id).await?;
        let Some(missed_day) = goal.last_missed_day.filter(|_| goal.pending_adjustment) else {
            info!("goal {goal_id} has no missed day pending, ignoring {}", action.as_str());
            return Ok(ResolutionOutcome {
                goal,
                action,
                day: None,
                applied: false,
                moved_tasks: 0,
            });
        };

        let days = self.load_days(goal_id).await?;
        let mut moved_tasks = 0;
        let batch = match action {
            ResolveAction::Skip => plan_skip(&goal, missed_day),
            ResolveAction::MarkCompleted => plan_mark_completed(&goal, &days, missed_day)?,
            ResolveAction::Extend => plan_extend(&goal),
            ResolveAction::AdjustRoadmap => {
                let incomplete = collect_incomplete_tasks(&goal, &days, missed_day);
                if incomplete.is_empty() {
                    plan_adjust_noop(&goal)
                } else {
                    moved_tasks = incomplete.len();
                    let request = redistribution_request(&goal, &days, incomplete);
                    let response = self
                        .retry
                        .run("redistribute tasks", || {
                            self.service.redistribute_tasks(&request)
                        })
                        .await?;
                    validate_response(&request, &response)?;

                    let offered = request.incomplete_tasks.len()
                        + request
                            .remaining_days
                            .iter()
                            .map(|d| d.tasks.len())
                            .sum::<usize>();
                    let placed: usize = response.days.iter().map(|d| d.tasks.len()).sum();
                    if placed < offered {
                        warn!(
                            "goal {goal_id}: {} tasks did not fit into the remaining days",
                            offered - placed
                        );
                    }
                    plan_adjust(&goal, missed_day, &response)
                }
            }
        };

        let applied = self
            .store_call("resolve missed day", move |store, user| {
                store.apply_batch(user, goal_id, &batch)
            })
            .await;
        self.forget(goal_id);

        match applied? {
            Some(updated) => {
                info!("goal {goal_id} resolved day {missed_day} with {}", action.as_str());
                Ok(ResolutionOutcome {
                    goal: updated,
                    action,
                    day: Some(missed_day),
                    applied: true,
                    moved_tasks,
                })
            }
            None => {
                info!("goal {goal_id} day {missed_day} was resolved concurrently");
                Ok(ResolutionOutcome {
                    goal: self.load_goal(goal_id).await?,
                    action,
                    day: Some(missed_day),
                    applied: false,
                    moved_tasks: 0,
                })
            }
        }
    }

    /// Parses and applies a resolution request from an interface.
    pub async fn resolve_missed_day(&self, params: &ResolveMissedDay) -> Result<ResolutionOutcome> {
        let action = params.action()?;
        self.resolve_skip_action(params.goal_id, action).await
    }
}
