//! Planning of missed-day resolutions.
//!
//! Each action turns a snapshot of the goal and its day plans into a
//! [`WriteBatch`]. The batch carries a precondition on the snapshot and
//! always clears the pending flags, so applying it twice is harmless: the
//! second attempt finds the goal no longer pending and writes nothing.

use crate::{
    error::{GoalError, Result},
    models::{
        resolution::EXTEND_DAYS, DayPlan, DayStatus, Goal, RedistributionRequest,
        RedistributionResponse, RoadmapDay, Task,
    },
    store::{DayWrite, GoalPatch, PendingUpdate, Precondition, WriteBatch},
};

fn clearing_batch(goal: &Goal, days: Vec<DayWrite>) -> WriteBatch {
    WriteBatch {
        precondition: Some(Precondition::of(goal)),
        days,
        goal: GoalPatch {
            pending: PendingUpdate::Clear,
            ..Default::default()
        },
    }
}

fn find_day(days: &[DayPlan], goal_id: u64, day: u32) -> Result<&DayPlan> {
    days.iter()
        .find(|plan| plan.day == day)
        .ok_or(GoalError::DayNotFound { goal_id, day })
}

/// SKIP: only the missed day's status changes.
pub fn plan_skip(goal: &Goal, missed_day: u32) -> WriteBatch {
    clearing_batch(goal, vec![DayWrite::status(missed_day, DayStatus::Skipped)])
}

/// MARK_COMPLETED: every task of the missed day is ticked off.
pub fn plan_mark_completed(goal: &Goal, days: &[DayPlan], missed_day: u32) -> Result<WriteBatch> {
    let plan = find_day(days, goal.id, missed_day)?;
    let tasks = plan
        .tasks
        .iter()
        .map(|task| Task {
            description: task.description.clone(),
            is_completed: true,
        })
        .collect();
    Ok(clearing_batch(
        goal,
        vec![DayWrite::replace(missed_day, tasks, DayStatus::Completed)],
    ))
}

/// EXTEND (legacy): three more empty days, no task movement.
pub fn plan_extend(goal: &Goal) -> WriteBatch {
    let first_new = goal.duration_days + 1;
    let days = (first_new..first_new + EXTEND_DAYS)
        .map(|day| DayWrite::replace(day, Vec::new(), DayStatus::Pending))
        .collect();
    let mut batch = clearing_batch(goal, days);
    batch.goal.add_duration_days = EXTEND_DAYS;
    batch
}

/// Incomplete task descriptions of days `[missed_day, current_day)` that are
/// not completed, in day order then in-day order.
pub fn collect_incomplete_tasks(goal: &Goal, days: &[DayPlan], missed_day: u32) -> Vec<String> {
    (missed_day..goal.current_day)
        .filter_map(|day| days.iter().find(|plan| plan.day == day))
        .filter(|plan| plan.status != DayStatus::Completed)
        .flat_map(|plan| plan.incomplete_descriptions().map(String::from))
        .collect()
}

/// Builds the redistribution request for days `current_day..=duration_days`.
pub fn redistribution_request(
    goal: &Goal,
    days: &[DayPlan],
    incomplete_tasks: Vec<String>,
) -> RedistributionRequest {
    let remaining_days: Vec<RoadmapDay> = (goal.current_day..=goal.duration_days)
        .filter_map(|day| days.iter().find(|plan| plan.day == day))
        .map(|plan| RoadmapDay {
            day: plan.day,
            tasks: plan
                .tasks
                .iter()
                .map(|task| task.description.clone())
                .collect(),
        })
        .collect();

    RedistributionRequest {
        total_remaining_days: remaining_days.len() as u32,
        remaining_days,
        incomplete_tasks,
    }
}

/// ADJUST_ROADMAP with nothing to move: only the pending flags clear.
pub fn plan_adjust_noop(goal: &Goal) -> WriteBatch {
    clearing_batch(goal, Vec::new())
}

/// ADJUST_ROADMAP: writes the redistributed days with fresh completion flags
/// and marks `[missed_day, current_day)` skipped.
///
/// Only days present in `response` are rewritten. A remaining day the
/// redistribution left empty is omitted from the response, so its stored
/// tasks survive unchanged even when those tasks were also packed into an
/// earlier day. Such a day can end up listing tasks that appear again
/// elsewhere in the roadmap.
pub fn plan_adjust(goal: &Goal, missed_day: u32, response: &RedistributionResponse) -> WriteBatch {
    let redistributed = response.days.iter().map(|day| {
        DayWrite::replace(
            day.day,
            day.tasks.iter().map(Task::new).collect(),
            DayStatus::Pending,
        )
    });
    let skipped =
        (missed_day..goal.current_day).map(|day| DayWrite::status(day, DayStatus::Skipped));

    clearing_batch(goal, redistributed.chain(skipped).collect())
}
