//! Task redistribution across the remaining days of a goal.

use std::collections::VecDeque;

use crate::{
    error::{GoalError, Result},
    models::{RedistributionRequest, RedistributionResponse, RoadmapDay},
};

/// Maximum number of tasks a redistributed day may hold.
pub const MAX_TASKS_PER_DAY: usize = 4;

/// Re-deals the remaining days' tasks followed by the incomplete tasks.
///
/// The flat queue is chunked into groups of at most four in order, one group
/// per remaining day. Overflow fills days still under four left to right;
/// tasks beyond `4 × remaining days` are not placed. Days left empty are
/// omitted from the response.
pub fn redistribute(request: &RedistributionRequest) -> RedistributionResponse {
    let mut queue: VecDeque<String> = request
        .remaining_days
        .iter()
        .flat_map(|day| day.tasks.iter().cloned())
        .chain(request.incomplete_tasks.iter().cloned())
        .collect();

    let mut days: Vec<RoadmapDay> = request
        .remaining_days
        .iter()
        .map(|day| {
            let take = queue.len().min(MAX_TASKS_PER_DAY);
            RoadmapDay {
                day: day.day,
                tasks: queue.drain(..take).collect(),
            }
        })
        .collect();

    while !queue.is_empty() {
        let mut placed = false;
        for day in &mut days {
            if day.tasks.len() < MAX_TASKS_PER_DAY {
                if let Some(task) = queue.pop_front() {
                    day.tasks.push(task);
                    placed = true;
                }
            }
        }
        if !placed {
            break;
        }
    }

    days.retain(|day| !day.tasks.is_empty());
    RedistributionResponse { days }
}

/// Checks a delegated redistribution against the request it answers.
pub fn validate_response(
    request: &RedistributionRequest,
    response: &RedistributionResponse,
) -> Result<()> {
    let mut seen = Vec::with_capacity(response.days.len());
    for day in &response.days {
        if !request.remaining_days.iter().any(|r| r.day == day.day) {
            return Err(GoalError::invalid_input("days").with_reason(format!(
                "redistribution placed tasks on day {} outside the remaining days",
                day.day
            )));
        }
        if seen.contains(&day.day) {
            return Err(GoalError::invalid_input("days")
                .with_reason(format!("redistribution lists day {} twice", day.day)));
        }
        if day.tasks.len() > MAX_TASKS_PER_DAY {
            return Err(GoalError::invalid_input("days").with_reason(format!(
                "redistribution gave day {} {} tasks (max {MAX_TASKS_PER_DAY})",
                day.day,
                day.tasks.len()
            )));
        }
        seen.push(day.day);
    }
    Ok(())
}
