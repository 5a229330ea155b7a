//! Tests for the controller module.

use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use jiff::{tz::TimeZone, SignedDuration, Timestamp};
use tempfile::TempDir;

use super::*;
use crate::{
    clock::ManualClock,
    error::ErrorKind,
    models::{DayStatus, ResolveAction, Roadmap, RoadmapDay, RoadmapRequest},
    params::{CreateGoal, Id, ToggleTask},
    service::RoadmapService,
};

/// Generator double: two tasks per day, optionally failing first.
#[derive(Default)]
struct FakeService {
    calls: AtomicU32,
    transient_failures: u32,
    reject_first: bool,
    delay: Option<Duration>,
}

impl FakeService {
    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoadmapService for FakeService {
    async fn generate_roadmap(&self, request: &RoadmapRequest) -> Result<Roadmap> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if call < self.transient_failures {
            return Err(GoalError::transient("service unavailable"));
        }
        if self.reject_first && call == 0 {
            return Err(GoalError::generation("request rejected"));
        }
        Ok(Roadmap {
            title: request.goal.clone(),
            duration_days: request.days,
            days: (1..=request.days)
                .map(|day| RoadmapDay {
                    day,
                    tasks: vec![format!("d{day}t0"), format!("d{day}t1")],
                })
                .collect(),
        })
    }
}

fn start() -> Timestamp {
    "2025-03-10T09:00:00Z".parse().unwrap()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        multiplier: 2.0,
    }
}

/// Helper function to create a test controller
async fn create_test_controller(
    service: FakeService,
) -> (TempDir, Arc<ManualClock>, GoalController<FakeService>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let clock = Arc::new(ManualClock::new(start()));
    let controller = ControllerBuilder::new(service)
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_user("alice")
        .with_clock(clock.clone())
        .with_time_zone(TimeZone::UTC)
        .with_retry_policy(fast_retry())
        .build()
        .await
        .expect("Failed to create controller");
    (temp_dir, clock, controller)
}

async fn create_goal(controller: &GoalController<FakeService>, days: u32) -> Goal {
    controller
        .generate_goal_with_roadmap(&CreateGoal {
            title: "Learn Spanish".to_string(),
            days,
        })
        .await
        .expect("Failed to generate goal")
        .expect("Generation was dropped")
}

fn next_day(clock: &ManualClock) {
    clock.advance(SignedDuration::from_hours(24));
}

#[tokio::test]
async fn test_generate_creates_goal_with_days() {
    let (_temp_dir, _clock, controller) = create_test_controller(FakeService::default()).await;

    let goal = create_goal(&controller, 5).await;
    assert_eq!(goal.title, "Learn Spanish");
    assert_eq!(goal.current_day, 1);
    assert_eq!(goal.duration_days, 5);
    assert!(!goal.pending_adjustment);
    assert_eq!(goal.created_at, start());

    let (_, days) = controller
        .get_goal_with_days(&Id { id: goal.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(days.len(), 5);
    assert!(days.iter().all(|d| d.status == DayStatus::Pending && !d.tasks[0].is_completed));
}

#[tokio::test]
async fn test_duplicate_generation_is_dropped() {
    let service = FakeService {
        delay: Some(Duration::from_millis(50)),
        ..Default::default()
    };
    let (_temp_dir, _clock, controller) = create_test_controller(service).await;
    let params = CreateGoal {
        title: "Write a novel".to_string(),
        days: 3,
    };

    let (first, second) = tokio::join!(
        controller.generate_goal_with_roadmap(&params),
        controller.generate_goal_with_roadmap(&params)
    );

    assert!(first.unwrap().is_some());
    assert!(second.unwrap().is_none());
    assert_eq!(controller.service().calls(), 1);
    assert_eq!(controller.list_goals().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_guard_released_after_failure() {
    let service = FakeService {
        reject_first: true,
        ..Default::default()
    };
    let (_temp_dir, _clock, controller) = create_test_controller(service).await;
    let params = CreateGoal {
        title: "Learn to swim".to_string(),
        days: 2,
    };

    let err = controller.generate_goal_with_roadmap(&params).await.unwrap_err();
    assert!(matches!(err, GoalError::Generation { .. }));
    assert!(controller.list_goals().await.unwrap().is_empty());

    assert!(controller.generate_goal_with_roadmap(&params).await.unwrap().is_some());
}

#[tokio::test]
async fn test_transient_generation_failures_are_retried() {
    let service = FakeService {
        transient_failures: 2,
        ..Default::default()
    };
    let (_temp_dir, _clock, controller) = create_test_controller(service).await;

    create_goal(&controller, 2).await;
    assert_eq!(controller.service().calls(), 3);
}

#[tokio::test]
async fn test_invalid_input_never_reaches_generator() {
    let (_temp_dir, _clock, controller) = create_test_controller(FakeService::default()).await;

    for params in [
        CreateGoal {
            title: "   ".to_string(),
            days: 10,
        },
        CreateGoal {
            title: "Climb".to_string(),
            days: 0,
        },
    ] {
        let err = controller.generate_goal_with_roadmap(&params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert_eq!(controller.service().calls(), 0);
}

#[tokio::test]
async fn test_signed_out_controller_refuses_store_calls() {
    let temp_dir = TempDir::new().unwrap();
    let controller = ControllerBuilder::new(FakeService::default())
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .unwrap();

    let err = controller.list_goals().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthenticated);

    let err = controller
        .generate_goal_with_roadmap(&CreateGoal {
            title: "Read more".to_string(),
            days: 3,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
    assert_eq!(controller.service().calls(), 0);
}

#[tokio::test]
async fn test_untouched_first_day_is_missed_after_two_days() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 5).await;

    next_day(&clock);
    next_day(&clock);

    let view = controller.today(goal.id).await.unwrap();
    assert_eq!(view.today, 3);
    assert_eq!(view.goal.current_day, 3);
    assert_eq!(view.missed_day, Some(1));
    assert!(view.goal.pending_adjustment);
    assert_eq!(view.goal.last_missed_day, Some(1));

    // detection is idempotent while the day is pending
    assert_eq!(controller.check_for_missed_day(goal.id).await.unwrap(), Some(1));
    let stored = controller.get_goal(&Id { id: goal.id }).await.unwrap().unwrap();
    assert_eq!(stored.last_missed_day, Some(1));
}

#[tokio::test]
async fn test_on_track_goal_has_no_missed_day() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 3).await;

    controller.complete_day(goal.id).await.unwrap();
    next_day(&clock);

    let view = controller.today(goal.id).await.unwrap();
    assert_eq!(view.missed_day, None);
    assert_eq!(view.plan.unwrap().day, 2);
}

#[tokio::test]
async fn test_adjust_roadmap_moves_incomplete_tasks_forward() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 5).await;

    let toggle = |index| ToggleTask {
        goal_id: goal.id,
        index,
    };
    controller.toggle_task(&toggle(0)).await.unwrap();
    next_day(&clock);
    controller.toggle_task(&toggle(1)).await.unwrap();
    next_day(&clock);

    assert_eq!(controller.check_for_missed_day(goal.id).await.unwrap(), Some(1));
    let outcome = controller
        .resolve_skip_action(goal.id, ResolveAction::AdjustRoadmap)
        .await
        .unwrap();
    assert!(outcome.applied);
    assert_eq!(outcome.day, Some(1));
    assert_eq!(outcome.moved_tasks, 2);
    assert!(!outcome.goal.pending_adjustment);
    assert_eq!(outcome.goal.last_missed_day, None);

    let (_, days) = controller
        .get_goal_with_days(&Id { id: goal.id })
        .await
        .unwrap()
        .unwrap();
    let descriptions = |day: usize| -> Vec<String> {
        days[day - 1]
            .tasks
            .iter()
            .map(|t| t.description.clone())
            .collect()
    };
    assert_eq!(days[0].status, DayStatus::Skipped);
    assert_eq!(days[1].status, DayStatus::Skipped);
    assert_eq!(descriptions(3), vec!["d3t0", "d3t1", "d4t0", "d4t1"]);
    assert_eq!(descriptions(4), vec!["d5t0", "d5t1", "d1t1", "d2t0"]);
    assert!(days[2..4]
        .iter()
        .all(|d| d.status == DayStatus::Pending && d.tasks.iter().all(|t| !t.is_completed)));
    // left empty by the redistribution, so not rewritten
    assert_eq!(descriptions(5), vec!["d5t0", "d5t1"]);

    assert_eq!(controller.check_for_missed_day(goal.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_skip_surfaces_missed_days_one_at_a_time() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 5).await;
    next_day(&clock);
    next_day(&clock);

    assert_eq!(controller.check_for_missed_day(goal.id).await.unwrap(), Some(1));
    let outcome = controller
        .resolve_skip_action(goal.id, ResolveAction::Skip)
        .await
        .unwrap();
    assert!(outcome.applied);

    let day1 = controller.get_day(goal.id, 1).await.unwrap().unwrap();
    assert_eq!(day1.status, DayStatus::Skipped);
    assert_eq!(day1.tasks.len(), 2);
    assert!(day1.tasks.iter().all(|t| !t.is_completed));

    assert_eq!(controller.check_for_missed_day(goal.id).await.unwrap(), Some(2));
}

#[tokio::test]
async fn test_lapsed_current_day_with_ticked_tasks_is_missed() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 3).await;
    for index in 0..2 {
        controller
            .toggle_task(&ToggleTask {
                goal_id: goal.id,
                index,
            })
            .await
            .unwrap();
    }

    // every task ticked but the day never completed
    next_day(&clock);
    assert_eq!(controller.check_for_missed_day(goal.id).await.unwrap(), Some(1));

    let stored = controller.get_goal(&Id { id: goal.id }).await.unwrap().unwrap();
    assert_eq!(stored.current_day, 2);
    assert!(stored.pending_adjustment);
    assert_eq!(stored.last_missed_day, Some(1));
}

#[tokio::test]
async fn test_progress_is_frozen_while_day_is_missed() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 5).await;
    next_day(&clock);
    next_day(&clock);
    assert_eq!(controller.check_for_missed_day(goal.id).await.unwrap(), Some(1));

    let toggle = ToggleTask {
        goal_id: goal.id,
        index: 0,
    };
    let err = controller.toggle_task(&toggle).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("day 1"));
    let err = controller.complete_day(goal.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let stored = controller.get_goal(&Id { id: goal.id }).await.unwrap().unwrap();
    assert_eq!(stored.current_day, 3);
    assert!(stored.pending_adjustment);
    let day3 = controller.get_day(goal.id, 3).await.unwrap().unwrap();
    assert_eq!(day3.status, DayStatus::Pending);
    assert!(day3.tasks.iter().all(|t| !t.is_completed));

    // resolving the missed day unfreezes the goal
    controller
        .resolve_skip_action(goal.id, ResolveAction::Skip)
        .await
        .unwrap();
    let plan = controller.toggle_task(&toggle).await.unwrap();
    assert_eq!(plan.day, 3);
    assert!(plan.tasks[0].is_completed);
}

#[tokio::test]
async fn test_mark_completed_is_idempotent() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 3).await;
    next_day(&clock);

    assert_eq!(controller.check_for_missed_day(goal.id).await.unwrap(), Some(1));
    let first = controller
        .resolve_skip_action(goal.id, ResolveAction::MarkCompleted)
        .await
        .unwrap();
    assert!(first.applied);

    let second = controller
        .resolve_skip_action(goal.id, ResolveAction::MarkCompleted)
        .await
        .unwrap();
    assert!(!second.applied);
    assert_eq!(second.day, None);

    let day1 = controller.get_day(goal.id, 1).await.unwrap().unwrap();
    assert_eq!(day1.status, DayStatus::Completed);
    assert!(day1.tasks.iter().all(|t| t.is_completed));
    assert_eq!(second.goal.current_day, 2);
}

#[tokio::test]
async fn test_extend_appends_empty_days() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 3).await;
    next_day(&clock);
    controller.check_for_missed_day(goal.id).await.unwrap();

    let outcome = controller
        .resolve_skip_action(goal.id, ResolveAction::Extend)
        .await
        .unwrap();
    assert_eq!(outcome.goal.duration_days, 6);

    let (_, days) = controller
        .get_goal_with_days(&Id { id: goal.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(days.len(), 6);
    assert!(days[3..].iter().all(|d| d.tasks.is_empty() && d.status == DayStatus::Pending));
}

#[tokio::test]
async fn test_toggle_is_an_involution() {
    let (_temp_dir, _clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 2).await;
    let params = ToggleTask {
        goal_id: goal.id,
        index: 1,
    };

    let once = controller.toggle_task(&params).await.unwrap();
    assert!(once.tasks[1].is_completed);
    assert!(!once.tasks[0].is_completed);

    let twice = controller.toggle_task(&params).await.unwrap();
    assert!(!twice.tasks[1].is_completed);

    let stored = controller.get_day(goal.id, 1).await.unwrap().unwrap();
    assert_eq!(stored, twice);
}

#[tokio::test]
async fn test_toggle_out_of_range_is_integrity_error() {
    let (_temp_dir, _clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 2).await;

    let err = controller
        .toggle_task(&ToggleTask {
            goal_id: goal.id,
            index: 7,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataIntegrity);

    let day = controller.get_day(goal.id, 1).await.unwrap().unwrap();
    assert!(day.tasks.iter().all(|t| !t.is_completed));
}

#[tokio::test]
async fn test_toggle_targets_calendar_day() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 3).await;
    next_day(&clock);

    let plan = controller
        .toggle_task(&ToggleTask {
            goal_id: goal.id,
            index: 0,
        })
        .await
        .unwrap();
    assert_eq!(plan.day, 2);
}

#[tokio::test]
async fn test_complete_day_advances_past_last_day() {
    let (_temp_dir, _clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 2).await;

    let goal_after = controller.complete_day(goal.id).await.unwrap();
    assert_eq!(goal_after.current_day, 2);
    let goal_after = controller.complete_day(goal.id).await.unwrap();
    assert_eq!(goal_after.current_day, 3);
    assert_eq!(goal_after.clamped_current_day(), 2);

    let err = controller.complete_day(goal.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let (_, days) = controller
        .get_goal_with_days(&Id { id: goal.id })
        .await
        .unwrap()
        .unwrap();
    assert!(days.iter().all(|d| d.status == DayStatus::Completed));
}

#[tokio::test]
async fn test_sync_never_lowers_progress() {
    let (_temp_dir, clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 5).await;

    controller.complete_day(goal.id).await.unwrap();
    controller.complete_day(goal.id).await.unwrap();
    let synced = controller.sync_current_day(goal.id).await.unwrap();
    assert_eq!(synced.current_day, 3);

    next_day(&clock);
    let synced = controller.sync_current_day(goal.id).await.unwrap();
    assert_eq!(synced.current_day, 3);
}

#[tokio::test]
async fn test_resolve_without_pending_day_is_noop() {
    let (_temp_dir, _clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 3).await;

    let outcome = controller
        .resolve_skip_action(goal.id, ResolveAction::Skip)
        .await
        .unwrap();
    assert!(!outcome.applied);
    assert_eq!(outcome.goal, goal);
}

#[tokio::test]
async fn test_delete_goal() {
    let (_temp_dir, _clock, controller) = create_test_controller(FakeService::default()).await;
    let goal = create_goal(&controller, 3).await;
    controller.get_day(goal.id, 1).await.unwrap();

    assert!(controller.delete_goal(&Id { id: goal.id }).await.unwrap());
    assert!(controller.get_goal(&Id { id: goal.id }).await.unwrap().is_none());
    assert!(controller.get_day(goal.id, 1).await.unwrap().is_none());
    assert!(!controller.delete_goal(&Id { id: goal.id }).await.unwrap());

    let err = controller.today(goal.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
