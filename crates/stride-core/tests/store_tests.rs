use std::{sync::Arc, thread};

use jiff::Timestamp;
use rusqlite::Connection;
use stride_core::{store::NewGoal, Database, DayPlan, ErrorKind, GoalStore, SqliteStore};
use tempfile::TempDir;

/// Helper function to create a store in a temporary directory
fn create_test_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteStore::open(temp_dir.path().join("stride.db")).expect("Failed to open store");
    (temp_dir, store)
}

fn new_goal(days: usize, tasks_per_day: usize) -> NewGoal {
    NewGoal {
        title: "Learn knots".to_string(),
        duration_days: days as u32,
        created_at: Timestamp::now(),
        days: (1..=days)
            .map(|d| (0..tasks_per_day).map(|t| format!("day {d} knot {t}")).collect())
            .collect(),
    }
}

#[test]
fn test_database_reopen_keeps_data() {
    let (temp_dir, store) = create_test_store();
    let (goal, _) = store.create_goal("alice", &new_goal(2, 1)).unwrap();

    let reopened = SqliteStore::open(temp_dir.path().join("stride.db")).unwrap();
    let stored = reopened.get_goal("alice", goal.id).unwrap().unwrap();
    assert_eq!(stored, goal);
    assert!(Database::new(reopened.path()).is_ok());
}

#[test]
fn test_malformed_task_array_is_integrity_error() {
    let (_temp_dir, store) = create_test_store();
    let (goal, _) = store.create_goal("alice", &new_goal(2, 2)).unwrap();

    let conn = Connection::open(store.path()).unwrap();
    conn.execute(
        "UPDATE day_plans SET tasks = 'not json' WHERE goal_id = ?1 AND day = 1",
        [goal.id as i64],
    )
    .unwrap();

    let err = store.get_day("alice", goal.id, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    assert!(!err.is_retryable());
    assert!(store.get_day("alice", goal.id, 2).unwrap().is_some());
}

#[test]
fn test_mismatched_completion_array_is_integrity_error() {
    let (_temp_dir, store) = create_test_store();
    let (goal, _) = store.create_goal("alice", &new_goal(1, 3)).unwrap();

    let conn = Connection::open(store.path()).unwrap();
    conn.execute(
        "UPDATE day_plans SET completed = '[true]' WHERE goal_id = ?1",
        [goal.id as i64],
    )
    .unwrap();

    let err = store.get_days("alice", goal.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataIntegrity);
}

#[test]
fn test_concurrent_toggles_do_not_lose_updates() {
    let (_temp_dir, store) = create_test_store();
    let (goal, _) = store.create_goal("alice", &new_goal(1, 8)).unwrap();
    let store = Arc::new(store);
    let goal_id = goal.id;

    let handles: Vec<_> = (0..8)
        .map(|index| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                // separate connections contend for the same row
                let mut attempts = 0;
                loop {
                    let result = store.update_day("alice", goal_id, 1, &mut |plan: &mut DayPlan| {
                        plan.tasks[index].is_completed = !plan.tasks[index].is_completed;
                        Ok(())
                    });
                    match result {
                        Ok(_) => break,
                        Err(e) if e.is_retryable() && attempts < 50 => attempts += 1,
                        Err(e) => panic!("toggle failed: {e}"),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let day = store.get_day("alice", goal.id, 1).unwrap().unwrap();
    assert!(day.tasks.iter().all(|t| t.is_completed));
}
