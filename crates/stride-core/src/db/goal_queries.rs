//! Goal CRUD operations and batch writes.

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension, TransactionBehavior};

use crate::{
    error::{DatabaseResultExt, GoalError, Result},
    models::{DayPlan, DayStatus, Goal, GoalSummary, Task},
    store::{DayWrite, NewGoal, PendingUpdate, WriteBatch},
};

const INSERT_GOAL_SQL: &str = "INSERT INTO goals (user_id, title, duration_days, current_day, pending_adjustment, last_missed_day, created_at, updated_at) VALUES (?1, ?2, ?3, 1, 0, NULL, ?4, ?5)";
const INSERT_DAY_SQL: &str = "INSERT INTO day_plans (goal_id, day, tasks, completed, status, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_GOAL_SQL: &str = "SELECT id, user_id, title, duration_days, current_day, pending_adjustment, last_missed_day, created_at, updated_at FROM goals WHERE id = ?1 AND user_id = ?2";
const UPDATE_GOAL_SQL: &str = "UPDATE goals SET duration_days = ?1, current_day = ?2, pending_adjustment = ?3, last_missed_day = ?4, updated_at = ?5 WHERE id = ?6 AND user_id = ?7";
const SELECT_SUMMARIES_SQL: &str = "SELECT id, title, duration_days, current_day, created_at, pending_adjustment, completed_days, skipped_days, pending_days FROM goal_summaries WHERE user_id = ?1 ORDER BY id";
const DELETE_GOAL_DAYS_SQL: &str =
    "DELETE FROM day_plans WHERE goal_id = (SELECT id FROM goals WHERE id = ?1 AND user_id = ?2)";
const DELETE_GOAL_SQL: &str = "DELETE FROM goals WHERE id = ?1 AND user_id = ?2";
const UPSERT_DAY_SQL: &str = "INSERT INTO day_plans (goal_id, day, tasks, completed, status, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT (goal_id, day) DO UPDATE SET tasks = excluded.tasks, completed = excluded.completed, status = excluded.status, updated_at = excluded.updated_at";
const UPDATE_DAY_STATUS_SQL: &str =
    "UPDATE day_plans SET status = ?1, updated_at = ?2 WHERE goal_id = ?3 AND day = ?4";

fn parse_timestamp(row: &rusqlite::Row, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

impl super::Database {
    /// Helper function to construct a Goal from a database row
    fn build_goal_from_row(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
        Ok(Goal {
            id: row.get::<_, i64>(0)? as u64,
            user_id: row.get(1)?,
            title: row.get(2)?,
            duration_days: row.get(3)?,
            current_day: row.get(4)?,
            pending_adjustment: row.get(5)?,
            last_missed_day: row.get(6)?,
            created_at: parse_timestamp(row, 7)?,
            updated_at: parse_timestamp(row, 8)?,
        })
    }

    /// Reads a goal through any connection or open transaction.
    pub(super) fn select_goal(
        conn: &Connection,
        user_id: &str,
        goal_id: u64,
    ) -> Result<Option<Goal>> {
        conn.query_row(
            SELECT_GOAL_SQL,
            params![goal_id as i64, user_id],
            Self::build_goal_from_row,
        )
        .optional()
        .db_context("Failed to get goal")
    }

    /// Creates a goal and one pending day plan per roadmap day in a single
    /// transaction.
    pub fn create_goal(&mut self, user_id: &str, new_goal: &NewGoal) -> Result<(Goal, Vec<DayPlan>)> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_GOAL_SQL,
            params![
                user_id,
                new_goal.title,
                new_goal.duration_days,
                new_goal.created_at.to_string(),
                &now_str
            ],
        )
        .db_context("Failed to insert goal")?;

        let id = tx.last_insert_rowid() as u64;

        let mut days = Vec::with_capacity(new_goal.days.len());
        for (index, descriptions) in new_goal.days.iter().enumerate() {
            let day = index as u32 + 1;
            let tasks: Vec<Task> = descriptions.iter().map(Task::new).collect();
            let (tasks_json, completed_json) = Self::encode_tasks(&tasks)?;
            tx.execute(
                INSERT_DAY_SQL,
                params![
                    id as i64,
                    day,
                    tasks_json,
                    completed_json,
                    DayStatus::Pending.as_str(),
                    &now_str
                ],
            )
            .db_context("Failed to insert day plan")?;
            days.push(DayPlan {
                goal_id: id,
                day,
                tasks,
                status: DayStatus::Pending,
            });
        }

        tx.commit().db_context("Failed to commit transaction")?;

        let goal = Goal {
            id,
            user_id: user_id.to_string(),
            title: new_goal.title.clone(),
            duration_days: new_goal.duration_days,
            current_day: 1,
            created_at: new_goal.created_at,
            updated_at: now,
            pending_adjustment: false,
            last_missed_day: None,
        };
        Ok((goal, days))
    }

    /// Gets a goal by ID.
    pub fn get_goal(&self, user_id: &str, goal_id: u64) -> Result<Option<Goal>> {
        Self::select_goal(&self.connection, user_id, goal_id)
    }

    /// Lists all goals of a user with day-status counts.
    pub fn list_goals(&self, user_id: &str) -> Result<Vec<GoalSummary>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SUMMARIES_SQL)
            .db_context("Failed to prepare goal listing")?;

        let summaries = stmt
            .query_map(params![user_id], |row| {
                Ok(GoalSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    title: row.get(1)?,
                    duration_days: row.get(2)?,
                    current_day: row.get(3)?,
                    created_at: parse_timestamp(row, 4)?,
                    pending_adjustment: row.get(5)?,
                    completed_days: row.get(6)?,
                    skipped_days: row.get(7)?,
                    pending_days: row.get(8)?,
                })
            })
            .db_context("Failed to query goals")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read goal rows")?;

        Ok(summaries)
    }

    /// Deletes a goal and all its day plans. Returns false if the goal did
    /// not exist.
    pub fn delete_goal(&mut self, user_id: &str, goal_id: u64) -> Result<bool> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(DELETE_GOAL_DAYS_SQL, params![goal_id as i64, user_id])
            .db_context("Failed to delete day plans")?;
        let deleted = tx
            .execute(DELETE_GOAL_SQL, params![goal_id as i64, user_id])
            .db_context("Failed to delete goal")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(deleted > 0)
    }

    /// Applies a write batch atomically. Returns `None` without writing
    /// anything when the batch precondition no longer holds.
    pub fn apply_batch(
        &mut self,
        user_id: &str,
        goal_id: u64,
        batch: &WriteBatch,
    ) -> Result<Option<Goal>> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let goal = Self::select_goal(&tx, user_id, goal_id)?
            .ok_or(GoalError::GoalNotFound { id: goal_id })?;

        if let Some(precondition) = &batch.precondition {
            if !precondition.holds(&goal) {
                return Ok(None);
            }
        }

        let now = Timestamp::now();
        let now_str = now.to_string();

        for write in &batch.days {
            Self::write_day(&tx, goal_id, write, &now_str)?;
        }

        let patch = &batch.goal;
        let mut current_day = goal.current_day;
        if let Some(target) = patch.advance_current_day_to {
            current_day = current_day.max(target);
        }
        if patch.increment_current_day {
            current_day += 1;
        }
        let duration_days = goal.duration_days + patch.add_duration_days;
        let (pending_adjustment, last_missed_day) = match patch.pending {
            PendingUpdate::Keep => (goal.pending_adjustment, goal.last_missed_day),
            PendingUpdate::Set(day) => (true, Some(day)),
            PendingUpdate::Clear => (false, None),
        };

        tx.execute(
            UPDATE_GOAL_SQL,
            params![
                duration_days,
                current_day,
                pending_adjustment,
                last_missed_day,
                &now_str,
                goal_id as i64,
                user_id
            ],
        )
        .db_context("Failed to update goal")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Some(Goal {
            duration_days,
            current_day,
            pending_adjustment,
            last_missed_day,
            updated_at: now,
            ..goal
        }))
    }

    fn write_day(conn: &Connection, goal_id: u64, write: &DayWrite, now: &str) -> Result<()> {
        match &write.tasks {
            Some(tasks) => {
                let (tasks_json, completed_json) = Self::encode_tasks(tasks)?;
                conn.execute(
                    UPSERT_DAY_SQL,
                    params![
                        goal_id as i64,
                        write.day,
                        tasks_json,
                        completed_json,
                        write.status.as_str(),
                        now
                    ],
                )
                .db_context("Failed to write day plan")?;
            }
            None => {
                let updated = conn
                    .execute(
                        UPDATE_DAY_STATUS_SQL,
                        params![write.status.as_str(), now, goal_id as i64, write.day],
                    )
                    .db_context("Failed to update day status")?;
                if updated == 0 {
                    return Err(GoalError::DayNotFound {
                        goal_id,
                        day: write.day,
                    });
                }
            }
        }
        Ok(())
    }
}
