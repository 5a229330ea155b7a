//! Day plan queries and the transactional task update.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::{
    error::{DatabaseResultExt, GoalError, Result},
    models::{DayPlan, DayStatus, Task},
};

const SELECT_DAY_SQL: &str = "SELECT d.day, d.tasks, d.completed, d.status FROM day_plans d JOIN goals g ON g.id = d.goal_id WHERE d.goal_id = ?1 AND g.user_id = ?2 AND d.day = ?3";
const SELECT_DAYS_SQL: &str = "SELECT d.day, d.tasks, d.completed, d.status FROM day_plans d JOIN goals g ON g.id = d.goal_id WHERE d.goal_id = ?1 AND g.user_id = ?2 ORDER BY d.day";
const UPDATE_DAY_SQL: &str = "UPDATE day_plans SET tasks = ?1, completed = ?2, status = ?3, updated_at = ?4 WHERE goal_id = ?5 AND day = ?6";

/// Raw column values of a day plan row, decoded outside the row closure so
/// decoding failures keep their integrity classification.
type RawDay = (u32, String, String, String);

fn read_raw_day(row: &rusqlite::Row) -> rusqlite::Result<RawDay> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

impl super::Database {
    /// Serializes tasks into the parallel `tasks`/`completed` JSON arrays.
    pub(super) fn encode_tasks(tasks: &[Task]) -> Result<(String, String)> {
        let descriptions: Vec<&str> = tasks.iter().map(|t| t.description.as_str()).collect();
        let completed: Vec<bool> = tasks.iter().map(|t| t.is_completed).collect();
        Ok((
            serde_json::to_string(&descriptions)?,
            serde_json::to_string(&completed)?,
        ))
    }

    fn decode_day(goal_id: u64, (day, tasks_json, completed_json, status): RawDay) -> Result<DayPlan> {
        let descriptions: Vec<String> = serde_json::from_str(&tasks_json).map_err(|e| {
            GoalError::integrity(format!("day {day} of goal {goal_id} has malformed tasks: {e}"))
        })?;
        let completed: Vec<bool> = serde_json::from_str(&completed_json).map_err(|e| {
            GoalError::integrity(format!(
                "day {day} of goal {goal_id} has malformed completion flags: {e}"
            ))
        })?;
        if descriptions.len() != completed.len() {
            return Err(GoalError::integrity(format!(
                "day {day} of goal {goal_id} has {} tasks but {} completion flags",
                descriptions.len(),
                completed.len()
            )));
        }
        let status = status
            .parse::<DayStatus>()
            .map_err(|e| GoalError::integrity(format!("day {day} of goal {goal_id}: {e}")))?;

        let tasks = descriptions
            .into_iter()
            .zip(completed)
            .map(|(description, is_completed)| Task {
                description,
                is_completed,
            })
            .collect();

        Ok(DayPlan {
            goal_id,
            day,
            tasks,
            status,
        })
    }

    fn select_day(conn: &Connection, user_id: &str, goal_id: u64, day: u32) -> Result<Option<DayPlan>> {
        conn.query_row(
            SELECT_DAY_SQL,
            params![goal_id as i64, user_id, day],
            read_raw_day,
        )
        .optional()
        .db_context("Failed to get day plan")?
        .map(|raw| Self::decode_day(goal_id, raw))
        .transpose()
    }

    /// Gets a single day plan.
    pub fn get_day(&self, user_id: &str, goal_id: u64, day: u32) -> Result<Option<DayPlan>> {
        Self::select_day(&self.connection, user_id, goal_id, day)
    }

    /// Gets all day plans of a goal ordered by day number.
    pub fn get_days(&self, user_id: &str, goal_id: u64) -> Result<Vec<DayPlan>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DAYS_SQL)
            .db_context("Failed to prepare day plan query")?;

        let rows = stmt
            .query_map(params![goal_id as i64, user_id], read_raw_day)
            .db_context("Failed to query day plans")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read day plan rows")?;

        rows.into_iter()
            .map(|raw| Self::decode_day(goal_id, raw))
            .collect()
    }

    /// Read-modify-write of one day plan inside an immediate transaction.
    ///
    /// If `mutate` fails, nothing is written.
    pub fn update_day(
        &mut self,
        user_id: &str,
        goal_id: u64,
        day: u32,
        mutate: &mut dyn FnMut(&mut DayPlan) -> Result<()>,
    ) -> Result<DayPlan> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let mut plan = Self::select_day(&tx, user_id, goal_id, day)?
            .ok_or(GoalError::DayNotFound { goal_id, day })?;

        mutate(&mut plan)?;

        let (tasks_json, completed_json) = Self::encode_tasks(&plan.tasks)?;
        tx.execute(
            UPDATE_DAY_SQL,
            params![
                tasks_json,
                completed_json,
                plan.status.as_str(),
                Timestamp::now().to_string(),
                goal_id as i64,
                day
            ],
        )
        .db_context("Failed to update day plan")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }
}
