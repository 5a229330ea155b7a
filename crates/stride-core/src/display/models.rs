//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so the models stay plain data.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{DayPlan, DayStatus, Goal, GoalSummary, ResolveAction, Task};

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ResolveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_completed { 'x' } else { ' ' };
        write!(f, "[{mark}] {}", self.description)
    }
}

impl fmt::Display for DayPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## Day {} ({}) {}/{}",
            self.day,
            self.status.with_icon(),
            self.completed_count(),
            self.tasks.len()
        )?;
        writeln!(f)?;

        if self.tasks.is_empty() {
            writeln!(f, "No tasks for this day.")?;
        }
        // indices match the ones `toggle` expects
        for (index, task) in self.tasks.iter().enumerate() {
            let mark = if task.is_completed { 'x' } else { ' ' };
            writeln!(f, "- [{mark}] {index}. {}", task.description)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        if self.is_finished() {
            writeln!(f, "- Progress: finished all {} days", self.duration_days)?;
        } else {
            writeln!(
                f,
                "- Progress: day {} of {}",
                self.current_day, self.duration_days
            )?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let (true, Some(day)) = (self.pending_adjustment, self.last_missed_day) {
            writeln!(f)?;
            writeln!(
                f,
                "> Day {day} was missed. Resolve it with skip, complete, adjust or extend."
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for GoalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} (ID: {}) day {}/{}",
            self.title,
            self.id,
            self.current_day.min(self.duration_days),
            self.duration_days
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Days**: {} completed, {} skipped, {} open",
            self.completed_days, self.skipped_days, self.pending_days
        )?;
        if self.pending_adjustment {
            writeln!(f, "- **Missed day awaiting resolution**")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}
