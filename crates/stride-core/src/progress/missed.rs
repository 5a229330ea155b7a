//! Missed-day detection.

use crate::models::{DayPlan, DayStatus, Goal};

/// Outcome of a missed-day scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissedDay {
    /// A decision is already outstanding for this day; nothing was scanned
    Pending(u32),
    /// A newly detected missed day the caller should persist
    Detected(u32),
    /// The user is on track
    OnTrack,
}

impl MissedDay {
    /// The day awaiting resolution, if any.
    pub fn day(&self) -> Option<u32> {
        match self {
            MissedDay::Pending(day) | MissedDay::Detected(day) => Some(*day),
            MissedDay::OnTrack => None,
        }
    }
}

fn find_day(days: &[DayPlan], day: u32) -> Option<&DayPlan> {
    days.iter().find(|plan| plan.day == day)
}

/// Finds at most one day that has calendar-elapsed without completion.
///
/// The earliest unresolved day before `current_day` with an incomplete task
/// wins. Failing that, the current day itself is missed when the calendar
/// has moved past it and it is not completed.
pub fn detect_missed_day(goal: &Goal, days: &[DayPlan], today: u32) -> MissedDay {
    if goal.pending_adjustment {
        return goal
            .last_missed_day
            .map_or(MissedDay::OnTrack, MissedDay::Pending);
    }

    let backlog = (1..goal.current_day)
        .filter_map(|day| find_day(days, day))
        .find(|plan| !plan.status.is_resolved() && plan.has_incomplete_task());
    if let Some(plan) = backlog {
        return MissedDay::Detected(plan.day);
    }

    if today > goal.current_day {
        if let Some(plan) = find_day(days, goal.current_day) {
            if plan.status != DayStatus::Completed {
                return MissedDay::Detected(goal.current_day);
            }
        }
    }

    MissedDay::OnTrack
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::Task;

    fn goal(duration_days: u32, current_day: u32) -> Goal {
        let now = Timestamp::now();
        Goal {
            id: 1,
            user_id: "alice".into(),
            title: "Learn piano".into(),
            duration_days,
            current_day,
            created_at: now,
            updated_at: now,
            pending_adjustment: false,
            last_missed_day: None,
        }
    }

    fn day(day: u32, done: &[bool], status: DayStatus) -> DayPlan {
        DayPlan {
            goal_id: 1,
            day,
            tasks: done
                .iter()
                .enumerate()
                .map(|(i, &is_completed)| Task {
                    description: format!("task {day}.{i}"),
                    is_completed,
                })
                .collect(),
            status,
        }
    }

    #[test]
    fn test_pending_goal_returns_stored_day_without_scanning() {
        let mut goal = goal(5, 4);
        goal.pending_adjustment = true;
        goal.last_missed_day = Some(3);
        // day 1 is also unresolved, but the stored decision wins
        let days = vec![day(1, &[false], DayStatus::Pending)];

        assert_eq!(detect_missed_day(&goal, &days, 4), MissedDay::Pending(3));
        assert_eq!(detect_missed_day(&goal, &days, 5), MissedDay::Pending(3));
    }

    #[test]
    fn test_earliest_backlog_day_wins() {
        let goal = goal(5, 4);
        let days = vec![
            day(1, &[true, true], DayStatus::Completed),
            day(2, &[true, false], DayStatus::Pending),
            day(3, &[false, false], DayStatus::Pending),
            day(4, &[false, false], DayStatus::Pending),
        ];
        assert_eq!(detect_missed_day(&goal, &days, 4), MissedDay::Detected(2));
    }

    #[test]
    fn test_resolved_days_are_not_missed() {
        let goal = goal(5, 4);
        let days = vec![
            day(1, &[false], DayStatus::Skipped),
            day(2, &[false], DayStatus::Completed),
            day(3, &[true, true], DayStatus::Pending),
            day(4, &[false], DayStatus::Pending),
        ];
        assert_eq!(detect_missed_day(&goal, &days, 4), MissedDay::OnTrack);
    }

    #[test]
    fn test_current_day_lapses_when_calendar_moves_on() {
        let goal = goal(5, 2);
        let days = vec![
            day(1, &[true], DayStatus::Completed),
            day(2, &[true, true], DayStatus::Pending),
        ];
        assert_eq!(detect_missed_day(&goal, &days, 3), MissedDay::Detected(2));
        assert_eq!(detect_missed_day(&goal, &days, 2), MissedDay::OnTrack);
    }

    #[test]
    fn test_untouched_first_day_after_absence() {
        // stored pointer never advanced; the calendar is on day 4
        let goal = goal(5, 1);
        let days: Vec<_> = (1..=5)
            .map(|d| day(d, &[false, false], DayStatus::Pending))
            .collect();
        assert_eq!(detect_missed_day(&goal, &days, 4), MissedDay::Detected(1));

        // same absence after the pointer was synced forward
        let synced = Goal {
            current_day: 4,
            ..goal
        };
        assert_eq!(detect_missed_day(&synced, &days, 4), MissedDay::Detected(1));
    }

    #[test]
    fn test_missed_day_accessor() {
        assert_eq!(MissedDay::Pending(2).day(), Some(2));
        assert_eq!(MissedDay::Detected(3).day(), Some(3));
        assert_eq!(MissedDay::OnTrack.day(), None);
    }
}
