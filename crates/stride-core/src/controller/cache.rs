//! Bounded cache of the last-read day plan per goal.

use std::collections::{HashMap, VecDeque};

use crate::models::DayPlan;

/// Remembers the most recently read or written day plan of each goal.
///
/// Holds at most `capacity` goals and evicts the least recently stored one.
/// Every write that can change a goal's days must invalidate its entry.
#[derive(Debug)]
pub struct DayPlanCache {
    capacity: usize,
    entries: HashMap<u64, DayPlan>,
    order: VecDeque<u64>,
}

impl DayPlanCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// The cached plan for `day` of `goal_id`, if that is the one held.
    pub fn get(&self, goal_id: u64, day: u32) -> Option<&DayPlan> {
        self.entries.get(&goal_id).filter(|plan| plan.day == day)
    }

    pub fn put(&mut self, plan: DayPlan) {
        if self.capacity == 0 {
            return;
        }
        let goal_id = plan.goal_id;
        self.order.retain(|id| *id != goal_id);
        self.order.push_back(goal_id);
        self.entries.insert(goal_id, plan);

        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }

    pub fn invalidate(&mut self, goal_id: u64) {
        self.entries.remove(&goal_id);
        self.order.retain(|id| *id != goal_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
