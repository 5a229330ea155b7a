//! Observable view state for one goal's screen.
//!
//! A [`GoalSession`] publishes [`ViewState`] snapshots through a
//! `tokio::sync::watch` channel. Mutations update the published view first
//! and then confirm with the controller:
//!
//! - toggles are rolled back to the pre-toggle view if the write fails
//! - day completion is not rolled back; a failure replaces the view with an
//!   error state
//!
//! In both cases the error is also returned to the caller.

use std::sync::Arc;

use log::warn;
use tokio::sync::watch;

use crate::{
    controller::{GoalController, ResolutionOutcome, TodayView},
    error::{ErrorKind, GoalError, Result},
    models::{DayStatus, ResolveAction},
    params::ToggleTask,
    service::RoadmapService,
};

/// What a screen shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Success(T),
    Error {
        /// Fixed user-facing message for the error kind
        message: String,
        kind: ErrorKind,
    },
}

impl<T> ViewState<T> {
    fn from_error(error: &GoalError) -> Self {
        ViewState::Error {
            message: error.user_message(),
            kind: error.kind(),
        }
    }

    /// The loaded value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            ViewState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// View model for the today screen of a single goal.
pub struct GoalSession<S> {
    controller: Arc<GoalController<S>>,
    goal_id: u64,
    state: watch::Sender<ViewState<TodayView>>,
}

impl<S: RoadmapService> GoalSession<S> {
    /// Creates a session in the loading state. Call [`Self::refresh`] to
    /// load the view.
    pub fn new(controller: Arc<GoalController<S>>, goal_id: u64) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self {
            controller,
            goal_id,
            state,
        }
    }

    pub fn goal_id(&self) -> u64 {
        self.goal_id
    }

    /// Receives every published view state.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<TodayView>> {
        self.state.subscribe()
    }

    /// The currently published state.
    pub fn current(&self) -> ViewState<TodayView> {
        self.state.borrow().clone()
    }

    fn loaded(&self) -> Result<TodayView> {
        self.state.borrow().value().cloned().ok_or_else(|| {
            GoalError::invalid_input("goal_id")
                .with_reason(format!("goal {} is not loaded", self.goal_id))
        })
    }

    /// Reloads the view from the controller (sync, missed-day check and
    /// today's plan).
    pub async fn refresh(&self) -> Result<()> {
        self.state.send_replace(ViewState::Loading);
        match self.controller.today(self.goal_id).await {
            Ok(view) => {
                self.state.send_replace(ViewState::Success(view));
                Ok(())
            }
            Err(e) => {
                self.state.send_replace(ViewState::from_error(&e));
                Err(e)
            }
        }
    }

    /// Flips a task locally, then persists it. Restores the previous view
    /// if persisting fails.
    pub async fn toggle_task(&self, index: usize) -> Result<()> {
        let previous = self.loaded()?;
        let mut optimistic = previous.clone();
        let task = optimistic
            .plan
            .as_mut()
            .and_then(|plan| plan.tasks.get_mut(index))
            .ok_or_else(|| {
                GoalError::integrity(format!("task index {index} out of range for today"))
            })?;
        task.is_completed = !task.is_completed;
        self.state.send_replace(ViewState::Success(optimistic));

        let params = ToggleTask {
            goal_id: self.goal_id,
            index,
        };
        match self.controller.toggle_task(&params).await {
            Ok(plan) => {
                self.state.send_modify(|state| {
                    if let ViewState::Success(view) = state {
                        view.plan = Some(plan);
                    }
                });
                Ok(())
            }
            Err(e) => {
                warn!("toggle of task {index} failed, restoring previous view: {e}");
                self.state.send_replace(ViewState::Success(previous));
                Err(e)
            }
        }
    }

    /// Advances the view to the next day, then persists the completion.
    /// A failure leaves an error state for the caller to retry from.
    pub async fn complete_day(&self) -> Result<()> {
        let mut optimistic = self.loaded()?;
        optimistic.goal.current_day += 1;
        if let Some(plan) = optimistic.plan.as_mut() {
            plan.status = DayStatus::Completed;
        }
        self.state.send_replace(ViewState::Success(optimistic));

        match self.controller.complete_day(self.goal_id).await {
            Ok(_) => self.refresh().await,
            Err(e) => {
                self.state.send_replace(ViewState::from_error(&e));
                Err(e)
            }
        }
    }

    /// Resolves the pending missed day and reloads the view.
    pub async fn resolve(&self, action: ResolveAction) -> Result<ResolutionOutcome> {
        self.state.send_replace(ViewState::Loading);
        match self.controller.resolve_skip_action(self.goal_id, action).await {
            Ok(outcome) => {
                self.refresh().await?;
                Ok(outcome)
            }
            Err(e) => {
                self.state.send_replace(ViewState::from_error(&e));
                Err(e)
            }
        }
    }
}
