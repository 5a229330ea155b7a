//! Command-line argument wrappers and command handlers.
//!
//! Each clap argument struct converts into the matching core parameter type
//! with `From`, so clap attributes never leak into `stride_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → GoalController
//! ```
//!
//! [`Cli`] runs one command against the controller and renders the
//! markdown result through the [`TerminalRenderer`].

use std::{fmt, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use log::debug;
use stride_core::{
    params::{CreateGoal, Id, ResolveMissedDay, ToggleTask},
    CommandRoadmapService, CreateResult, DeleteResult, GoalController, GoalDetail, GoalSession,
    GoalSummaries, MissedDayReport, OperationStatus, ViewState,
};

use crate::renderer::TerminalRenderer;

/// Controller type used by the binary: generation is only available when a
/// generator program is configured.
pub type Controller = GoalController<Option<CommandRoadmapService>>;

/// Default roadmap length for `goal new`.
const DEFAULT_DAYS: u32 = 30;

/// Create a goal from a generated roadmap
///
/// Sends the title and number of days to the configured generator and stores
/// the returned roadmap as a new goal starting today.
#[derive(Args)]
pub struct NewGoalArgs {
    /// What you want to achieve
    pub title: String,
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_DAYS,
        help = "Number of days the roadmap should span (1-365)"
    )]
    pub days: u32,
}

impl From<NewGoalArgs> for CreateGoal {
    fn from(val: NewGoalArgs) -> Self {
        CreateGoal {
            title: val.title,
            days: val.days,
        }
    }
}

/// Any command addressing a single goal
#[derive(Args)]
pub struct GoalIdArgs {
    #[arg(help = "Unique identifier of the goal")]
    pub id: u64,
}

impl From<GoalIdArgs> for Id {
    fn from(val: GoalIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Delete a goal permanently
#[derive(Args)]
pub struct DeleteGoalArgs {
    #[arg(help = "Unique identifier of the goal to permanently delete")]
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

/// Toggle a task of today's plan
///
/// The index is the number shown before each task by `stride today`.
#[derive(Args)]
pub struct ToggleArgs {
    #[arg(help = "Unique identifier of the goal")]
    pub id: u64,
    #[arg(help = "0-based index of the task in today's plan")]
    pub index: usize,
}

impl From<ToggleArgs> for ToggleTask {
    fn from(val: ToggleArgs) -> Self {
        ToggleTask {
            goal_id: val.id,
            index: val.index,
        }
    }
}

/// Resolve the goal's pending missed day
#[derive(Args)]
pub struct ResolveArgs {
    #[arg(help = "Unique identifier of the goal")]
    pub id: u64,
    #[arg(value_enum, help = "How to resolve the missed day")]
    pub action: ResolveActionArg,
}

impl From<ResolveArgs> for ResolveMissedDay {
    fn from(val: ResolveArgs) -> Self {
        ResolveMissedDay {
            goal_id: val.id,
            action: val.action.to_string(),
        }
    }
}

/// Command-line representation of the resolution actions
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ResolveActionArg {
    /// Mark the missed day skipped and keep going
    Skip,
    /// Count the missed day as done
    Complete,
    /// Move the unfinished tasks into the remaining days
    Adjust,
    /// Add three days to the goal
    Extend,
}

impl fmt::Display for ResolveActionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveActionArg::Skip => write!(f, "skip"),
            ResolveActionArg::Complete => write!(f, "complete"),
            ResolveActionArg::Adjust => write!(f, "adjust"),
            ResolveActionArg::Extend => write!(f, "extend"),
        }
    }
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a goal from a generated roadmap
    #[command(alias = "n")]
    New(NewGoalArgs),
    /// List your goals with their progress
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a goal with its whole roadmap
    #[command(alias = "s")]
    Show(GoalIdArgs),
    /// Delete a goal permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteGoalArgs),
}

/// Runs commands against the controller and renders their output.
pub struct Cli {
    controller: Arc<Controller>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(controller: Controller, renderer: TerminalRenderer) -> Self {
        Self {
            controller: Arc::new(controller),
            renderer,
        }
    }

    pub async fn handle_goal_command(&self, command: GoalCommands) -> Result<()> {
        match command {
            GoalCommands::New(args) => self.create_goal(&args.into()).await,
            GoalCommands::List => self.list_goals().await,
            GoalCommands::Show(args) => self.show_goal(&args.into()).await,
            GoalCommands::Delete(args) => self.delete_goal(args).await,
        }
    }

    pub async fn create_goal(&self, params: &CreateGoal) -> Result<()> {
        debug!("create_goal: {:?}", params);
        let created = self
            .controller
            .generate_goal_with_roadmap(params)
            .await
            .context("Failed to create goal")?;

        match created {
            Some(goal) => self.renderer.render(&CreateResult::new(goal).to_string()),
            None => self.renderer.render(
                &OperationStatus::failure("A roadmap is already being generated").to_string(),
            ),
        }
    }

    pub async fn list_goals(&self) -> Result<()> {
        let summaries = GoalSummaries(
            self.controller
                .list_goals()
                .await
                .context("Failed to list goals")?,
        );

        if summaries.is_empty() {
            self.renderer.render(&summaries.to_string())
        } else {
            self.renderer.render(&format!("# Goals\n\n{summaries}"))
        }
    }

    pub async fn show_goal(&self, params: &Id) -> Result<()> {
        let (goal, days) = self
            .controller
            .get_goal_with_days(params)
            .await
            .context("Failed to get goal")?
            .with_context(|| format!("Goal with ID {} not found", params.id))?;

        self.renderer.render(&GoalDetail { goal, days }.to_string())
    }

    pub async fn delete_goal(&self, args: DeleteGoalArgs) -> Result<()> {
        if !args.confirm {
            let status = OperationStatus::failure(format!(
                "Deleting goal {} cannot be undone. Re-run with --confirm to proceed.",
                args.id
            ));
            return self.renderer.render(&status.to_string());
        }

        let params = Id { id: args.id };
        let goal = self
            .controller
            .get_goal(&params)
            .await
            .context("Failed to get goal")?
            .with_context(|| format!("Goal with ID {} not found", args.id))?;
        self.controller
            .delete_goal(&params)
            .await
            .context("Failed to delete goal")?;

        self.renderer.render(&DeleteResult::new(goal).to_string())
    }

    pub async fn today(&self, params: &Id) -> Result<()> {
        let view = self
            .controller
            .today(params.id)
            .await
            .context("Failed to load today's plan")?;
        self.renderer.render(&view.to_string())
    }

    /// Toggles through a session so the rendered view is the confirmed one.
    pub async fn toggle_task(&self, params: &ToggleTask) -> Result<()> {
        let session = GoalSession::new(Arc::clone(&self.controller), params.goal_id);
        session
            .refresh()
            .await
            .context("Failed to load today's plan")?;
        session
            .toggle_task(params.index)
            .await
            .context("Failed to toggle task")?;
        self.render_session(&session)
    }

    pub async fn complete_day(&self, params: &Id) -> Result<()> {
        let session = GoalSession::new(Arc::clone(&self.controller), params.id);
        session
            .refresh()
            .await
            .context("Failed to load today's plan")?;
        session
            .complete_day()
            .await
            .context("Failed to complete day")?;
        self.render_session(&session)
    }

    pub async fn check_missed_day(&self, params: &Id) -> Result<()> {
        let missed_day = self
            .controller
            .check_for_missed_day(params.id)
            .await
            .context("Failed to check for missed days")?;
        let report = MissedDayReport {
            goal_id: params.id,
            missed_day,
        };
        self.renderer.render(&report.to_string())
    }

    pub async fn resolve_missed_day(&self, params: &ResolveMissedDay) -> Result<()> {
        debug!("resolve_missed_day: {:?}", params);
        let outcome = self
            .controller
            .resolve_missed_day(params)
            .await
            .context("Failed to resolve missed day")?;
        self.renderer.render(&outcome.to_string())
    }

    fn render_session(&self, session: &GoalSession<Option<CommandRoadmapService>>) -> Result<()> {
        match session.current() {
            ViewState::Success(view) => self.renderer.render(&view.to_string()),
            ViewState::Error { message, .. } => {
                self.renderer.render(&OperationStatus::failure(message).to_string())
            }
            ViewState::Loading => Ok(()),
        }
    }
}
