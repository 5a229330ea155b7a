//! MCP server implementation for Stride
//!
//! Exposes goal tracking over the Model Context Protocol so AI assistants
//! can create roadmaps, check off tasks and resolve missed days for the
//! configured user.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

use crate::cli::Controller;

pub mod errors;
pub mod handlers;

pub use handlers::{CreateGoal, Id, McpResult, ResolveMissedDay, ToggleTask};

/// MCP server for Stride
#[derive(Clone)]
pub struct StrideMcpServer {
    controller: Arc<Controller>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl StrideMcpServer {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Arc::new(controller),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(Arc::clone(&self.controller))
    }

    #[tool(
        name = "create_goal",
        description = "Create a goal with a generated day-by-day roadmap. Provide a title describing what the user wants to achieve and days (1-365) for the roadmap length. The goal starts today on day 1. Returns the new goal ID."
    )]
    async fn create_goal(&self, params: Parameters<CreateGoal>) -> McpResult {
        self.handlers().create_goal(params).await
    }

    #[tool(
        name = "list_goals",
        description = "List the user's goals with their current day and how many days are completed, skipped and still open. Goals with a missed day awaiting resolution are flagged."
    )]
    async fn list_goals(&self) -> McpResult {
        self.handlers().list_goals().await
    }

    #[tool(
        name = "show_goal",
        description = "Show a goal with its whole roadmap: every day's date, status and tasks with their completion marks."
    )]
    async fn show_goal(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_goal(params).await
    }

    #[tool(
        name = "today",
        description = "Bring a goal up to today's calendar day and show today's tasks. Task numbers in the output are the indices toggle_task expects. Also reports a missed day if one needs resolving."
    )]
    async fn today(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().today(params).await
    }

    #[tool(
        name = "toggle_task",
        description = "Flip one of today's tasks between done and not done. Use goal_id and the 0-based task index shown by today. Refused while a missed day awaits resolution."
    )]
    async fn toggle_task(&self, params: Parameters<ToggleTask>) -> McpResult {
        self.handlers().toggle_task(params).await
    }

    #[tool(
        name = "complete_day",
        description = "Mark the goal's current day as completed and advance to the next day. Fails once the last day of the roadmap is done, and while a missed day awaits resolution."
    )]
    async fn complete_day(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().complete_day(params).await
    }

    #[tool(
        name = "check_missed_day",
        description = "Check whether a goal has an earlier day that passed without being completed or skipped. A missed day must be resolved with resolve_missed_day."
    )]
    async fn check_missed_day(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().check_missed_day(params).await
    }

    #[tool(
        name = "resolve_missed_day",
        description = "Resolve the goal's pending missed day. Actions: 'skip' marks the day skipped, 'mark_completed' checks off all its tasks, 'adjust_roadmap' moves its unfinished tasks into the remaining days (at most 4 per day), 'extend' adds three days to the goal."
    )]
    async fn resolve_missed_day(&self, params: Parameters<ResolveMissedDay>) -> McpResult {
        self.handlers().resolve_missed_day(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for StrideMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(r#"Stride helps a user reach a goal through a roadmap of small daily tasks.

## Core Concepts
- **Goal**: a title and a roadmap spanning a fixed number of days
- **Day**: the tasks planned for one calendar day, with status pending, completed or skipped
- **Missed day**: an earlier day that passed while still pending; toggling tasks and completing days are refused until it is resolved

## Daily Workflow
1. Call `today` to sync the goal with the calendar and see today's tasks
2. Use `toggle_task` as tasks get done
3. Call `complete_day` when the day's work is finished

## Handling Missed Days
When `today` or `check_missed_day` reports a missed day, ask the user how to handle it and call `resolve_missed_day` before any further `toggle_task` or `complete_day`:
- `skip`: leave it behind
- `mark_completed`: the user did the work but forgot to record it
- `adjust_roadmap`: carry unfinished tasks into the following days"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: StrideMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Stride MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(reason) => info!("MCP server stopped: {reason:?}"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
