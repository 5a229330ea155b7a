//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use stride_core::{
    params as core, CreateResult, GoalDetail, GoalSummaries, MissedDayReport, OperationStatus,
};

use super::errors::to_mcp_error;
use crate::cli::Controller;

/// MCP wrapper for core parameter types.
///
/// Core params only derive `JsonSchema` behind the `schema` feature; the
/// transparent wrapper forwards both the schema and deserialization to the
/// wrapped type so tools can take them directly.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type CreateGoal = McpParams<core::CreateGoal>;
pub type ToggleTask = McpParams<core::ToggleTask>;
pub type ResolveMissedDay = McpParams<core::ResolveMissedDay>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(body: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        body.to_string(),
    )]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    controller: Arc<Controller>,
}

impl McpHandlers {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self { controller }
    }

    pub async fn create_goal(&self, Parameters(params): Parameters<CreateGoal>) -> McpResult {
        debug!("create_goal: {:?}", params);

        let created = self
            .controller
            .generate_goal_with_roadmap(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create goal", &e))?;

        match created {
            Some(goal) => text(CreateResult::new(goal)),
            None => text(OperationStatus::failure(
                "A roadmap is already being generated. Wait for it and list goals again.",
            )),
        }
    }

    pub async fn list_goals(&self) -> McpResult {
        debug!("list_goals");

        let summaries = GoalSummaries(
            self.controller
                .list_goals()
                .await
                .map_err(|e| to_mcp_error("Failed to list goals", &e))?,
        );

        if summaries.is_empty() {
            text(summaries)
        } else {
            text(format!("# Goals\n\n{summaries}"))
        }
    }

    pub async fn show_goal(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_goal: {:?}", params);

        let (goal, days) = self
            .controller
            .get_goal_with_days(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get goal", &e))?
            .ok_or_else(|| {
                ErrorData::resource_not_found(
                    format!("Goal with ID {} not found", params.as_ref().id),
                    None,
                )
            })?;

        text(GoalDetail { goal, days })
    }

    pub async fn today(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("today: {:?}", params);

        let view = self
            .controller
            .today(params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to load today's plan", &e))?;
        text(view)
    }

    pub async fn toggle_task(&self, Parameters(params): Parameters<ToggleTask>) -> McpResult {
        debug!("toggle_task: {:?}", params);

        let plan = self
            .controller
            .toggle_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to toggle task", &e))?;
        text(plan)
    }

    pub async fn complete_day(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("complete_day: {:?}", params);

        let goal = self
            .controller
            .complete_day(params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to complete day", &e))?;

        let status = OperationStatus::success(format!(
            "Completed day {} of goal {}.",
            goal.current_day - 1,
            goal.id
        ));
        text(format!("{status}\n{goal}"))
    }

    pub async fn check_missed_day(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("check_missed_day: {:?}", params);

        let goal_id = params.as_ref().id;
        let missed_day = self
            .controller
            .check_for_missed_day(goal_id)
            .await
            .map_err(|e| to_mcp_error("Failed to check for missed days", &e))?;
        text(MissedDayReport {
            goal_id,
            missed_day,
        })
    }

    pub async fn resolve_missed_day(
        &self,
        Parameters(params): Parameters<ResolveMissedDay>,
    ) -> McpResult {
        debug!("resolve_missed_day: {:?}", params);

        let outcome = self
            .controller
            .resolve_missed_day(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to resolve missed day", &e))?;
        text(outcome)
    }
}
