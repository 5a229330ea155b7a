//! Stride CLI Application
//!
//! Command-line interface and MCP server for the stride goal tracker.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::{Cli, Controller};
use log::info;
use mcp::{run_stdio_server, StrideMcpServer};
use renderer::TerminalRenderer;
use stride_core::{CommandRoadmapService, ControllerBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        user,
        generator,
        generator_args,
        generator_timeout,
        delegate_redistribution,
        no_color,
        command,
    } = Args::parse();

    let service = generator.map(|program| {
        CommandRoadmapService::new(program)
            .with_args(generator_args)
            .with_timeout(generator_timeout.map(Duration::from_secs))
            .with_delegated_redistribution(delegate_redistribution)
    });

    let mut builder = ControllerBuilder::new(service).with_database_path(database_file);
    if let Some(user) = user {
        builder = builder.with_user(user);
    }
    let controller: Controller = builder
        .build()
        .await
        .context("Failed to initialize goal controller")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Stride started");

    match command {
        Some(Goal { command }) => {
            Cli::new(controller, renderer)
                .handle_goal_command(command)
                .await
        }
        Some(Today(args)) => Cli::new(controller, renderer).today(&args.into()).await,
        Some(Toggle(args)) => {
            Cli::new(controller, renderer)
                .toggle_task(&args.into())
                .await
        }
        Some(Complete(args)) => {
            Cli::new(controller, renderer)
                .complete_day(&args.into())
                .await
        }
        Some(Check(args)) => {
            Cli::new(controller, renderer)
                .check_missed_day(&args.into())
                .await
        }
        Some(Resolve(args)) => {
            Cli::new(controller, renderer)
                .resolve_missed_day(&args.into())
                .await
        }
        Some(Serve) => {
            info!("Starting Stride MCP server");
            run_stdio_server(StrideMcpServer::new(controller))
                .await
                .context("MCP server failed")
        }
        None => Cli::new(controller, renderer).list_goals().await,
    }
}
