use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{GoalCommands, GoalIdArgs, ResolveArgs, ToggleArgs};

/// Command-line interface for the Stride goal tracker
///
/// Stride turns a goal into a day-by-day roadmap of small tasks and keeps
/// your progress in step with the calendar. When days slip by unfinished it
/// asks how to resolve them: skip the day, mark it done anyway, or move the
/// leftover tasks forward. Run `stride serve` to expose the same operations
/// to AI assistants over MCP (Model Context Protocol).
#[derive(Parser)]
#[command(version, about, name = "stride")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/stride/stride.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// User whose goals are read and written
    #[arg(long, global = true, env = "STRIDE_USER")]
    pub user: Option<String>,

    /// Program that generates roadmaps; reads a JSON request on stdin and
    /// prints the roadmap JSON on stdout
    #[arg(long, global = true, env = "STRIDE_GENERATOR")]
    pub generator: Option<String>,

    /// Extra argument for the generator program (repeatable)
    #[arg(long = "generator-arg", global = true, allow_hyphen_values = true)]
    pub generator_args: Vec<String>,

    /// Seconds to wait for the generator before giving up
    #[arg(long, global = true, value_name = "SECONDS")]
    pub generator_timeout: Option<u64>,

    /// Ask the generator to rebalance tasks too, instead of doing it locally
    #[arg(long, global = true)]
    pub delegate_redistribution: bool,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Stride CLI
///
/// `goal` groups goal management; the remaining commands act on a single
/// goal's current day. Running without a command lists your goals.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage goals
    #[command(alias = "g")]
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Show today's tasks for a goal
    #[command(alias = "t")]
    Today(GoalIdArgs),
    /// Toggle one of today's tasks between done and not done
    #[command(alias = "x")]
    Toggle(ToggleArgs),
    /// Mark today as completed and move on to the next day
    #[command(alias = "c")]
    Complete(GoalIdArgs),
    /// Check a goal for a missed day
    Check(GoalIdArgs),
    /// Resolve a goal's missed day
    #[command(alias = "r")]
    Resolve(ResolveArgs),
    /// Start the MCP server
    Serve,
}
