//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for taskdag using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `init`: Initialize a new taskdag tracker
//! - `info`: Show tracker information
//! - `create`: Create a new task
//! - `list`: List tasks with optional filters
//! - `show`: Show task details
//! - `update`: Update an existing task
//! - `delete`: Delete a task
//! - `dep`: Manage dependencies between tasks
//! - `graph`: Export the dependency graph
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! taskdag create "Write parser" --deps task-ab3f
//! taskdag list --status pending
//! taskdag update task-ab3f --status completed
//! taskdag dep check task-c2d1 task-ab3f
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

// Re-export argument structs
pub use args::{
    CreateArgs, DeleteArgs, DepAction, DepArgs, GraphArgs, InfoArgs, InitArgs, ListArgs, ShowArgs,
    UpdateArgs,
};

// Re-export types
pub use types::TaskStatusArg;

// Re-export validators for external use
pub use validators::{validate_description, validate_prefix, validate_task_id, validate_title};

/// Taskdag - A dependency-aware task tracker
///
/// Track tasks and the dependencies between them using JSONL storage.
/// Tasks are stored in `.taskdag/tasks.jsonl` for easy version control integration.
#[derive(Parser, Debug)]
#[command(name = "taskdag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new taskdag tracker
    ///
    /// Creates the `.taskdag/` directory with configuration and an empty task
    /// database. Run this once in your project root to start tracking tasks.
    Init(InitArgs),

    /// Show tracker information
    ///
    /// Displays database path, task prefix, and summary statistics.
    Info(InfoArgs),

    /// Create a new task
    ///
    /// Creates a new task with the given title and optional dependencies.
    /// A task created with incomplete dependencies starts as pending.
    Create(CreateArgs),

    /// List tasks with optional filters
    ///
    /// Shows all tasks matching the filter criteria, newest first.
    List(ListArgs),

    /// Show detailed information about a task
    ///
    /// Displays all fields of a task including its dependencies and the
    /// tasks that depend on it.
    Show(ShowArgs),

    /// Update an existing task
    ///
    /// Modifies one or more fields. Only provided fields are updated.
    /// Setting the status to completed or blocked re-derives the status
    /// of dependent tasks.
    Update(UpdateArgs),

    /// Delete a task permanently
    ///
    /// Removes a task from the database. Tasks that others depend on cannot
    /// be deleted. Use `--force` to skip confirmation.
    Delete(DeleteArgs),

    /// Manage dependencies between tasks
    ///
    /// Add, remove, check, or list dependency edges. Adding an edge that
    /// would close a cycle is rejected with the offending path.
    Dep(DepArgs),

    /// Export the dependency graph
    ///
    /// Prints every task and dependency edge, for visualization or scripting.
    Graph(GraphArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Info(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_info(&app, args, output_mode).await
            }
            Some(Commands::Create(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_create(&mut app, args, output_mode).await
            }
            Some(Commands::List(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_list(&app, args, output_mode).await
            }
            Some(Commands::Show(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_show(&app, args, output_mode).await
            }
            Some(Commands::Update(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_update(&mut app, args, output_mode).await
            }
            Some(Commands::Delete(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_delete(&mut app, args, output_mode).await
            }
            Some(Commands::Dep(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_dep(&mut app, args, output_mode).await
            }
            Some(Commands::Graph(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_graph(&app, args, output_mode).await
            }
            None => {
                println!("Taskdag dependency-aware task tracker");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
