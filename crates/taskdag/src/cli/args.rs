//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::{Parser, Subcommand};

use super::types::TaskStatusArg;
use super::validators::{validate_description, validate_prefix, validate_task_id, validate_title};

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Task id prefix (e.g., "proj" for "proj-ab3f")
    ///
    /// Must be 2-20 alphanumeric characters. This prefix is used for all
    /// task ids in this tracker.
    #[arg(short, long, value_parser = validate_prefix)]
    pub prefix: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug, Clone, Default)]
pub struct InfoArgs {}

/// Arguments for the `create` command
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// Task title (maximum 200 characters)
    #[arg(value_parser = validate_title)]
    pub title: String,

    /// Detailed description
    #[arg(short = 'D', long, value_parser = validate_description)]
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    #[arg(short, long, value_enum)]
    pub status: Option<TaskStatusArg>,

    /// Dependencies (comma-separated task ids the new task depends on)
    #[arg(long, value_delimiter = ',', value_parser = validate_task_id)]
    pub deps: Vec<String>,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<TaskStatusArg>,

    /// Maximum number of tasks to display
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Task ids to display
    #[arg(required = true, value_parser = validate_task_id)]
    pub task_ids: Vec<String>,
}

/// Arguments for the `update` command
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Task id to update
    #[arg(value_parser = validate_task_id)]
    pub task_id: String,

    /// New title (maximum 200 characters)
    #[arg(long, value_parser = validate_title)]
    pub title: Option<String>,

    /// New description
    #[arg(short = 'D', long, value_parser = validate_description)]
    pub description: Option<String>,

    /// New status
    ///
    /// Moving a task to completed or blocked re-derives the status of
    /// every task depending on it.
    #[arg(short, long, value_enum)]
    pub status: Option<TaskStatusArg>,
}

/// Arguments for the `delete` command
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Task id to delete
    #[arg(value_parser = validate_task_id)]
    pub task_id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `dep` command
#[derive(Parser, Debug, Clone)]
pub struct DepArgs {
    /// Dependency subcommand
    #[command(subcommand)]
    pub action: DepAction,
}

/// Dependency management actions
#[derive(Subcommand, Debug, Clone)]
pub enum DepAction {
    /// Add a dependency (the first task depends on the second)
    Add {
        /// Task that depends on another
        #[arg(value_parser = validate_task_id)]
        from: String,

        /// Task being depended on
        #[arg(value_parser = validate_task_id)]
        to: String,
    },

    /// Remove a dependency
    Remove {
        /// Task that depends on another
        #[arg(value_parser = validate_task_id)]
        from: String,

        /// Task being depended on
        #[arg(value_parser = validate_task_id)]
        to: String,
    },

    /// Check whether adding a dependency would create a cycle
    Check {
        /// Task that would depend on another
        #[arg(value_parser = validate_task_id)]
        from: String,

        /// Task that would be depended on
        #[arg(value_parser = validate_task_id)]
        to: String,
    },

    /// List dependencies for a task
    List {
        /// Task id
        #[arg(value_parser = validate_task_id)]
        task_id: String,

        /// Show reverse dependencies (tasks that depend on this one)
        #[arg(short, long)]
        reverse: bool,
    },
}

/// Arguments for the `graph` command
#[derive(Parser, Debug, Clone, Default)]
pub struct GraphArgs {}
