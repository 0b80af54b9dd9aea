//! Domain types for task tracking.
//!
//! This module contains the core domain types for the taskdag tracker:
//! tasks, statuses, dependency edges and the graph export shape used by
//! visualization consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum allowed title length.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Unique identifier for a task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new task ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a task.
///
/// The wire names (`pending`, `in_progress`, `completed`, `blocked`) are a
/// compatibility contract with existing consumers and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting; dependencies not yet satisfied or work not started
    Pending,

    /// Actively being worked on
    InProgress,

    /// Finished. The only status that satisfies a dependency.
    Completed,

    /// Cannot proceed; at least one dependency is blocked
    Blocked,
}

impl TaskStatus {
    /// True for `Completed` or `InProgress` - statuses the propagator never
    /// demotes (finished or active work is left alone unless a dependency
    /// is blocked).
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Completed | Self::InProgress)
    }

    /// The wire name of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dependency edge: the owning task depends on `depends_on_id`.
///
/// Edges have set semantics per (task, depends_on) pair and the full edge
/// set must stay acyclic at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// ID of the task this task depends on
    pub depends_on_id: TaskId,

    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

/// A task in the tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Current status (user-set or derived by the propagator)
    pub status: TaskStatus,

    /// Outgoing dependency edges, in insertion order.
    ///
    /// Insertion order is load-bearing: it is the deterministic tie-break
    /// for cycle-path discovery and the dependency checks.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Validate task invariants (title constraints).
    ///
    /// # Errors
    ///
    /// Returns a description of the violation.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)
    }
}

/// Data for creating a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Task title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Initial status; defaults to `Pending` when not given
    pub status: Option<TaskStatus>,

    /// Tasks the new task depends on
    pub dependencies: Vec<TaskId>,
}

impl NewTask {
    /// Validate the new task data.
    ///
    /// # Errors
    ///
    /// Returns a description of the violation.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)
    }
}

/// Data for updating an existing task
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New title (if updating)
    pub title: Option<String>,

    /// New description (if updating)
    pub description: Option<String>,

    /// New status (if updating). Setting `Completed` or `Blocked` triggers
    /// a cascade across dependent tasks.
    pub status: Option<TaskStatus>,
}

/// Filter for querying tasks
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Filter by status
    pub status: Option<TaskStatus>,

    /// Limit number of results
    pub limit: Option<usize>,
}

/// A node in the graph export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Task id
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Current status
    pub status: TaskStatus,
}

/// An edge in the graph export. `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// The dependent task
    pub from: TaskId,

    /// The task being depended on
    pub to: TaskId,
}

/// Read-only export of the whole dependency graph for visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    /// All tasks
    pub nodes: Vec<GraphNode>,

    /// All dependency edges
    pub edges: Vec<GraphEdge>,
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title cannot be empty".to_string());
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(format!(
            "title cannot exceed {} characters (got {})",
            MAX_TITLE_LENGTH,
            title.len()
        ));
    }
    Ok(())
}
