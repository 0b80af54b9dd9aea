//! Error types for taskdag operations.
//!
//! Every error here is a deterministic function of the current graph state;
//! none are transient, so callers should surface them rather than retry.

use crate::domain::TaskId;
use std::io;
use thiserror::Error;

/// The error type for taskdag operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization or parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Referenced task does not exist.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// The requested dependency edge does not exist.
    #[error("Dependency not found: {from} -> {to}")]
    DependencyNotFound {
        /// The dependent task
        from: TaskId,
        /// The task being depended on
        to: TaskId,
    },

    /// The dependency edge already exists (edges have set semantics).
    #[error("Dependency already exists: {from} -> {to}")]
    DuplicateDependency {
        /// The dependent task
        from: TaskId,
        /// The task being depended on
        to: TaskId,
    },

    /// A task may not depend on itself.
    #[error("Task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// Adding the edge would create a cycle. Carries the offending path,
    /// closed on the candidate dependency (e.g. `[3, 5, 7, 3]`).
    #[error("Circular dependency detected: {}", format_cycle_path(path))]
    CircularDependency {
        /// The dependent task of the rejected edge
        from: TaskId,
        /// The dependency target of the rejected edge
        to: TaskId,
        /// The task ids forming the cycle
        path: Vec<TaskId>,
    },

    /// The cascade hit its defensive depth ceiling. The acyclic invariant
    /// guarantees termination long before this, so hitting it indicates an
    /// internal bug; updates already applied are kept.
    #[error("Status cascade from {origin} exceeded depth ceiling at depth {depth}")]
    CascadeDepthExceeded {
        /// The task the cascade started from
        origin: TaskId,
        /// The depth at which the ceiling was hit
        depth: usize,
    },

    /// Cannot delete a task that other tasks depend on.
    #[error("Cannot delete {task_id}: {count} task(s) depend on it")]
    HasDependents {
        /// The task being deleted
        task_id: TaskId,
        /// How many tasks depend on it
        count: usize,
        /// The dependent task ids
        dependents: Vec<TaskId>,
    },
}

/// A specialized Result type for taskdag operations.
pub type Result<T> = std::result::Result<T, Error>;

fn format_cycle_path(path: &[TaskId]) -> String {
    path.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_dependency_message_shows_path() {
        let err = Error::CircularDependency {
            from: TaskId::new("t-7"),
            to: TaskId::new("t-3"),
            path: vec![
                TaskId::new("t-3"),
                TaskId::new("t-5"),
                TaskId::new("t-7"),
                TaskId::new("t-3"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("t-3 -> t-5 -> t-7 -> t-3"), "{msg}");
    }

    #[test]
    fn has_dependents_message_includes_count() {
        let err = Error::HasDependents {
            task_id: TaskId::new("t-1"),
            count: 2,
            dependents: vec![TaskId::new("t-2"), TaskId::new("t-3")],
        };
        assert!(err.to_string().contains("2 task(s)"));
    }
}
