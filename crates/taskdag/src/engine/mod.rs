//! The dependency-graph engine: cycle detection and status propagation.
//!
//! This is the algorithmic core of taskdag. It owns no storage; both
//! algorithms operate through the [`GraphAccessor`] contract implemented by
//! the storage backend, so they can be tested in isolation and reused over
//! any graph representation.
//!
//! Two components, independent of each other:
//!
//! - [`cycle`]: decides whether a candidate dependency edge would create a
//!   cycle, and if so produces the exact cycle path. Read-only.
//! - [`propagate`]: re-derives a task's status from its direct dependencies
//!   and cascades the recomputation across everything that (transitively)
//!   depends on it.
//!
//! Mutations are expected to run the two in sequence: an edge addition
//! first passes the cycle check, then commits, then propagates.

use crate::domain::{TaskId, TaskStatus};

pub mod cycle;
pub mod propagate;

pub use cycle::find_cycle;
pub use propagate::{cascade_from, recompute_status, MAX_CASCADE_DEPTH};

/// Read/write access to the dependency graph, as the engine sees it.
///
/// Implemented by the storage layer. The engine never owns the graph; any
/// locking or I/O needed to answer these queries is the implementor's
/// concern, not the algorithms'.
pub trait GraphAccessor {
    /// Whether a task with this id exists.
    fn contains(&self, id: &TaskId) -> bool;

    /// Tasks `id` directly depends on, in edge-insertion order.
    ///
    /// The order must be deterministic: it is the tie-break when several
    /// cycles are reachable from a candidate dependency.
    fn direct_dependencies(&self, id: &TaskId) -> Vec<TaskId>;

    /// Tasks that directly depend on `id` (reverse edges).
    fn direct_dependents(&self, id: &TaskId) -> Vec<TaskId>;

    /// Current status of `id`, or `None` if the task does not exist.
    fn status(&self, id: &TaskId) -> Option<TaskStatus>;

    /// Overwrite the status of `id`.
    fn set_status(&mut self, id: &TaskId, status: TaskStatus);
}

#[cfg(test)]
pub(crate) mod test_graph {
    //! A minimal map-backed [`GraphAccessor`] for engine unit tests.

    use super::GraphAccessor;
    use crate::domain::{TaskId, TaskStatus};
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct TestGraph {
        statuses: HashMap<TaskId, TaskStatus>,
        // insertion-ordered adjacency
        dependencies: HashMap<TaskId, Vec<TaskId>>,
    }

    impl TestGraph {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn task(&mut self, id: &str, status: TaskStatus) -> &mut Self {
            self.statuses.insert(TaskId::new(id), status);
            self
        }

        pub fn edge(&mut self, from: &str, to: &str) -> &mut Self {
            self.dependencies
                .entry(TaskId::new(from))
                .or_default()
                .push(TaskId::new(to));
            self
        }
    }

    impl GraphAccessor for TestGraph {
        fn contains(&self, id: &TaskId) -> bool {
            self.statuses.contains_key(id)
        }

        fn direct_dependencies(&self, id: &TaskId) -> Vec<TaskId> {
            self.dependencies.get(id).cloned().unwrap_or_default()
        }

        fn direct_dependents(&self, id: &TaskId) -> Vec<TaskId> {
            let mut dependents: Vec<TaskId> = self
                .dependencies
                .iter()
                .filter(|(_, deps)| deps.contains(id))
                .map(|(from, _)| from.clone())
                .collect();
            dependents.sort();
            dependents
        }

        fn status(&self, id: &TaskId) -> Option<TaskStatus> {
            self.statuses.get(id).copied()
        }

        fn set_status(&mut self, id: &TaskId, status: TaskStatus) {
            self.statuses.insert(id.clone(), status);
        }
    }
}
